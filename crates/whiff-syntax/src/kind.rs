//! Node kind tags for the Dockerfile syntax tree.

use serde::Serialize;

/// The closed set of node kinds in a parsed Dockerfile.
///
/// Kinds are a flat tagged enumeration; queries test membership in a kind
/// set rather than probing structure. New syntax is supported by extending
/// this enum, never by guessing node shape at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// The root node of a parsed file.
    Dockerfile,
    /// One instruction (`FROM`, `RUN`, `COPY`, ...). Its value is the
    /// uppercased keyword.
    Instruction,
    /// The instruction keyword leaf, as written in the source.
    Keyword,
    /// The image reference of a `FROM` instruction.
    ImageRef,
    /// The build-stage alias following `AS` in a `FROM` instruction.
    StageAlias,
    /// A parsed shell body of a `RUN`/`CMD`/`ENTRYPOINT` instruction.
    ShellScript,
    /// One simple command inside a shell script.
    ShellCommand,
    /// The executable name of a shell command.
    CommandName,
    /// A `-x`/`--long` option word of a shell command.
    Flag,
    /// Any other word: positional argument, subcommand, or env assignment.
    Argument,
    /// A shell list operator: `&&`, `||`, `;`, `|`, or `&`.
    Operator,
    /// An exec-form (`["..."]`) instruction body, kept as a single leaf.
    JsonArray,
    /// A full-line comment, excluding its trailing newline.
    Comment,
    /// Whitespace, newlines, and line continuations.
    Trivia,
}

impl NodeKind {
    /// Whether this kind is one of the shell word kinds.
    #[must_use]
    pub fn is_word(self) -> bool {
        matches!(self, Self::CommandName | Self::Flag | Self::Argument)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Dockerfile => "dockerfile",
            Self::Instruction => "instruction",
            Self::Keyword => "keyword",
            Self::ImageRef => "image-ref",
            Self::StageAlias => "stage-alias",
            Self::ShellScript => "shell-script",
            Self::ShellCommand => "shell-command",
            Self::CommandName => "command-name",
            Self::Flag => "flag",
            Self::Argument => "argument",
            Self::Operator => "operator",
            Self::JsonArray => "json-array",
            Self::Comment => "comment",
            Self::Trivia => "trivia",
        };
        f.write_str(name)
    }
}
