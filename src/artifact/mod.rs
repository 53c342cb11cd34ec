//! Artifact types produced by the section parser
//!
//! An [`Artifact`] is the structured form of one raw generator response:
//! either three named content blocks (split mode) or one fused page
//! document (whole-page mode). Artifacts are transient - created by
//! [`parse`], consumed once by the materializer.

mod parser;

pub use parser::parse;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Response shape requested from the generator and expected by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseMode {
    /// Three separate sections: markup, style, behavior
    Split,
    /// One complete page document, no section scanning
    Fused,
}

/// Marker grammar the parser recognizes in split mode
///
/// Both grammars require an unambiguous delimiter form. Marker words
/// embedded in prose (a sentence that merely mentions `CSS_START`, or a
/// mid-line `js:`) never open a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerGrammar {
    /// `[HTML_START]` .. `[HTML_END]` style bracketed tags, case-insensitive
    Bracketed,
    /// A line consisting solely of `HTML:`, `CSS:` or `JS:`
    LinePrefix,
}

/// The three content kinds a split-mode artifact must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Markup,
    Style,
    Behavior,
}

impl SectionKind {
    /// All kinds, in reporting order
    pub const ALL: [SectionKind; 3] = [SectionKind::Markup, SectionKind::Style, SectionKind::Behavior];

    /// Stable lowercase name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::Markup => "markup",
            SectionKind::Style => "style",
            SectionKind::Behavior => "behavior",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Structured content parsed from one generator response
///
/// Exactly one shape is active per generation; the shape follows the
/// configured [`ParseMode`], not anything in the response itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// Separate markup/style/behavior blocks, all non-empty
    Split {
        markup: String,
        style: String,
        behavior: String,
    },
    /// One complete page document, non-empty
    Fused { document: String },
}

/// Errors from parsing a raw generator response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing or empty sections: {}", format_kinds(.0))]
    MissingSections(Vec<SectionKind>),

    #[error("generator returned an empty document")]
    EmptyDocument,
}

fn format_kinds(kinds: &[SectionKind]) -> String {
    kinds.iter().map(SectionKind::name).collect::<Vec<_>>().join(", ")
}
