//! Shared types used across arktag.
//! Includes the decoded records (`TaggedToken`, `TaggedDocument`), the
//! per-line outcome of decoding (`LineOutcome`), and the enums selected from
//! config files and the CLI (`ParseMode`, `OutputFormat`).
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One decoded tagger output line: the token text, its tag and the tagger's
/// confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedToken {
    text: String,
    tag: String,
    confidence: f64,
}

impl TaggedToken {
    pub(crate) fn new(text: String, tag: String, confidence: f64) -> Self {
        Self {
            text,
            tag,
            confidence,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// `(text, tag, confidence)` borrowed as a tuple
    pub fn as_tuple(&self) -> (&str, &str, f64) {
        (&self.text, &self.tag, self.confidence)
    }
}

/// Tokens of one input unit (one line of the input file), in tagger order
pub type TaggedDocument = Vec<TaggedToken>;

/// What a single line of tagger output turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Decoded(TaggedToken),
    Boundary,
    Ignored,
    Malformed(String),
}

/// How the parser treats lines that look like records but do not decode
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Skip malformed lines and keep going
    #[default]
    Lenient,
    /// Fail on the first malformed line
    Strict,
}

impl std::fmt::Display for ParseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseMode::Lenient => write!(f, "Lenient"),
            ParseMode::Strict => write!(f, "Strict"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum OutputFormat {
    Json,
    Tsv,
}
