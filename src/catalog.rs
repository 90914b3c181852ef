//! Built-in text operations: default instructions and prompt templates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, ErrorContext};

/// Tone used when the tone operation is invoked without one.
pub const DEFAULT_TONE: &str = "Professional";

/// One fixed text-transformation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Rephrase,
    Improve,
    Tone,
    Summarize,
    Expand,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Rephrase,
        Operation::Improve,
        Operation::Tone,
        Operation::Summarize,
        Operation::Expand,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Operation::Rephrase => "rephrase",
            Operation::Improve => "improve",
            Operation::Tone => "tone",
            Operation::Summarize => "summarize",
            Operation::Expand => "expand",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Rephrase => "Word Rephraser",
            Operation::Improve => "Word Improver",
            Operation::Tone => "Tone Changer",
            Operation::Summarize => "Summarizer",
            Operation::Expand => "Expander",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operation::Rephrase => "Rewrite your content while keeping the original meaning.",
            Operation::Improve => "Enhance vocabulary, flow, and structural impact.",
            Operation::Tone => "Shift your writing to a specific emotional or professional tone.",
            Operation::Summarize => "Condense long text into concise, actionable points.",
            Operation::Expand => "Elaborate on short ideas with more detail and depth.",
        }
    }

    /// Instruction sent on the system channel unless settings override it.
    pub fn default_instruction(&self) -> &'static str {
        match self {
            Operation::Rephrase => "You are an expert editor. Provide 3 distinct variations of the input text by rephrasing it for clarity and engagement while preserving the original intent. Return a JSON array of strings.",
            Operation::Improve => "You are a professional writing coach. Provide 3 distinct improved versions of the following text. Each version should progressively enhance vocabulary, fixing awkward phrasing and ensuring better flow. Return a JSON array of strings.",
            Operation::Tone => "You are a communications specialist. Rewrite the input text to match the requested tone perfectly. Provide 3 distinct variations that embody that tone. Return a JSON array of strings.",
            Operation::Summarize => "You are an efficient assistant. Provide 3 different summary formats: 1) A one-sentence summary, 2) A short paragraph, 3) A bulleted list of key takeaways. Return a JSON array of strings.",
            Operation::Expand => "You are a creative writer. Provide 3 distinct expansions of the provided idea. One focusing on detail, one on context, and one on descriptive storytelling. Return a JSON array of strings.",
        }
    }

    /// Render the user-facing prompt. `tone` is only read by [`Operation::Tone`].
    pub fn render_prompt(&self, input: &str, tone: Option<&str>) -> String {
        match self {
            Operation::Rephrase => format!("Rephrase this text in 3 different ways:\n\n{}", input),
            Operation::Improve => format!("Improve this text in 3 different ways:\n\n{}", input),
            Operation::Tone => {
                let tone = tone
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or(DEFAULT_TONE);
                format!("Rewrite this text in a {} tone (3 variations):\n\n{}", tone, input)
            }
            Operation::Summarize => {
                format!("Summarize this text in 3 different formats:\n\n{}", input)
            }
            Operation::Expand => format!("Expand on this text in 3 different ways:\n\n{}", input),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Operation::ALL
            .into_iter()
            .find(|op| op.id() == wanted)
            .ok_or_else(|| {
                Error::configuration_with_context(
                    format!("unknown operation '{}'", s.trim()),
                    ErrorContext::new()
                        .with_details("expected one of: rephrase, improve, tone, summarize, expand")
                        .with_source("catalog"),
                )
            })
    }
}
