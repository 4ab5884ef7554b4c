//! Status line shown above the results.

use serde::Serialize;
use strum::Display;

/// Presentation hint for a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
    /// Highlighted: work in progress or results found.
    Accent,
    /// Subdued: idle, empty, or failed.
    #[default]
    Muted,
}

impl Tone {
    /// CSS color used for this tone.
    pub fn color(&self) -> &'static str {
        match self {
            Tone::Accent => "#8ef6ff",
            Tone::Muted => "#9aa3b2",
        }
    }
}

/// A status message with its tone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Status {
    /// Message text.
    pub message: String,
    /// Presentation tone.
    pub tone: Tone,
}

impl Status {
    /// Create a status.
    pub fn new(message: impl Into<String>, tone: Tone) -> Self {
        Self {
            message: message.into(),
            tone,
        }
    }

    /// Before any scan.
    pub fn idle() -> Self {
        Self::default()
    }

    /// A scan is in flight.
    pub fn scanning() -> Self {
        Self::new("Scanning markets...", Tone::Accent)
    }

    /// A scan returned `count` opportunities.
    pub fn found(count: usize) -> Self {
        Self::new(format!("Found {} opportunities.", count), Tone::Accent)
    }

    /// A scan returned nothing.
    pub fn empty() -> Self {
        Self::new("No opportunities found. Try lowering the edge.", Tone::Muted)
    }

    /// A scan failed for any reason.
    pub fn failed() -> Self {
        Self::new("Scan failed. Try again.", Tone::Muted)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
