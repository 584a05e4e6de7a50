//! Document kind enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use docharvest_core::error::AppError;

/// A kind of document that can be retrieved for an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Presentation slides.
    Slides,
    /// Written report.
    Report,
    /// Call transcript.
    Transcript,
    /// Audio recording.
    Audio,
}

impl DocumentKind {
    /// Every supported kind, in display order.
    pub const ALL: [DocumentKind; 4] = [Self::Slides, Self::Report, Self::Transcript, Self::Audio];

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slides => "slides",
            Self::Report => "report",
            Self::Transcript => "transcript",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slides" => Ok(Self::Slides),
            "report" => Ok(Self::Report),
            "transcript" => Ok(Self::Transcript),
            "audio" => Ok(Self::Audio),
            other => Err(AppError::validation(format!(
                "unknown document kind '{other}' (expected one of: slides, report, transcript, audio)"
            ))),
        }
    }
}
