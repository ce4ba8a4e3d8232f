//! Aspect-ratio classification of video frames.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Maximum cross-multiplied distance from an exact 16:9 / 9:16 ratio.
pub const RATIO_TOLERANCE: i64 = 100;

/// Frame geometry reported by the content inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Orientation bucket used as the first segment of a video storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// 16:9
    Landscape,
    /// 9:16
    Portrait,
    Other,
}

impl Orientation {
    /// Classify a frame size.
    ///
    /// Both comparisons are strict: a distance equal to the tolerance is not
    /// a match, and equal distances to both ratios fall through to `Other`.
    pub fn classify(width: u32, height: u32) -> Self {
        let (w, h) = (i64::from(width), i64::from(height));
        let land_diff = (w * 9 - h * 16).abs();
        let port_diff = (w * 16 - h * 9).abs();

        if land_diff < RATIO_TOLERANCE && land_diff < port_diff {
            Orientation::Landscape
        } else if port_diff < RATIO_TOLERANCE && port_diff < land_diff {
            Orientation::Portrait
        } else {
            Orientation::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

impl From<Dimensions> for Orientation {
    fn from(dimensions: Dimensions) -> Self {
        Orientation::classify(dimensions.width, dimensions.height)
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
