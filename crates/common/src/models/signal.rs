use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder asset for chat signals, which rarely name the instrument on
/// the same line as the direction cue.
pub const UNKNOWN_ASSET: &str = "UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strength {
    Strong,
    Normal,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strength::Strong => write!(f, "Strong"),
            Strength::Normal => write!(f, "Normal"),
        }
    }
}

/// One trade signal extracted from scraped chat text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub asset: String,
    pub decision: Direction,
    pub strength: Strength,
    /// The trimmed source line the signal was parsed from.
    pub raw: String,
}
