//! Traffic light phases

use serde::{Deserialize, Serialize};

/// Phase of the traffic light
///
/// Only two phases exist and the light always flips between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Phase {
    #[default]
    Red = 0,
    Green = 1,
}

impl Phase {
    /// The opposite phase
    pub fn toggled(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Red,
        }
    }

    pub fn is_green(self) -> bool {
        self == Self::Green
    }

    pub(crate) fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a stored discriminant; only the low bit is significant
    pub(crate) fn from_u8(value: u8) -> Self {
        if value & 1 == 0 { Self::Red } else { Self::Green }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
        }
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            _ => Err(format!("Unknown phase: {}", s)),
        }
    }
}
