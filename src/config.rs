//! Board configuration and validation
//!
//! A `BoardConfig` is built once per (rows, risk) selection and handed to
//! the generators and the session. Construction range-checks everything so
//! a bad caller fails fast instead of producing a malformed board.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_ROWS, MIN_ROWS};

/// Payout volatility tiers
///
/// Selects which multiplier table the bin strip is built from. `Low` pays
/// close to even everywhere, `High` concentrates value in the outer bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RiskTier {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }

    /// Parse a tier token; unknown tokens are an error, not a fallback
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RiskTier::Low),
            "medium" => Ok(RiskTier::Medium),
            "high" => Ok(RiskTier::High),
            _ => Err(ConfigError::UnknownRiskTier(s.to_string())),
        }
    }
}

/// Errors from assembling a board configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("row count {rows} outside supported range {min}..={max}", min = MIN_ROWS, max = MAX_ROWS)]
    RowsOutOfRange { rows: u32 },
    #[error("board dimensions must be positive and finite, got {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },
    #[error("unknown risk tier {0:?}")]
    UnknownRiskTier(String),
}

/// Immutable description of one board generation
///
/// Coordinates are board-local pixels: origin at the top-left corner,
/// y growing downward (gravity is +y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Peg rows in the lattice
    pub rows: u32,
    /// Which payout table the bins use
    pub risk: RiskTier,
    /// Board width in pixels
    pub width: f32,
    /// Board height in pixels
    pub height: f32,
}

impl BoardConfig {
    pub fn new(rows: u32, risk: RiskTier, width: f32, height: f32) -> Result<Self, ConfigError> {
        if !(MIN_ROWS..=MAX_ROWS).contains(&rows) {
            return Err(ConfigError::RowsOutOfRange { rows });
        }
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        Ok(Self {
            rows,
            risk,
            width,
            height,
        })
    }

    /// Number of payout bins (always one more than peg rows)
    #[inline]
    pub fn bin_count(&self) -> usize {
        self.rows as usize + 1
    }

    /// Uniform horizontal peg pitch, sized so the widest row (rows + 2
    /// pegs) leaves one full gap at each edge
    #[inline]
    pub fn peg_spacing(&self) -> f32 {
        self.width / (self.rows + 3) as f32
    }
}
