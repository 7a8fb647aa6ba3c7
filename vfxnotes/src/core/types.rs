//! VFX Notes Core Type Definitions
//!
//! Defines fundamental types used throughout the project.

use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// ID Types
// =============================================================================

/// Document object unique identifier (ULID)
pub type ObjectId = String;

/// Track slot identifier (unique within its composition)
pub type SlotId = u32;

// =============================================================================
// Time Types
// =============================================================================

/// Timeline position in edit-rate units
pub type Position = i64;

/// Component duration in edit-rate units
pub type Length = i64;

/// Ratio (for edit rates)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    /// Numerator
    pub num: i32,
    /// Denominator
    pub den: i32,
}

impl Ratio {
    /// Creates a new ratio with validation
    pub fn new(num: i32, den: i32) -> Self {
        if den == 0 {
            warn!("Ratio created with zero denominator, defaulting to 1");
            return Self { num, den: 1 };
        }
        Self { num, den }
    }

    /// Converts to floating point value
    pub fn as_f64(&self) -> f64 {
        if self.den == 0 {
            return 0.0;
        }
        self.num as f64 / self.den as f64
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Self { num: 24, den: 1 }
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

// =============================================================================
// Color Types
// =============================================================================

/// 16-bit per channel RGB color, as carried by timeline markers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl RgbColor {
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_zero_denominator() {
        let r = Ratio::new(25, 0);
        assert_eq!(r.den, 1);
        assert_eq!(r.as_f64(), 25.0);
    }

    #[test]
    fn test_ratio_ntsc() {
        let r = Ratio::new(30000, 1001);
        assert!((r.as_f64() - 29.97).abs() < 0.01);
        assert_eq!(r.to_string(), "30000/1001");
    }

    #[test]
    fn test_ratio_serialization() {
        let r = Ratio::new(24, 1);
        let json = serde_json::to_string(&r).unwrap();
        let parsed: Ratio = serde_json::from_str(&json).unwrap();
        assert_eq!(r, parsed);
    }
}
