//! Fat-distribution ratios reported alongside BMI.
//!
//! Waist-to-hip ratio uses the WHO sex-specific cut-offs; waist-to-height
//! ratio uses the common 0.4 / 0.5 / 0.6 bands.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::units::Sex;

/// Risk band for a waist-to-hip ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaistHipRisk {
    /// Below the moderate cut-off.
    Low,
    /// Between the moderate and high cut-offs.
    Moderate,
    /// At or above the high cut-off.
    High,
}

/// Band for a waist-to-height ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaistHeightBand {
    /// Below 0.4.
    Slim,
    /// 0.4 up to 0.5.
    Healthy,
    /// 0.5 up to 0.6.
    IncreasedRisk,
    /// 0.6 and above.
    HighRisk,
}

/// A computed waist-to-hip ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaistHipAssessment {
    /// waist / hip.
    pub ratio: f64,
    /// Risk band for the given sex.
    pub risk: WaistHipRisk,
}

/// A computed waist-to-height ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaistHeightAssessment {
    /// waist / height.
    pub ratio: f64,
    /// Band.
    pub band: WaistHeightBand,
}

fn positive(field: &str, value: f64) -> EngineResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::invalid_input(field, "must be greater than zero"))
    }
}

/// Classifies a waist-to-hip ratio.
///
/// Male: `< 0.90` low, `< 1.0` moderate, otherwise high.
/// Female: `< 0.80` low, `< 0.85` moderate, otherwise high.
pub fn waist_hip_risk(ratio: f64, sex: Sex) -> WaistHipRisk {
    let (moderate, high) = match sex {
        Sex::Male => (0.90, 1.0),
        Sex::Female => (0.80, 0.85),
    };

    if ratio < moderate {
        WaistHipRisk::Low
    } else if ratio < high {
        WaistHipRisk::Moderate
    } else {
        WaistHipRisk::High
    }
}

/// Classifies a waist-to-height ratio.
pub fn waist_height_band(ratio: f64) -> WaistHeightBand {
    if ratio < 0.4 {
        WaistHeightBand::Slim
    } else if ratio < 0.5 {
        WaistHeightBand::Healthy
    } else if ratio < 0.6 {
        WaistHeightBand::IncreasedRisk
    } else {
        WaistHeightBand::HighRisk
    }
}

/// Computes the waist-to-hip ratio and its risk band.
///
/// Both measurements must use the same unit.
///
/// # Example
///
/// ```
/// use calculator_engine::calculation::{waist_to_hip_ratio, Sex, WaistHipRisk};
///
/// let whr = waist_to_hip_ratio(85.0, 100.0, Sex::Male).unwrap();
/// assert_eq!(whr.ratio, 0.85);
/// assert_eq!(whr.risk, WaistHipRisk::Low);
/// ```
pub fn waist_to_hip_ratio(waist: f64, hip: f64, sex: Sex) -> EngineResult<WaistHipAssessment> {
    let ratio = positive("waist", waist)? / positive("hip", hip)?;
    Ok(WaistHipAssessment {
        ratio,
        risk: waist_hip_risk(ratio, sex),
    })
}

/// Computes the waist-to-height ratio and its band.
///
/// Both measurements must use the same unit.
pub fn waist_to_height_ratio(waist: f64, height: f64) -> EngineResult<WaistHeightAssessment> {
    let ratio = positive("waist", waist)? / positive("height", height)?;
    Ok(WaistHeightAssessment {
        ratio,
        band: waist_height_band(ratio),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_male_waist_hip_cutoffs() {
        assert_eq!(waist_hip_risk(0.89, Sex::Male), WaistHipRisk::Low);
        assert_eq!(waist_hip_risk(0.90, Sex::Male), WaistHipRisk::Moderate);
        assert_eq!(waist_hip_risk(0.99, Sex::Male), WaistHipRisk::Moderate);
        assert_eq!(waist_hip_risk(1.0, Sex::Male), WaistHipRisk::High);
    }

    #[test]
    fn test_female_waist_hip_cutoffs() {
        assert_eq!(waist_hip_risk(0.79, Sex::Female), WaistHipRisk::Low);
        assert_eq!(waist_hip_risk(0.80, Sex::Female), WaistHipRisk::Moderate);
        assert_eq!(waist_hip_risk(0.85, Sex::Female), WaistHipRisk::High);
    }

    #[test]
    fn test_waist_height_bands() {
        assert_eq!(waist_height_band(0.39), WaistHeightBand::Slim);
        assert_eq!(waist_height_band(0.4), WaistHeightBand::Healthy);
        assert_eq!(waist_height_band(0.5), WaistHeightBand::IncreasedRisk);
        assert_eq!(waist_height_band(0.6), WaistHeightBand::HighRisk);
    }

    #[test]
    fn test_waist_to_height_ratio() {
        let whtr = waist_to_height_ratio(80.0, 175.0).unwrap();
        assert!((whtr.ratio - 0.457_142_857).abs() < 1e-6);
        assert_eq!(whtr.band, WaistHeightBand::Healthy);
    }

    #[test]
    fn test_zero_hip_is_invalid() {
        match waist_to_hip_ratio(80.0, 0.0, Sex::Female) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "hip"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
