use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};

/// Largest smoothing kernel whose integer weights cannot overflow
pub const MAX_BLUR_KERNEL_SIZE: u32 = 25;

/// Binarization parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PreprocessConfig {
    #[schemars(description = "Side length of the square smoothing kernel, odd, at most 25")]
    pub blur_kernel_size: u32,
    #[schemars(description = "Intensities at or above this value become foreground")]
    pub threshold: u8,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            threshold: 128,
        }
    }
}

/// Contour plausibility thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FilterConfig {
    #[schemars(description = "Contours with area at or below this (square pixels) are dropped")]
    pub min_area: f64,
    #[schemars(description = "Contours with width/height at or below this are dropped")]
    pub min_aspect_ratio: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_area: 100.0,
            min_aspect_ratio: 0.5,
        }
    }
}

/// Everything the detection pipeline needs to know about thresholds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EvaluationConfig {
    pub preprocess: PreprocessConfig,
    pub filter: FilterConfig,
}

impl EvaluationConfig {
    pub fn validate(&self) -> Result<()> {
        let kernel = self.preprocess.blur_kernel_size;
        if kernel == 0 || kernel % 2 == 0 || kernel > MAX_BLUR_KERNEL_SIZE {
            return Err(EvalError::InvalidConfig(format!(
                "blur_kernel_size must be odd and between 1 and {MAX_BLUR_KERNEL_SIZE}, got {kernel}"
            )));
        }

        let filter = &self.filter;
        if !filter.min_area.is_finite() || filter.min_area < 0.0 {
            return Err(EvalError::InvalidConfig(format!(
                "min_area must be a non-negative number, got {}",
                filter.min_area
            )));
        }
        if !filter.min_aspect_ratio.is_finite() || filter.min_aspect_ratio < 0.0 {
            return Err(EvalError::InvalidConfig(format!(
                "min_aspect_ratio must be a non-negative number, got {}",
                filter.min_aspect_ratio
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvaluationConfig::default();
        assert_eq!(config.preprocess.blur_kernel_size, 5);
        assert_eq!(config.preprocess.threshold, 128);
        assert_eq!(config.filter.min_area, 100.0);
        assert_eq!(config.filter.min_aspect_ratio, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_even_kernel() {
        let mut config = EvaluationConfig::default();
        config.preprocess.blur_kernel_size = 4;
        assert!(matches!(config.validate(), Err(EvalError::InvalidConfig(_))));

        config.preprocess.blur_kernel_size = 0;
        assert!(config.validate().is_err());

        config.preprocess.blur_kernel_size = 27;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_thresholds() {
        let mut config = EvaluationConfig::default();
        config.filter.min_area = -1.0;
        assert!(config.validate().is_err());

        let mut config = EvaluationConfig::default();
        config.filter.min_aspect_ratio = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EvaluationConfig =
            serde_json::from_str(r#"{"filter": {"min_area": 50.0}}"#).expect("Should parse");
        assert_eq!(config.filter.min_area, 50.0);
        assert_eq!(config.filter.min_aspect_ratio, 0.5);
        assert_eq!(config.preprocess, PreprocessConfig::default());
    }
}
