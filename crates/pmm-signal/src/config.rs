//! Indicator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the candle window and both indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// NATR averaging period in candles.
    #[serde(default = "default_candle_period")]
    pub candle_period: usize,

    /// MACD fast EMA span.
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    /// MACD slow EMA span.
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    /// MACD signal-line EMA span.
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
}

impl IndicatorConfig {
    /// Candle window capacity needed to serve both indicators from a full
    /// window: NATR needs `candle_period + 1` bars (True Range requires a
    /// previous close), MACD needs `macd_slow + macd_signal` closes.
    pub fn buffer_capacity(&self) -> usize {
        (self.candle_period + 1).max(self.macd_slow + self.macd_signal)
    }

    /// Validate indicator parameters. Failures here are fatal at startup.
    pub fn validate(&self) -> Result<(), String> {
        if self.candle_period == 0 {
            return Err("candle_period must be positive".to_string());
        }
        if self.macd_fast == 0 || self.macd_signal == 0 {
            return Err("macd spans must be positive".to_string());
        }
        if self.macd_fast >= self.macd_slow {
            return Err(format!(
                "macd_fast ({}) must be less than macd_slow ({})",
                self.macd_fast, self.macd_slow
            ));
        }
        Ok(())
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            candle_period: default_candle_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
        }
    }
}

fn default_candle_period() -> usize {
    30
}
fn default_macd_fast() -> usize {
    12
}
fn default_macd_slow() -> usize {
    26
}
fn default_macd_signal() -> usize {
    9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IndicatorConfig::default();
        assert_eq!(config.candle_period, 30);
        assert_eq!(config.macd_fast, 12);
        assert_eq!(config.macd_slow, 26);
        assert_eq!(config.macd_signal, 9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_buffer_capacity_covers_both_indicators() {
        let config = IndicatorConfig::default();
        // max(30 + 1, 26 + 9) = 35
        assert_eq!(config.buffer_capacity(), 35);

        let long_natr = IndicatorConfig {
            candle_period: 60,
            ..Default::default()
        };
        assert_eq!(long_natr.buffer_capacity(), 61);
    }

    #[test]
    fn test_fast_must_be_below_slow() {
        let config = IndicatorConfig {
            macd_fast: 26,
            macd_slow: 26,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_defaults() {
        let config: IndicatorConfig = toml::from_str("candle_period = 14").unwrap();
        assert_eq!(config.candle_period, 14);
        assert_eq!(config.macd_slow, 26);
    }
}
