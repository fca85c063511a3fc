use crate::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Row counts offered by the settings form.
pub const ROW_RANGE: RangeInclusive<usize> = 8..=15;
/// Column counts offered by the settings form.
pub const COL_RANGE: RangeInclusive<usize> = 8..=20;

/// Which neighbors a blank cell opens during flood fill.
///
/// Mine counts always use the full 8-cell neighborhood regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FloodPolicy {
    #[default]
    Moore,
    Orthogonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
    #[serde(default)]
    pub flood: FloodPolicy,
}

impl GameConfig {
    /// Builds a validated configuration with the default flood policy.
    pub fn new(rows: usize, cols: usize, mines: usize) -> Result<Self> {
        let config = Self {
            rows,
            cols,
            mines,
            flood: FloodPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_flood(mut self, flood: FloodPolicy) -> Self {
        self.flood = flood;
        self
    }

    pub const fn beginner() -> Self {
        Self::preset(8, 8, 10)
    }

    pub const fn intermediate() -> Self {
        Self::preset(12, 15, 30)
    }

    pub const fn expert() -> Self {
        Self::preset(15, 20, 60)
    }

    const fn preset(rows: usize, cols: usize, mines: usize) -> Self {
        Self {
            rows,
            cols,
            mines,
            flood: FloodPolicy::Moore,
        }
    }

    /// Checks `rows > 0`, `cols > 0`, `mines < rows * cols` and that every
    /// coordinate fits in a [`Position`](crate::Position).
    pub fn validate(&self) -> Result<()> {
        let addressable = i32::try_from(self.rows).is_ok() && i32::try_from(self.cols).is_ok();
        match self.total_cells() {
            Some(total) if addressable && self.mines < total => Ok(()),
            _ => Err(GameError::InvalidConfiguration {
                rows: self.rows,
                cols: self.cols,
                mines: self.mines,
            }),
        }
    }

    /// Total number of cells, `None` for an empty or overflowing grid.
    pub fn total_cells(&self) -> Option<usize> {
        if self.rows == 0 || self.cols == 0 {
            return None;
        }
        self.rows.checked_mul(self.cols)
    }

    /// Whether the dimensions fall inside the settings form's range.
    pub fn within_settings_range(&self) -> bool {
        ROW_RANGE.contains(&self.rows) && COL_RANGE.contains(&self.cols)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::preset(10, 10, 20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_degenerate_configurations() {
        assert!(GameConfig::new(0, 5, 0).is_err());
        assert!(GameConfig::new(5, 0, 0).is_err());
        assert!(GameConfig::new(1, 1, 1).is_err());
        assert!(GameConfig::new(3, 3, 9).is_err());
        assert!(GameConfig::new(usize::MAX, 2, 0).is_err());
    }

    #[test]
    fn test_rejects_dimensions_beyond_position_range() {
        let too_many = i32::MAX as usize + 1;

        assert!(GameConfig::new(too_many, 1, 0).is_err());
        assert!(GameConfig::new(1, too_many, 0).is_err());
        assert!(GameConfig::new(i32::MAX as usize, 1, 0).is_ok());
    }

    #[test]
    fn test_accepts_valid_configurations() {
        assert!(GameConfig::new(1, 1, 0).is_ok());
        assert!(GameConfig::new(3, 3, 8).is_ok());
        assert_eq!(GameConfig::new(2, 3, 1).unwrap().total_cells(), Some(6));
    }

    #[test]
    fn test_presets_fit_settings_range() {
        for config in [
            GameConfig::default(),
            GameConfig::beginner(),
            GameConfig::intermediate(),
            GameConfig::expert(),
        ] {
            assert!(config.validate().is_ok(), "{config:?}");
            assert!(config.within_settings_range(), "{config:?}");
        }
    }

    #[test]
    fn test_error_reports_configuration() {
        let err = GameConfig::new(1, 1, 1).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidConfiguration {
                rows: 1,
                cols: 1,
                mines: 1
            }
        );
        assert_eq!(
            err.to_string(),
            "Invalid configuration: 1x1 board with 1 mines"
        );
    }
}
