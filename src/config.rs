//! Region coverer configuration and builder
//!
//! This module provides the option set that bounds a covering search.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cellid::MAX_LEVEL;
use crate::error::{CellError, Result};

/// Default cell budget for a covering
pub const DEFAULT_MAX_CELLS: usize = 8;

/// Options bounding a covering search
///
/// A covering uses cells between `min_level` and `max_level` whose level is
/// `min_level + k * level_mod`, and aims for at most `max_cells` cells.
///
/// # Example
///
/// ```rust
/// use rust_s2_cells::*;
///
/// let options = CovererOptionsBuilder::new()
///     .min_level(4)
///     .unwrap()
///     .max_level(16)
///     .unwrap()
///     .max_cells(20)
///     .build()
///     .unwrap();
///
/// // Options are serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&options).unwrap();
/// let restored: CovererOptions = serde_json::from_str(&json).unwrap();
/// assert_eq!(options, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CovererOptions {
    /// Coarsest level a covering may use
    ///
    /// Cells coarser than this are never emitted, even if that pushes the
    /// covering over `max_cells`.
    pub min_level: u8,

    /// Finest level a covering may use
    pub max_level: u8,

    /// Level step (1, 2 or 3)
    ///
    /// With `level_mod = 2` every subdivision splits a cell into 16
    /// grandchildren instead of 4 children.
    pub level_mod: u8,

    /// Desired upper bound on the number of cells
    ///
    /// - 1-3: very coarse, may need the six face cells
    /// - 8: default, a reasonable balance of cell count and tightness
    /// - 100+: tight coverings at the cost of more cells
    pub max_cells: usize,
}

impl CovererOptions {
    /// Largest level reachable from `min_level` in steps of `level_mod`
    /// without exceeding `max_level`
    #[inline]
    pub fn true_max_level(&self) -> u8 {
        if self.level_mod == 1 {
            return self.max_level;
        }
        self.max_level - (self.max_level - self.min_level) % self.level_mod
    }

    /// Check every field and the cross-field constraints
    ///
    /// Options built by hand or deserialized bypass the builder checks.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLevel` for a level above 30 and `InvalidConfig` for a
    /// bad `level_mod`, `min_level > max_level` or a zero `max_cells`
    pub fn validate(&self) -> Result<()> {
        check_level(self.min_level)?;
        check_level(self.max_level)?;
        check_level_mod(self.level_mod)?;
        if self.min_level > self.max_level {
            return Err(CellError::InvalidConfig(format!(
                "min_level ({}) must not exceed max_level ({})",
                self.min_level, self.max_level
            )));
        }
        if self.max_cells == 0 {
            return Err(CellError::InvalidConfig("max_cells must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Round `level` down to the nearest level allowed by `level_mod`
    #[inline]
    pub(crate) fn adjust_level(&self, level: u8) -> u8 {
        if self.level_mod > 1 && level > self.min_level {
            level - (level - self.min_level) % self.level_mod
        } else {
            level
        }
    }
}

impl Default for CovererOptions {
    fn default() -> Self {
        CovererOptions {
            min_level: 0,
            max_level: MAX_LEVEL,
            level_mod: 1,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

/// Builder for creating CovererOptions with validation
///
/// # Example
///
/// ```rust
/// use rust_s2_cells::*;
///
/// // Use defaults
/// let options = CovererOptionsBuilder::new().build().unwrap();
/// assert_eq!(options.max_cells, 8);
///
/// // Out-of-range levels are rejected
/// assert!(CovererOptionsBuilder::new().max_level(31).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CovererOptionsBuilder {
    options: CovererOptions,
}

impl CovererOptionsBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - min_level: 0
    /// - max_level: 30
    /// - level_mod: 1
    /// - max_cells: 8
    pub fn new() -> Self {
        Self {
            options: CovererOptions::default(),
        }
    }

    /// Set the coarsest level
    ///
    /// # Errors
    ///
    /// Returns `InvalidLevel` if level > 30
    pub fn min_level(mut self, level: u8) -> Result<Self> {
        check_level(level)?;
        self.options.min_level = level;
        Ok(self)
    }

    /// Set the finest level
    ///
    /// # Errors
    ///
    /// Returns `InvalidLevel` if level > 30
    pub fn max_level(mut self, level: u8) -> Result<Self> {
        check_level(level)?;
        self.options.max_level = level;
        Ok(self)
    }

    /// Set both levels to `level`, producing a fixed-level covering
    ///
    /// # Errors
    ///
    /// Returns `InvalidLevel` if level > 30
    pub fn fixed_level(self, level: u8) -> Result<Self> {
        self.min_level(level)?.max_level(level)
    }

    /// Set the level step
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless level_mod is 1, 2 or 3
    pub fn level_mod(mut self, level_mod: u8) -> Result<Self> {
        check_level_mod(level_mod)?;
        self.options.level_mod = level_mod;
        Ok(self)
    }

    /// Set the cell budget
    pub fn max_cells(mut self, max_cells: usize) -> Self {
        self.options.max_cells = max_cells;
        self
    }

    /// Build the options
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if min_level > max_level or max_cells is zero
    pub fn build(self) -> Result<CovererOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}

impl Default for CovererOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_level(level: u8) -> Result<()> {
    if level > MAX_LEVEL {
        return Err(CellError::InvalidLevel {
            level: level as i32,
            reason: "level must be in [0, 30]",
        });
    }
    Ok(())
}

fn check_level_mod(level_mod: u8) -> Result<()> {
    if !(1..=3).contains(&level_mod) {
        return Err(CellError::InvalidConfig(format!(
            "level_mod must be 1, 2 or 3 (got {})",
            level_mod
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let options = CovererOptionsBuilder::new().build().unwrap();
        assert_eq!(options, CovererOptions::default());
        assert_eq!(options.min_level, 0);
        assert_eq!(options.max_level, 30);
        assert_eq!(options.level_mod, 1);
        assert_eq!(options.max_cells, 8);
    }

    #[test]
    fn test_builder_custom() {
        let options = CovererOptionsBuilder::new()
            .min_level(3)
            .unwrap()
            .max_level(12)
            .unwrap()
            .level_mod(3)
            .unwrap()
            .max_cells(50)
            .build()
            .unwrap();
        assert_eq!(options.min_level, 3);
        assert_eq!(options.max_level, 12);
        assert_eq!(options.level_mod, 3);
        assert_eq!(options.max_cells, 50);
    }

    #[test]
    fn test_builder_rejects_invalid() {
        assert!(matches!(
            CovererOptionsBuilder::new().min_level(31),
            Err(CellError::InvalidLevel { level: 31, .. })
        ));
        assert!(CovererOptionsBuilder::new().level_mod(0).is_err());
        assert!(CovererOptionsBuilder::new().level_mod(4).is_err());
        assert!(CovererOptionsBuilder::new()
            .min_level(10)
            .unwrap()
            .max_level(5)
            .unwrap()
            .build()
            .is_err());
        assert!(CovererOptionsBuilder::new().max_cells(0).build().is_err());
    }

    #[test]
    fn test_fixed_level() {
        let options = CovererOptionsBuilder::new().fixed_level(7).unwrap().build().unwrap();
        assert_eq!((options.min_level, options.max_level), (7, 7));
    }

    #[test]
    fn test_level_adjustment() {
        let options = CovererOptions {
            min_level: 2,
            max_level: 11,
            level_mod: 3,
            max_cells: 8,
        };
        assert_eq!(options.true_max_level(), 11);
        assert_eq!(options.adjust_level(10), 8);
        assert_eq!(options.adjust_level(2), 2);
        assert_eq!(options.adjust_level(1), 1);

        let options = CovererOptions {
            max_level: 10,
            ..options
        };
        assert_eq!(options.true_max_level(), 8);
    }

    #[test]
    fn test_validate_hand_built_options() {
        assert!(CovererOptions::default().validate().is_ok());

        let zero_mod = CovererOptions {
            level_mod: 0,
            ..CovererOptions::default()
        };
        assert!(matches!(zero_mod.validate(), Err(CellError::InvalidConfig(_))));

        let inverted = CovererOptions {
            min_level: 12,
            max_level: 4,
            ..CovererOptions::default()
        };
        assert!(matches!(inverted.validate(), Err(CellError::InvalidConfig(_))));

        let too_deep = CovererOptions {
            max_level: 31,
            ..CovererOptions::default()
        };
        assert!(matches!(
            too_deep.validate(),
            Err(CellError::InvalidLevel { level: 31, .. })
        ));
    }
}
