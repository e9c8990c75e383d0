use std::time::Duration;

use thiserror::Error;

use crate::arena::Arena;
use crate::GridInt;

pub const DEFAULT_COLUMNS: GridInt = 40;
pub const DEFAULT_ROWS: GridInt = 40;
pub const DEFAULT_TICKS_PER_SEC: u32 = 3;
pub const INITIAL_SNAKE_LENGTH: usize = 3;
/// Head segments that can never fold back onto the head of a fresh snake.
pub const SELF_COLLISION_EXEMPT_SEGMENTS: usize = 3;
pub const DEFAULT_CELL_WIDTH: u16 = 2;
const MIN_SLEEP: Duration = Duration::from_millis(10);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tick rate must be at least 1 update per second")]
    ZeroTickRate,
    #[error("initial snake length must be at least 1")]
    EmptySnake,
    #[error("a {columns}x{rows} grid cannot fit a snake of length {length}; both sides must exceed {min}")]
    GridTooSmall {
        columns: GridInt,
        rows: GridInt,
        length: usize,
        min: usize,
    },
    #[error("cells must be at least 1 terminal column wide")]
    ZeroCellWidth,
    #[error("at least the head segment must be exempt from the self-collision check")]
    NoExemptSegments,
}

/// Game settings
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub columns: GridInt,
    pub rows: GridInt,
    /// Terminal columns used to draw one cell
    pub cell_width: u16,
    pub ticks_per_sec: u32,
    pub initial_length: usize,
    pub exempt_segments: usize,
    /// Lower bound for the pause between two ticks
    pub min_sleep: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            cell_width: DEFAULT_CELL_WIDTH,
            ticks_per_sec: DEFAULT_TICKS_PER_SEC,
            initial_length: INITIAL_SNAKE_LENGTH,
            exempt_segments: SELF_COLLISION_EXEMPT_SEGMENTS,
            min_sleep: MIN_SLEEP,
        }
    }
}

impl GameConfig {
    #[cfg(test)]
    pub fn new(columns: GridInt, rows: GridInt) -> Self {
        GameConfig { columns, rows, ..Default::default() }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_sec == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.initial_length == 0 {
            return Err(ConfigError::EmptySnake);
        }
        if self.cell_width == 0 {
            return Err(ConfigError::ZeroCellWidth);
        }
        // Segment 0 always holds the head
        if self.exempt_segments == 0 {
            return Err(ConfigError::NoExemptSegments);
        }

        let too_small = ConfigError::GridTooSmall {
            columns: self.columns,
            rows: self.rows,
            length: self.initial_length,
            min: self.initial_length.saturating_mul(2),
        };
        let min = match self.initial_length.checked_mul(2) {
            Some(min) if GridInt::try_from(min).is_ok() => min,
            _ => return Err(too_small),
        };
        let columns = usize::try_from(self.columns).unwrap_or(0);
        let rows = usize::try_from(self.rows).unwrap_or(0);
        if columns <= min || rows <= min {
            return Err(too_small);
        }

        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.ticks_per_sec.max(1) as u64)
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.columns, 40);
        assert_eq!(config.rows, 40);
        assert_eq!(config.initial_length, 3);
        assert_eq!(config.exempt_segments, 3);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_tick_period() {
        let config = GameConfig::default();
        assert_eq!(config.tick_period(), Duration::from_nanos(333_333_333));

        let fast = GameConfig { ticks_per_sec: 50, ..Default::default() };
        assert_eq!(fast.tick_period(), Duration::from_millis(20));
    }

    #[test]
    fn test_rejects_bad_settings() {
        let config = GameConfig { ticks_per_sec: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickRate));

        let config = GameConfig { initial_length: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::EmptySnake));

        let config = GameConfig { cell_width: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCellWidth));

        let config = GameConfig { exempt_segments: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::NoExemptSegments));
    }

    #[test]
    fn test_grid_must_fit_snake() {
        assert!(GameConfig::new(7, 7).validate().is_ok());

        let err = GameConfig::new(6, 20).validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::GridTooSmall { columns: 6, rows: 20, length: 3, min: 6 }
        );
        assert!(err.to_string().contains("6x20"));
    }

    #[test]
    fn test_oversized_snake_is_rejected() {
        let config = GameConfig { initial_length: 1 << 31, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::GridTooSmall { .. })));

        let config = GameConfig { initial_length: usize::MAX, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::GridTooSmall { .. })));
    }

    #[test]
    fn test_negative_grid_is_rejected() {
        let err = GameConfig::new(-40, 40).validate().unwrap_err();
        assert!(matches!(err, ConfigError::GridTooSmall { columns: -40, .. }));
    }
}
