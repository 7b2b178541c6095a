use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_FRAMES: usize = 2000;
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(25);
pub const DEFAULT_CANVAS: u32 = 480;
pub const DEFAULT_POINT_SIZE: u32 = 1;
pub const X_BOUNDS: (f64, f64) = (0.0, 1.0);
pub const Y_BOUNDS: (f64, f64) = (0.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Rand,
    Lcg,
}

/// Everything a run needs, fixed before the first tick.
#[derive(Debug, Clone)]
pub struct Config {
    pub frames: usize,
    /// Zero disables pacing.
    pub interval: Duration,
    pub seed: Option<u64>,
    pub source: SourceKind,
    pub width: u32,
    pub height: u32,
    pub point_size: u32,
    pub x_bounds: (f64, f64),
    pub y_bounds: (f64, f64),
    pub snapshot: Option<PathBuf>,
    pub frames_dir: Option<PathBuf>,
    /// Skip the window, e.g. on CI.
    pub headless: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            frames: DEFAULT_FRAMES,
            interval: DEFAULT_INTERVAL,
            seed: None,
            source: SourceKind::Rand,
            width: DEFAULT_CANVAS,
            height: DEFAULT_CANVAS,
            point_size: DEFAULT_POINT_SIZE,
            x_bounds: X_BOUNDS,
            y_bounds: Y_BOUNDS,
            snapshot: None,
            frames_dir: None,
            headless: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.point_size == 0 {
            return Err(Error::InvalidConfig("point size must be at least 1".into()));
        }
        for (axis, (lo, hi)) in [("x", self.x_bounds), ("y", self.y_bounds)] {
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(Error::InvalidConfig(format!(
                    "{} bounds [{}, {}] are empty or inverted",
                    axis, lo, hi
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frames, 2000);
        assert_eq!(config.interval, Duration::from_millis(25));
        assert_eq!(config.x_bounds, (0.0, 1.0));
    }

    #[test]
    fn rejects_empty_canvas() {
        let config = Config {
            width: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_point_size() {
        let config = Config {
            point_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_bounds() {
        let config = Config {
            y_bounds: (1.0, 0.0),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("y bounds"));
    }

    #[test]
    fn zero_frames_is_allowed() {
        let config = Config {
            frames: 0,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
