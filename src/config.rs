//! Service configuration parsed from environment variables.
//!
//! Every variable is optional:
//! - `PORT`: listen port, default 3000
//! - `PENTAGON_WIDTH` / `PENTAGON_HEIGHT`: nominal size, default 300 x 300
//! - `PENTAGON_LEVELS`: levels per wedge, default 5, at most 64; negative means none
//! - `PENTAGON_SCALE_X` / `PENTAGON_SCALE_Y`: stretch factors, default 1
//! - `PENTAGON_TARGET_ID`: id of the rendered `<svg>`, default `J-svg-pentagon`
//! - `PENTAGON_STATE`: initial locks as a hash string, default empty
//!
//! A variable that is set but unparseable is an error rather than a silent
//! fallback to its default.

use std::str::FromStr;

use shards::consts::MAX_LEVELS;
use shards::store::{MemoryStore, PageKey, StoreError};
use shards::widget::PentagonOptions;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_WIDTH: f64 = 300.0;
pub const DEFAULT_HEIGHT: f64 = 300.0;
pub const DEFAULT_LEVELS: i64 = 5;
pub const DEFAULT_SCALE: f64 = 1.0;
pub const DEFAULT_TARGET_ID: &str = "J-svg-pentagon";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid { var: &'static str, expected: &'static str, value: String },
    #[error("PENTAGON_STATE is not a valid state string: {0}")]
    State(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub width: f64,
    pub height: f64,
    pub num_levels: i64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub target_id: String,
    pub initial_state: MemoryStore,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            num_levels: DEFAULT_LEVELS,
            scale_x: DEFAULT_SCALE,
            scale_y: DEFAULT_SCALE,
            target_id: DEFAULT_TARGET_ID.to_owned(),
            initial_state: MemoryStore::new(),
        }
    }
}

impl AppConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_var(&lookup, "PORT", DEFAULT_PORT, "a port number")?;
        let width = positive(&lookup, "PENTAGON_WIDTH", DEFAULT_WIDTH)?;
        let height = positive(&lookup, "PENTAGON_HEIGHT", DEFAULT_HEIGHT)?;
        let num_levels = levels(&lookup)?;
        let scale_x = positive(&lookup, "PENTAGON_SCALE_X", DEFAULT_SCALE)?;
        let scale_y = positive(&lookup, "PENTAGON_SCALE_Y", DEFAULT_SCALE)?;
        let target_id = lookup("PENTAGON_TARGET_ID")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TARGET_ID.to_owned());
        let initial_state = match lookup("PENTAGON_STATE") {
            Some(raw) => MemoryStore::decode(raw.trim())?,
            None => MemoryStore::new(),
        };

        Ok(Self { port, width, height, num_levels, scale_x, scale_y, target_id, initial_state })
    }

    /// Widget options for one page.
    #[must_use]
    pub fn options(&self, page: PageKey) -> PentagonOptions {
        PentagonOptions::new(self.width, self.height, &self.target_id, page)
            .with_levels(self.num_levels)
            .with_scale(self.scale_x, self.scale_y)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T, expected: &'static str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid { var, expected, value: raw }),
    }
}

fn levels<F>(lookup: &F) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    const EXPECTED: &str = "an integer no greater than 64";
    let value = parse_var(lookup, "PENTAGON_LEVELS", DEFAULT_LEVELS, EXPECTED)?;
    if value <= i64::from(MAX_LEVELS) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid { var: "PENTAGON_LEVELS", expected: EXPECTED, value: value.to_string() })
    }
}

fn positive<F>(lookup: &F, var: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    const EXPECTED: &str = "a finite positive number";
    let value = parse_var(lookup, var, default, EXPECTED)?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Invalid { var, expected: EXPECTED, value: value.to_string() })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
