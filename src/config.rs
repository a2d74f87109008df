//! Runtime settings.
//!
//! Defaults can be overridden from the environment (or a `.env` file):
//! - `IPV4_MAX_TOTAL` - cap on addresses produced by one expansion
//! - `IPV4_MERGE_FLOOR` - shortest prefix that may still be merged upwards
//! - `IPV4_MAX_CHILDREN` - cap on subnets produced by one division

use std::str::FromStr;

/// Default cap on the number of addresses one expansion may produce.
pub const DEFAULT_MAX_TOTAL: usize = 10_000;

/// Blocks at or above this size (/8) are never merged into a supernet.
pub const DEFAULT_MERGE_FLOOR: u8 = 8;

/// Divisions asking for more children than this are refused.
pub const DEFAULT_MAX_CHILDREN: u32 = 65_536;

pub const ENV_MAX_TOTAL: &str = "IPV4_MAX_TOTAL";
pub const ENV_MERGE_FLOOR: &str = "IPV4_MERGE_FLOOR";
pub const ENV_MAX_CHILDREN: &str = "IPV4_MAX_CHILDREN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub max_total: usize,
    pub merge_floor: u8,
    pub max_children: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_total: DEFAULT_MAX_TOTAL,
            merge_floor: DEFAULT_MERGE_FLOOR,
            max_children: DEFAULT_MAX_CHILDREN,
        }
    }
}

impl Settings {
    /// Load `.env` (if present) and read overrides from the environment.
    pub fn from_env() -> Settings {
        dotenv::dotenv().ok();
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup, falling back to defaults on
    /// missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let merge_floor = read_value(&lookup, ENV_MERGE_FLOOR, defaults.merge_floor);
        let merge_floor = if merge_floor > 32 {
            log::warn!("{ENV_MERGE_FLOOR}={merge_floor} is above 32, using {DEFAULT_MERGE_FLOOR}");
            DEFAULT_MERGE_FLOOR
        } else {
            merge_floor
        };
        Settings {
            max_total: read_value(&lookup, ENV_MAX_TOTAL, defaults.max_total),
            merge_floor,
            max_children: read_value(&lookup, ENV_MAX_CHILDREN, defaults.max_children),
        }
    }
}

fn read_value<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring {key}='{raw}', using default {default}");
            default
        }),
        None => default,
    }
}
