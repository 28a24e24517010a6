//! Run settings read from environment variables.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `ZPL_PRINTER_HOST` | printer host name or address | none |
//! | `ZPL_PRINTER_PORT` | raw printing port | `9100` |
//! | `ZPL_CONNECT_TIMEOUT_SECS` | connect timeout | none |
//! | `ZPL_SCALE` | scale factor | `2.0` |
//! | `ZPL_LABEL_WIDTH` / `ZPL_LABEL_HEIGHT` | label size in dots | `720` / `360` |
//! | `ZPL_CENTERED` | centre instead of top-left | `true` |
//! | `ZPL_FIT_PROPORTIONALLY` | resize into the label before cropping | `true` |
//! | `ZPL_ORIGIN_X` / `ZPL_ORIGIN_Y` | field origin in dots | `10` / `10` |
//! | `ZPL_DEBUG_DIR` | write intermediate PNGs here | none |

use crate::{
    error::{Error, Result},
    pipeline::{Job, DEFAULT_LABEL_HEIGHT, DEFAULT_LABEL_WIDTH},
    printer::{Config, DEFAULT_PORT},
};
use std::{fmt::Display, path::PathBuf, str::FromStr, time::Duration};

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: Option<String>,
    pub port: u16,
    pub connect_timeout: Option<Duration>,
    pub job: Job,
    pub debug_dir: Option<PathBuf>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = get("ZPL_PRINTER_HOST").map(|h| h.trim().to_string());
        let port = parse_or(&get, "ZPL_PRINTER_PORT", DEFAULT_PORT)?;
        let connect_timeout = match get("ZPL_CONNECT_TIMEOUT_SECS") {
            Some(value) => Some(Duration::from_secs(parse("ZPL_CONNECT_TIMEOUT_SECS", &value)?)),
            None => None,
        };

        let job = Job::new(
            parse_or(&get, "ZPL_LABEL_WIDTH", DEFAULT_LABEL_WIDTH)?,
            parse_or(&get, "ZPL_LABEL_HEIGHT", DEFAULT_LABEL_HEIGHT)?,
        )
        .scale(parse_or(&get, "ZPL_SCALE", 2.0)?)
        .centered(parse_flag_or(&get, "ZPL_CENTERED", true)?)
        .fit_proportionally(parse_flag_or(&get, "ZPL_FIT_PROPORTIONALLY", true)?)
        .origin(
            parse_or(&get, "ZPL_ORIGIN_X", 10)?,
            parse_or(&get, "ZPL_ORIGIN_Y", 10)?,
        );

        Ok(Settings {
            host,
            port,
            connect_timeout,
            job,
            debug_dir: get("ZPL_DEBUG_DIR").map(PathBuf::from),
        })
    }

    /// Printer configuration, if a host was given.
    pub fn printer_config(&self) -> Option<Config> {
        let host = self.host.as_ref()?;
        let config = Config::new(host.as_str()).port(self.port);
        Some(match self.connect_timeout {
            Some(timeout) => config.connect_timeout(timeout),
            None => config,
        })
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|err| Error::InvalidConfig(format!("{}={:?}: {}", key, value, err)))
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => parse(key, &value),
        None => Ok(default),
    }
}

fn parse_flag_or<G>(get: &G, key: &str, default: bool) -> Result<bool>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(Error::InvalidConfig(format!(
                "{}={:?}: expected a boolean",
                key, value
            ))),
        },
    }
}
