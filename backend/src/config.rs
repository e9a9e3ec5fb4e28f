//! Runtime configuration.
//!
//! Values come from the environment (a `.env` file is honored), then CLI
//! flags override them.
//!
//! | Variable              | Default                |
//! |-----------------------|------------------------|
//! | `ARTJOIN_ARTISTS`     | `Artists.csv`          |
//! | `ARTJOIN_ARTWORKS`    | `artworks_sampled.csv` |
//! | `ARTJOIN_PORT`        | `3000`                 |
//! | `ARTJOIN_STATIC_DIR`  | unset                  |

use std::env;
use std::path::PathBuf;

use crate::api::logs::log_warning;

/// Artist dataset read when no path is given.
pub const DEFAULT_ARTISTS_FILE: &str = "Artists.csv";

/// Artwork dataset read when no path is given.
pub const DEFAULT_ARTWORKS_FILE: &str = "artworks_sampled.csv";

/// HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

pub const ENV_ARTISTS: &str = "ARTJOIN_ARTISTS";
pub const ENV_ARTWORKS: &str = "ARTJOIN_ARTWORKS";
pub const ENV_PORT: &str = "ARTJOIN_PORT";
pub const ENV_STATIC_DIR: &str = "ARTJOIN_STATIC_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub artists_path: PathBuf,
    pub artworks_path: PathBuf,
    pub port: u16,
    /// Directory of front-end assets served at `/`
    pub static_dir: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            artists_path: PathBuf::from(DEFAULT_ARTISTS_FILE),
            artworks_path: PathBuf::from(DEFAULT_ARTWORKS_FILE),
            port: DEFAULT_PORT,
            static_dir: None,
        }
    }
}

impl ViewerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        // Try loading .env file
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var(ENV_PORT) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log_warning(format!("Ignoring invalid {}='{}'", ENV_PORT, raw));
                defaults.port
            }),
            None => defaults.port,
        };

        Self {
            artists_path: var(ENV_ARTISTS).map(PathBuf::from).unwrap_or(defaults.artists_path),
            artworks_path: var(ENV_ARTWORKS).map(PathBuf::from).unwrap_or(defaults.artworks_path),
            port,
            static_dir: var(ENV_STATIC_DIR).map(PathBuf::from),
        }
    }

    pub fn with_artists(mut self, path: Option<PathBuf>) -> Self {
        if let Some(p) = path {
            self.artists_path = p;
        }
        self
    }

    pub fn with_artworks(mut self, path: Option<PathBuf>) -> Self {
        if let Some(p) = path {
            self.artworks_path = p;
        }
        self
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(p) = port {
            self.port = p;
        }
        self
    }

    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.static_dir = dir;
        }
        self
    }
}
