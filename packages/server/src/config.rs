//! Runtime configuration: command-line flags, environment and network mode.

use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;

/// Present inside Docker containers
const CONTAINER_MARKER: &str = "/.dockerenv";

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "ludo-relay-server")]
#[command(about = "Room-based command relay for multiplayer games", long_about = None)]
pub struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "LUDO_RELAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to bind the server to [default: 80 in a container, 8081 otherwise]
    #[arg(short = 'p', long, env = "LUDO_RELAY_PORT")]
    pub port: Option<u16>,

    /// Directory of static assets served for unmatched paths [default: /public in a container]
    #[arg(long, env = "LUDO_RELAY_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Remove rooms as soon as their last member leaves
    #[arg(long, env = "LUDO_RELAY_REAP_EMPTY_ROOMS")]
    pub reap_empty_rooms: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LUDO_RELAY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Where the relay is running, which decides its default port and assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMode {
    Standalone,
    Container,
}

impl NetworkMode {
    pub fn detect() -> Self {
        Self::detect_with_marker(Path::new(CONTAINER_MARKER))
    }

    pub fn detect_with_marker(marker: &Path) -> Self {
        if marker.exists() {
            Self::Container
        } else {
            Self::Standalone
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Self::Standalone => 8081,
            Self::Container => 80,
        }
    }

    pub fn default_static_dir(self) -> Option<PathBuf> {
        match self {
            Self::Standalone => None,
            Self::Container => Some(PathBuf::from("/public")),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("static directory '{}' does not exist", .0.display())]
    StaticDirNotFound(PathBuf),
}

/// Fully resolved settings the server is started with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub mode: NetworkMode,
    pub host: String,
    pub port: u16,
    pub static_dir: Option<PathBuf>,
    pub reap_empty_rooms: bool,
}

impl RelayConfig {
    /// Merge explicit flags over the defaults of `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::StaticDirNotFound`] when `--static-dir` names a
    /// missing directory. A missing mode default only disables static assets.
    pub fn from_args(args: Args, mode: NetworkMode) -> Result<Self, ConfigError> {
        let static_dir = match args.static_dir {
            Some(dir) if dir.is_dir() => Some(dir),
            Some(dir) => return Err(ConfigError::StaticDirNotFound(dir)),
            None => mode.default_static_dir().filter(|dir| {
                let exists = dir.is_dir();
                if !exists {
                    tracing::warn!(
                        "Default static directory '{}' not found, static assets disabled",
                        dir.display()
                    );
                }
                exists
            }),
        };

        Ok(Self {
            mode,
            host: args.host,
            port: args.port.unwrap_or_else(|| mode.default_port()),
            static_dir,
            reap_empty_rooms: args.reap_empty_rooms,
        })
    }
}
