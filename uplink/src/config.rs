//! Storj DCS Uplink client configuration.

use crate::error::{Error, Kind};
use crate::{helpers, Result};

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default dial timeout.
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(10);
/// Default maximum number of connections that the client keeps open at the same time.
pub const DEFAULT_MAX_CONCURRENT_CONNECTIONS: usize = 16;

/// An option for building a [`Config`].
///
/// Options are applied in order, so when several options set the same setting, the last one
/// wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opt {
    /// Directory used for storing temporary files. It disables the in-memory mode.
    TempDirectory(PathBuf),
    /// Only operate with memory, never off-loading data to disk.
    InMemory,
    /// Identifies the application which is contacting the satellites. It must not be empty nor
    /// contain control characters.
    UserAgent(String),
    /// How long the client waits for establishing a connection to peers. It must not be zero.
    DialTimeout(Duration),
    /// Maximum number of connections that the client keeps open at the same time. It must be
    /// greater than zero.
    MaxConcurrentConnections(usize),
    /// An option in its textual form.
    ///
    /// The recognized names and their values are:
    /// * `temp_directory`: a path.
    /// * `in_memory`: `true` or `false`; `false` sets the default temporary directory.
    /// * `user_agent`: a string.
    /// * `dial_timeout_ms`: milliseconds.
    /// * `max_concurrent_connections`: an integer.
    Named {
        /// The option name.
        name: String,
        /// The option value.
        value: String,
    },
}

impl Opt {
    /// Convenient constructor for a [`Self::Named`] option.
    pub fn named(name: &str, value: &str) -> Self {
        Self::Named {
            name: String::from(name),
            value: String::from(value),
        }
    }

    /// Resolves a [`Self::Named`] option to the option that it represents. Other options are
    /// returned as they are.
    fn resolve(self) -> Result<Self> {
        let (name, value) = match self {
            Self::Named { name, value } => (name, value),
            opt => return Ok(opt),
        };

        let invalid_value = |msg: &str| {
            Error::new_unsupported_option(&format!(
                "{} option has an invalid value. {}",
                name, msg
            ))
        };

        match name.as_str() {
            "temp_directory" => Ok(Self::TempDirectory(PathBuf::from(value))),
            "in_memory" => match value.parse::<bool>() {
                Ok(true) => Ok(Self::InMemory),
                Ok(false) => Ok(Self::TempDirectory(std::env::temp_dir())),
                Err(err) => Err(invalid_value(&err.to_string())),
            },
            "user_agent" => Ok(Self::UserAgent(value)),
            "dial_timeout_ms" => value
                .parse::<u64>()
                .map(|ms| Self::DialTimeout(Duration::from_millis(ms)))
                .map_err(|err| invalid_value(&err.to_string())),
            "max_concurrent_connections" => value
                .parse::<usize>()
                .map(Self::MaxConcurrentConnections)
                .map_err(|err| invalid_value(&err.to_string())),
            _ => Err(Error::new_unsupported_option(&format!(
                "{} option isn't supported",
                name
            ))),
        }
    }
}

/// Where the client stores temporary data.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Storage {
    Disk(PathBuf),
    InMemory,
}

/// Defines the configuration for opening a client context.
///
/// It's immutable; build it with [`Config::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where temporary data is stored.
    storage: Storage,
    /// Identifies the application how is contacting with the satellite.
    /// The user agent is used for statistics and for identifying the usage coming from associated
    /// partners.
    user_agent: String,
    /// Defines how long the client should wait for establishing a connection to peers.
    dial_timeout: Duration,
    max_concurrent_connections: usize,
}

impl Config {
    /// Builds a configuration applying `opts` in order over the defaults.
    ///
    /// The defaults are the system temporary directory, a user agent that identifies this
    /// crate, [`DEFAULT_DIAL_TIMEOUT`] and [`DEFAULT_MAX_CONCURRENT_CONNECTIONS`].
    ///
    /// It returns an [`UnsupportedOption`](Kind::UnsupportedOption) error if any option isn't
    /// known or has an invalid value.
    pub fn build(opts: impl IntoIterator<Item = Opt>) -> Result<Self> {
        opts.into_iter()
            .try_fold(Self::default(), |config, opt| config.apply(opt))
    }

    /// Returns a copy of this configuration with `opt` applied.
    fn apply(mut self, opt: Opt) -> Result<Self> {
        match opt.resolve()? {
            Opt::TempDirectory(dir) => self.storage = Storage::Disk(dir),
            Opt::InMemory => self.storage = Storage::InMemory,
            Opt::UserAgent(ua) => {
                if ua.is_empty() {
                    return Err(Error::new_unsupported_option("user_agent cannot be empty"));
                }

                helpers::check_text_fn_arg(Kind::UnsupportedOption, "user_agent", &ua)?;
                self.user_agent = ua;
            }
            Opt::DialTimeout(timeout) => {
                if timeout.is_zero() {
                    return Err(Error::new_unsupported_option("dial_timeout cannot be zero"));
                }

                self.dial_timeout = timeout;
            }
            Opt::MaxConcurrentConnections(max) => {
                if max == 0 {
                    return Err(Error::new_unsupported_option(
                        "max_concurrent_connections cannot be zero",
                    ));
                }

                self.max_concurrent_connections = max;
            }
            Opt::Named { .. } => unreachable!("BUG: named options are always resolved"),
        }

        Ok(self)
    }

    /// Returns the directory for temporary files or `None` when operating only in memory.
    pub fn temp_dir(&self) -> Option<&Path> {
        match &self.storage {
            Storage::Disk(dir) => Some(dir),
            Storage::InMemory => None,
        }
    }

    /// Returns if the configuration specifies to use only memory or not.
    pub fn is_in_memory(&self) -> bool {
        self.storage == Storage::InMemory
    }

    /// Returns the configured user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the configured dial timeout.
    pub fn dial_timeout(&self) -> Duration {
        self.dial_timeout
    }

    /// Returns the configured maximum number of concurrent connections.
    pub fn max_concurrent_connections(&self) -> usize {
        self.max_concurrent_connections
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: Storage::Disk(std::env::temp_dir()),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            max_concurrent_connections: DEFAULT_MAX_CONCURRENT_CONNECTIONS,
        }
    }
}
