//! Run mode selected from the command line

use std::fmt;

use super::TalkConfig;
use crate::error::ConfigError;
use crate::types::Role;

/// Lowest accepted port
pub const PORT_MIN: u16 = 1024;

/// Highest accepted port
pub const PORT_MAX: u16 = 65535;

/// A TCP port in `[PORT_MIN, PORT_MAX]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Port(u16);

impl Port {
    /// Validate a numeric port
    pub fn new(value: i64) -> Result<Self, ConfigError> {
        if value < i64::from(PORT_MIN) || value > i64::from(PORT_MAX) {
            return Err(ConfigError::InvalidPort(value.to_string()));
        }
        Ok(Self(value as u16))
    }

    /// Parse a port argument. Anything but a plain integer in range is rejected.
    pub fn parse(arg: &str) -> Result<Self, ConfigError> {
        let value: i64 = arg
            .parse()
            .map_err(|_| ConfigError::InvalidPort(arg.to_string()))?;
        Self::new(value)
    }

    pub fn get(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Options shared by both roles, merged from flags and the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Number of `-v` flags
    pub verbosity: u8,
    /// Skip the accept prompt (server only)
    pub auto_accept: bool,
    /// Use the split-screen window instead of plain stdout
    pub windowing: bool,
    /// Listen backlog (server only)
    pub backlog: u32,
}

impl Options {
    /// Merge command-line flags over file settings
    pub fn from_flags(verbosity: u8, auto_accept: bool, no_windowing: bool, file: &TalkConfig) -> Self {
        Self {
            verbosity,
            auto_accept: auto_accept || file.auto_accept,
            windowing: file.windowing && !no_windowing,
            backlog: file.backlog,
        }
    }

    pub fn verbose(&self) -> bool {
        self.verbosity > 0
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::from_flags(0, false, false, &TalkConfig::default())
    }
}

/// What this process should do, built once from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Listen on `port` and wait for one client
    Server { port: Port, options: Options },
    /// Connect to `host:port`
    Client {
        host: String,
        port: Port,
        options: Options,
    },
}

impl Mode {
    /// Select the mode from positional arguments.
    ///
    /// `[port]` is server mode, `[hostname, port]` is client mode; any other
    /// count is a usage error.
    pub fn from_positionals(positionals: &[String], options: Options) -> Result<Self, ConfigError> {
        match positionals {
            [port] => Ok(Mode::Server {
                port: Port::parse(port)?,
                options,
            }),
            [host, port] => Ok(Mode::Client {
                host: host.clone(),
                port: Port::parse(port)?,
                options,
            }),
            _ => Err(ConfigError::Usage),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Mode::Server { .. } => Role::Server,
            Mode::Client { .. } => Role::Client,
        }
    }

    pub fn port(&self) -> Port {
        match self {
            Mode::Server { port, .. } | Mode::Client { port, .. } => *port,
        }
    }

    pub fn options(&self) -> &Options {
        match self {
            Mode::Server { options, .. } | Mode::Client { options, .. } => options,
        }
    }

    /// Remote hostname, if any
    pub fn host(&self) -> Option<&str> {
        match self {
            Mode::Server { .. } => None,
            Mode::Client { host, .. } => Some(host),
        }
    }
}
