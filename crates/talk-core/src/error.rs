//! Core error types for mytalk

use std::net::SocketAddr;
use std::path::PathBuf;

use talk_protocol::ProtocolError;
use thiserror::Error;

/// Top-level error type for a talk process
///
/// Every variant is fatal. Negotiated outcomes (rejection, `bye`, peer
/// hang-up, interrupt) are not errors and never show up here.
#[derive(Error, Debug)]
pub enum TalkError {
    /// Protocol error
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Connection setup error
    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    /// Dialogue error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TalkError {
    /// Process exit status for this error.
    ///
    /// A failure to resolve the local login name exits with -1; everything
    /// else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            TalkError::Setup(SetupError::Identity(_)) => -1,
            _ => 1,
        }
    }
}

/// Errors while obtaining a connection. Never retried.
#[derive(Error, Debug)]
pub enum SetupError {
    /// Hostname lookup failed
    #[error("problem getting hostname {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// Hostname resolved to nothing
    #[error("no addresses found for {0}")]
    NoAddress(String),

    /// Socket creation or option failure
    #[error("unable to create socket: {0}")]
    Socket(#[source] std::io::Error),

    /// Bind failure
    #[error("unable to bind to port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// Listen failure
    #[error("problem listening: {0}")]
    Listen(#[source] std::io::Error),

    /// Accept failure
    #[error("problem accepting: {0}")]
    Accept(#[source] std::io::Error),

    /// Connect failure
    #[error("error connecting to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Local login name unavailable
    #[error("problem getting username: {0}")]
    Identity(String),
}

/// Errors during the handshake or the dialogue. Fatal; no recovery.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Sending to the peer failed
    #[error("problem sending: {0}")]
    Send(#[source] std::io::Error),

    /// Receiving from the peer failed
    #[error("problem receiving: {0}")]
    Receive(#[source] std::io::Error),

    /// Reading local input failed
    #[error("problem reading input: {0}")]
    Input(#[source] std::io::Error),

    /// Rendering to the display failed
    #[error("problem writing output: {0}")]
    Output(#[source] std::io::Error),

    /// Peer hung up before the handshake finished
    #[error("connection closed during handshake")]
    HandshakeClosed,

    /// Peer sent the wrong handshake message
    #[error("unexpected handshake message: expected {expected}")]
    UnexpectedMessage { expected: &'static str },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Wrong number of positional arguments
    #[error("expected [hostname] port")]
    Usage,

    /// Port is not an integer in range
    #[error("invalid port number: {0}")]
    InvalidPort(String),

    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_failure_exits_minus_one() {
        let err = TalkError::from(SetupError::Identity("no passwd entry".into()));
        assert_eq!(err.exit_code(), -1);
    }

    #[test]
    fn test_other_failures_exit_one() {
        let refused = std::io::Error::from(std::io::ErrorKind::ConnectionRefused);
        let err = TalkError::from(SetupError::Connect {
            addr: "127.0.0.1:6000".parse().unwrap(),
            source: refused,
        });
        assert_eq!(err.exit_code(), 1);
        assert_eq!(TalkError::from(SessionError::HandshakeClosed).exit_code(), 1);
        assert_eq!(TalkError::from(ConfigError::Usage).exit_code(), 1);
    }

    #[test]
    fn test_error_messages() {
        let err = SetupError::Bind {
            port: 6000,
            source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
        };
        assert!(err.to_string().starts_with("unable to bind to port 6000"));
    }
}
