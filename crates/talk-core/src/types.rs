//! Core domain types

use std::fmt;
use std::net::SocketAddr;

/// Which end of the conversation this process is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Listened and accepted the connection
    Server,
    /// Connected to a listening peer
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Server => write!(f, "Server"),
            Role::Client => write!(f, "Client"),
        }
    }
}

/// Session lifecycle state
///
/// `Establishing → Active → {PeerClosed | LocalClosed} → WaitingForSignal →
/// Terminated`. A local close exits right away; a peer close lingers in
/// `WaitingForSignal` until the operator interrupts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Handshake in progress
    Establishing,
    /// Dialogue loop running
    Active,
    /// Peer sent `bye` or hung up
    PeerClosed,
    /// Local `bye` or end of input
    LocalClosed,
    /// Dialogue over, waiting for the operator's interrupt
    WaitingForSignal,
    /// Done
    Terminated,
}

impl SessionState {
    /// Whether the dialogue loop should stop
    pub fn is_done(&self) -> bool {
        !matches!(self, SessionState::Establishing | SessionState::Active)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Establishing => write!(f, "establishing"),
            SessionState::Active => write!(f, "active"),
            SessionState::PeerClosed => write!(f, "peer-closed"),
            SessionState::LocalClosed => write!(f, "local-closed"),
            SessionState::WaitingForSignal => write!(f, "waiting-for-signal"),
            SessionState::Terminated => write!(f, "terminated"),
        }
    }
}

/// An incoming talk request awaiting the operator's decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    /// Identity sent by the client, decoded lossily
    pub identity: String,
    /// Where the connection came from
    pub addr: SocketAddr,
}

impl ConnectionRequest {
    /// Build a request from the raw identity bytes
    pub fn new(identity: &[u8], addr: SocketAddr) -> Self {
        Self {
            identity: String::from_utf8_lossy(identity).into_owned(),
            addr,
        }
    }
}

impl fmt::Display for ConnectionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.identity, self.addr.ip())
    }
}
