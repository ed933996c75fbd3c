//! Handshake messages for the mytalk protocol
//!
//! # Message Flow
//!
//! 1. Client connects and sends `Identity` carrying its login name
//! 2. Server answers with `Verdict`: the `ok` token on acceptance, the
//!    `not ok` token on rejection
//! 3. Dialogue: raw text chunks flow in both directions (see `line.rs`)
//! 4. A chunk starting with `bye` ends the dialogue; there is no reply
//!
//! The client only checks that the verdict starts with the `ok` token, so any
//! other payload, of any length, counts as a rejection.

use bytes::Bytes;

/// Token sent by the server to accept a connection
pub const OK_TOKEN: &[u8] = b"ok";

/// Token sent by the server to reject a connection
pub const NOT_OK_TOKEN: &[u8] = b"not ok";

/// Message type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    /// Login name of the connecting user (client → server)
    Identity = 0x01,
    /// Accept/reject token (server → client)
    Verdict = 0x02,
}

impl MessageType {
    /// Convert to u8
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Identity),
            0x02 => Some(Self::Verdict),
            _ => None,
        }
    }
}

/// The server's decision on a connection request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The operator (or `-a`) accepted the connection
    Accepted,
    /// The operator declined the connection
    Rejected,
}

impl Verdict {
    /// Interpret a received verdict payload.
    ///
    /// Accepted iff the payload starts with [`OK_TOKEN`].
    pub fn from_token(token: &[u8]) -> Self {
        if token.starts_with(OK_TOKEN) {
            Self::Accepted
        } else {
            Self::Rejected
        }
    }

    /// The token sent on the wire for this verdict
    pub fn token(&self) -> &'static [u8] {
        match self {
            Self::Accepted => OK_TOKEN,
            Self::Rejected => NOT_OK_TOKEN,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Handshake messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeMessage {
    /// Opaque identity bytes, normally the sender's login name
    Identity(Bytes),

    /// Raw verdict token; decode with [`Verdict::from_token`]
    Verdict(Bytes),
}

impl HandshakeMessage {
    /// Build an identity message from a login name
    pub fn identity(name: &str) -> Self {
        Self::Identity(Bytes::copy_from_slice(name.as_bytes()))
    }

    /// Build a verdict message carrying the verdict's token
    pub fn verdict(verdict: Verdict) -> Self {
        Self::Verdict(Bytes::from_static(verdict.token()))
    }

    /// Get the message type for this message
    pub fn message_type(&self) -> MessageType {
        match self {
            HandshakeMessage::Identity(_) => MessageType::Identity,
            HandshakeMessage::Verdict(_) => MessageType::Verdict,
        }
    }

    /// Payload bytes carried by this message
    pub fn payload(&self) -> &Bytes {
        match self {
            HandshakeMessage::Identity(bytes) | HandshakeMessage::Verdict(bytes) => bytes,
        }
    }
}
