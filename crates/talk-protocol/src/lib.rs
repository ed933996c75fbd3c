//! talk-protocol: Wire protocol for mytalk
//!
//! This crate defines the framed handshake (identity, then verdict) and the
//! raw dialogue chunks exchanged between the two peers of a talk session.

pub mod codec;
pub mod error;
pub mod frame;
pub mod line;
pub mod message;

pub use codec::HandshakeCodec;
pub use error::ProtocolError;
pub use frame::{FrameHeader, HEADER_SIZE, MAX_PAYLOAD_SIZE};
pub use line::{is_termination, LineBuffer, BYE_KEYWORD, CONNECTION_CLOSED_NOTICE, MAX_LINE};
pub use message::{HandshakeMessage, MessageType, Verdict, NOT_OK_TOKEN, OK_TOKEN};
