//! mytalk: two-party terminal chat over TCP
//!
//! One process listens and accepts a single client; after a short handshake
//! both sides exchange lines until either types `bye`.

pub mod console;
pub mod establish;
pub mod output;
pub mod session;
pub mod signal;
