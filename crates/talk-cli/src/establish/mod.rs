//! Connection establishment for both roles
//!
//! Each side produces either an accepted [`Session`] or a rejection. Setup
//! failures are fatal and never retried.

pub mod client;
pub mod prompt;
pub mod server;

pub use client::{connect, establish_client, request_talk, resolve};
pub use prompt::StdinPrompt;
pub use server::{accept_one, bind_listener, establish_server, negotiate};

use crate::session::Session;

/// Result of a handshake that completed without error
#[derive(Debug)]
pub enum Established<S> {
    /// Verdict was `ok`; the dialogue can start
    Accepted(Session<S>),
    /// The server's operator declined
    Rejected {
        /// Who was declined, or who declined us
        peer: String,
    },
}
