//! talk-core: Core abstractions and configuration for mytalk
//!
//! This crate provides the shared types, errors, configuration and the
//! collaborator traits used by the talk establishers and session loop.

pub mod config;
pub mod error;
pub mod identity;
pub mod traits;
pub mod types;

pub use error::{ConfigError, SessionError, SetupError, TalkError};
pub use types::{ConnectionRequest, Role, SessionState};
