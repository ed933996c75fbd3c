//! Console implementations: the split-screen window and plain line mode

mod input;
pub mod plain;
pub mod window;

pub use input::InputBuffer;
pub use plain::{InputChunk, PlainConsole};
pub use window::WindowedConsole;
