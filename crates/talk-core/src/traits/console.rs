//! Display/input collaborator

use std::io;

use async_trait::async_trait;

/// The presentation layer a talk session reads lines from and renders into.
///
/// Input is buffered by the console until a whole line is available; the
/// session only pulls complete lines. Implementations decide how text is
/// drawn (split-screen window or plain stdout).
#[async_trait]
pub trait Console: Send {
    /// Set how chatty the console is about its own state
    fn set_verbosity(&mut self, level: u8);

    /// Take over the terminal, if this console draws a window
    fn start_windowing(&mut self) -> io::Result<()>;

    /// Give the terminal back. Safe to call more than once.
    fn stop_windowing(&mut self) -> io::Result<()>;

    /// Wait for local input and absorb everything pending into the line
    /// buffer.
    ///
    /// Must be cancel safe: the session races it against the socket.
    async fn update_input_buffer(&mut self) -> io::Result<()>;

    /// Whether a complete line (or end of input) is buffered
    fn has_whole_line(&self) -> bool;

    /// Move the next buffered line into `buf`, returning its length.
    ///
    /// At most `buf.len()` bytes are moved; the rest stays buffered.
    fn read_from_input(&mut self, buf: &mut [u8]) -> usize;

    /// Whether the operator ended input (e.g. Ctrl-D)
    fn has_hit_eof(&self) -> bool;

    /// Render bytes received from the peer
    fn write_to_output(&mut self, data: &[u8]) -> io::Result<()>;
}
