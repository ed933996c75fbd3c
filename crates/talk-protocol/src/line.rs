//! Dialogue chunks
//!
//! After the handshake both peers exchange raw text chunks with no envelope.
//! Each chunk is held in a [`LineBuffer`] that is overwritten on every
//! transfer.

/// Maximum size of one dialogue chunk
pub const MAX_LINE: usize = 1024;

/// Termination keyword; a chunk starting with it ends the dialogue
pub const BYE_KEYWORD: &[u8] = b"bye";

/// Notice rendered when the peer ends the dialogue
pub const CONNECTION_CLOSED_NOTICE: &str = "Connection closed. ^C to terminate.";

/// Returns true if `chunk` starts with the termination keyword.
///
/// The match is case-sensitive and anchored at the first byte, so `byebye`
/// terminates and `goodbye` does not.
pub fn is_termination(chunk: &[u8]) -> bool {
    chunk.starts_with(BYE_KEYWORD)
}

/// Bounded buffer holding one inbound or outbound chunk
#[derive(Clone)]
pub struct LineBuffer {
    buf: [u8; MAX_LINE],
    len: usize,
}

impl LineBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            buf: [0; MAX_LINE],
            len: 0,
        }
    }

    /// The whole backing storage, for a read to fill.
    ///
    /// Follow up with [`LineBuffer::set_len`].
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buf[..]
    }

    /// Record how many bytes the last fill produced, clamped to capacity
    pub fn set_len(&mut self, len: usize) {
        self.len = len.min(MAX_LINE);
    }

    /// Overwrite the contents with `data`, truncating to [`MAX_LINE`].
    ///
    /// Returns the number of bytes kept.
    pub fn fill_from(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(MAX_LINE);
        self.buf[..n].copy_from_slice(&data[..n]);
        self.len = n;
        n
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Whether the current chunk is the termination keyword
    pub fn is_termination(&self) -> bool {
        is_termination(self.as_bytes())
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LineBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineBuffer")
            .field("len", &self.len)
            .field("data", &String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}
