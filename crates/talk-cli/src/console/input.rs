//! Line assembly for local input

/// Bytes typed by the operator, waiting to be pulled out a line at a time
#[derive(Debug, Default)]
pub struct InputBuffer {
    data: Vec<u8>,
    eof: bool,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw input
    pub fn push(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Mark the end of local input; whatever is buffered becomes the last line
    pub fn set_eof(&mut self) {
        self.eof = true;
    }

    /// A newline is buffered, or input ended
    pub fn has_whole_line(&self) -> bool {
        self.eof || self.data.contains(&b'\n')
    }

    /// Move the next line (newline included) into `buf`.
    ///
    /// Without a newline, everything buffered is taken. Lines longer than
    /// `buf` are split; the remainder stays for the next call.
    pub fn take_line(&mut self, buf: &mut [u8]) -> usize {
        let line_end = self
            .data
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(self.data.len());
        let n = line_end.min(buf.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data.drain(..n);
        n
    }

    /// Input ended and nothing is left to send
    pub fn has_hit_eof(&self) -> bool {
        self.eof && self.data.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
