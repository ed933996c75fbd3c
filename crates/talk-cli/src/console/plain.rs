//! Line-mode console on plain stdin/stdout (`-N`)

use std::io::{self, Read, Stdout, Write};

use async_trait::async_trait;
use tokio::sync::mpsc;

use talk_core::traits::Console;
use talk_protocol::MAX_LINE;

use super::input::InputBuffer;

/// Chunks read from local input; `Err` ends input with an error
pub type InputChunk = io::Result<Vec<u8>>;

/// Console that echoes nothing and prints peer text straight to a writer
pub struct PlainConsole<W: Write + Send = Stdout> {
    rx: mpsc::Receiver<InputChunk>,
    input: InputBuffer,
    writer: W,
    verbosity: u8,
}

impl PlainConsole<Stdout> {
    /// Console reading the process's stdin and writing to stdout
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::channel::<InputChunk>(64);

        // Detached thread: a read blocked on stdin must not hold up shutdown
        std::thread::spawn(move || {
            let stdin = io::stdin();
            let mut buf = [0u8; MAX_LINE];
            loop {
                let chunk = match stdin.lock().read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => Ok(buf[..n].to_vec()),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => Err(e),
                };
                let failed = chunk.is_err();
                if tx.blocking_send(chunk).is_err() || failed {
                    break;
                }
            }
        });

        Self::with_parts(rx, io::stdout())
    }
}

impl<W: Write + Send> PlainConsole<W> {
    /// Build a console from an input channel and an output sink.
    ///
    /// Closing the sending half of `rx` is end of input.
    pub fn with_parts(rx: mpsc::Receiver<InputChunk>, writer: W) -> Self {
        Self {
            rx,
            input: InputBuffer::new(),
            writer,
            verbosity: 0,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn absorb(&mut self, chunk: Option<InputChunk>) -> io::Result<()> {
        match chunk {
            Some(Ok(bytes)) => {
                self.input.push(&bytes);
                Ok(())
            }
            Some(Err(e)) => {
                self.input.set_eof();
                Err(e)
            }
            None => {
                if self.verbosity > 0 {
                    tracing::info!("End of local input");
                }
                self.input.set_eof();
                Ok(())
            }
        }
    }
}

#[async_trait]
impl<W: Write + Send> Console for PlainConsole<W> {
    fn set_verbosity(&mut self, level: u8) {
        self.verbosity = level;
    }

    fn start_windowing(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn stop_windowing(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    async fn update_input_buffer(&mut self) -> io::Result<()> {
        if self.input.has_whole_line() {
            return Ok(());
        }

        let chunk = self.rx.recv().await;
        self.absorb(chunk)?;

        while !self.input.has_hit_eof() {
            match self.rx.try_recv() {
                Ok(chunk) => self.absorb(Some(chunk))?,
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.absorb(None)?;
                    break;
                }
            }
        }
        Ok(())
    }

    fn has_whole_line(&self) -> bool {
        self.input.has_whole_line()
    }

    fn read_from_input(&mut self, buf: &mut [u8]) -> usize {
        self.input.take_line(buf)
    }

    fn has_hit_eof(&self) -> bool {
        self.input.has_hit_eof()
    }

    fn write_to_output(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.writer.flush()
    }
}
