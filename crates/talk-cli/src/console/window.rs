//! Split-screen console
//!
//! The top pane shows what the operator typed, with the line being edited at
//! the bottom of it. The bottom pane shows what the peer sent. The terminal is
//! in raw mode while the window is up, so line editing, Ctrl-D and Ctrl-C are
//! handled here.

use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::time::Duration;

use async_trait::async_trait;
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{queue, ExecutableCommand};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use talk_core::traits::Console;
use talk_protocol::MAX_LINE;

use super::input::InputBuffer;

/// Lines of history kept per pane
const SCROLLBACK: usize = 500;

/// Poll interval of the key reader thread
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Scrolling text pane
#[derive(Debug)]
pub struct Pane {
    /// Finished lines followed by the open (unterminated) line
    lines: VecDeque<String>,
    limit: usize,
}

impl Pane {
    pub fn new(limit: usize) -> Self {
        let mut lines = VecDeque::new();
        lines.push_back(String::new());
        Self {
            lines,
            limit: limit.max(1),
        }
    }

    /// Append text; `\n` starts a new line and `\r` is dropped
    pub fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '\n' => {
                    self.lines.push_back(String::new());
                    while self.lines.len() > self.limit {
                        self.lines.pop_front();
                    }
                }
                '\r' => {}
                c => {
                    if let Some(open) = self.lines.back_mut() {
                        open.push(c);
                    }
                }
            }
        }
    }

    /// The last `n` lines, the open line included
    pub fn tail(&self, n: usize) -> Vec<&str> {
        let skip = self.lines.len().saturating_sub(n);
        self.lines.iter().skip(skip).map(String::as_str).collect()
    }
}

/// Console drawing a split-screen window on the terminal
pub struct WindowedConsole {
    cancel: CancellationToken,
    events: Option<mpsc::Receiver<Event>>,
    input: InputBuffer,
    editing: String,
    local: Pane,
    remote: Pane,
    verbosity: u8,
    active: bool,
    stdout: Stdout,
}

impl WindowedConsole {
    /// Ctrl-C pressed while the window is up cancels `cancel`
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            events: None,
            input: InputBuffer::new(),
            editing: String::new(),
            local: Pane::new(SCROLLBACK),
            remote: Pane::new(SCROLLBACK),
            verbosity: 0,
            active: false,
            stdout: io::stdout(),
        }
    }

    fn spawn_reader(&mut self) {
        let (event_tx, event_rx) = mpsc::channel::<Event>(256);
        let cancel = self.cancel.clone();

        tokio::task::spawn_blocking(move || {
            while !event_tx.is_closed() {
                if !event::poll(POLL_INTERVAL).unwrap_or(false) {
                    continue;
                }
                let Ok(evt) = event::read() else {
                    continue;
                };
                if intercept(&evt, &cancel) {
                    continue;
                }
                if event_tx.blocking_send(evt).is_err() {
                    break;
                }
            }
        });

        self.events = Some(event_rx);
    }

    fn handle_event(&mut self, evt: Event) {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = evt
        else {
            return;
        };

        match code {
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
                if !self.editing.is_empty() {
                    let line = std::mem::take(&mut self.editing);
                    self.local.push_text(&line);
                    self.local.push_text("\n");
                    self.input.push(line.as_bytes());
                }
                self.input.set_eof();
            }
            KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => {}
            KeyCode::Char(c) => {
                // Room for the newline
                if self.editing.len() + c.len_utf8() < MAX_LINE {
                    self.editing.push(c);
                }
            }
            KeyCode::Tab => {
                if self.editing.len() + 1 < MAX_LINE {
                    self.editing.push('\t');
                }
            }
            KeyCode::Backspace => {
                self.editing.pop();
            }
            KeyCode::Enter => {
                let mut line = std::mem::take(&mut self.editing);
                line.push('\n');
                self.local.push_text(&line);
                self.input.push(line.as_bytes());
            }
            _ => {}
        }
    }

    fn redraw(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        let (cols, rows) = terminal::size()?;
        let cols = cols as usize;
        let rows = rows.max(3);
        let top_rows = (rows - 1) / 2;
        let bottom_rows = rows - 1 - top_rows;

        queue!(self.stdout, Clear(ClearType::All))?;

        let mut top = self.local.tail(top_rows as usize);
        if let Some(last) = top.last_mut() {
            *last = self.editing.as_str();
        }
        for (row, line) in top.iter().enumerate() {
            queue!(self.stdout, MoveTo(0, row as u16), Print(clip(line, cols)))?;
        }

        let divider = if self.verbosity > 0 {
            let hint = " Enter: send | Ctrl-D: end input | Ctrl-C: quit ";
            format!("{}{}", clip(hint, cols), "-".repeat(cols.saturating_sub(hint.len())))
        } else {
            "-".repeat(cols)
        };
        queue!(self.stdout, MoveTo(0, top_rows), Print(divider))?;

        for (i, line) in self.remote.tail(bottom_rows as usize).iter().enumerate() {
            queue!(
                self.stdout,
                MoveTo(0, top_rows + 1 + i as u16),
                Print(clip(line, cols))
            )?;
        }

        let cursor_row = top.len().saturating_sub(1) as u16;
        let cursor_col = self.editing.chars().count().min(cols.saturating_sub(1)) as u16;
        queue!(self.stdout, MoveTo(cursor_col, cursor_row))?;
        self.stdout.flush()
    }
}

/// Handle keys that never reach the line editor.
///
/// Raw mode turns Ctrl-C into a key press, so it cancels the interrupt token
/// here. Returns true if the event was consumed.
fn intercept(evt: &Event, cancel: &CancellationToken) -> bool {
    match evt {
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) if modifiers.contains(KeyModifiers::CONTROL) => {
            tracing::debug!("Ctrl+C in window");
            cancel.cancel();
            true
        }
        _ => false,
    }
}

fn clip(line: &str, cols: usize) -> &str {
    match line.char_indices().nth(cols) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

#[async_trait]
impl Console for WindowedConsole {
    fn set_verbosity(&mut self, level: u8) {
        self.verbosity = level;
    }

    fn start_windowing(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        terminal::enable_raw_mode()?;
        self.stdout.execute(EnterAlternateScreen)?;
        self.active = true;
        self.spawn_reader();
        self.redraw()
    }

    fn stop_windowing(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        // Closing the channel stops the reader thread
        self.events = None;
        self.stdout.execute(LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    async fn update_input_buffer(&mut self) -> io::Result<()> {
        loop {
            if self.input.has_whole_line() {
                return Ok(());
            }

            let Some(events) = self.events.as_mut() else {
                self.input.set_eof();
                return Ok(());
            };

            match events.recv().await {
                Some(evt) => {
                    self.handle_event(evt);
                    while let Some(events) = self.events.as_mut() {
                        match events.try_recv() {
                            Ok(evt) => self.handle_event(evt),
                            Err(_) => break,
                        }
                    }
                    self.redraw()?;
                }
                None => {
                    self.input.set_eof();
                }
            }
        }
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
        self.remote.push_text(&String::from_utf8_lossy(data));
        self.redraw()
    }
}

impl Drop for WindowedConsole {
    fn drop(&mut self) {
        let _ = self.stop_windowing();
    }
}
