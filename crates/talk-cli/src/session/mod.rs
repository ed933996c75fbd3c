//! The talk session: one accepted connection and its dialogue

pub mod multiplexer;

pub use multiplexer::{run, Outcome, Watch};

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use talk_core::error::{SessionError, TalkError};
use talk_core::traits::Console;
use talk_core::{Role, SessionState};

/// A conversation with exactly one peer.
///
/// Owns the connection for its whole life. The stream is shut down and
/// dropped on the first terminal condition; after that the session only
/// tracks state.
#[derive(Debug)]
pub struct Session<S> {
    role: Role,
    stream: Option<S>,
    peer_name: String,
    state: SessionState,
    /// Dialogue bytes read together with the last handshake frame
    pending: Bytes,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap a stream whose handshake was accepted
    pub fn new(role: Role, stream: S, peer_name: impl Into<String>, pending: Bytes) -> Self {
        Self {
            role,
            stream: Some(stream),
            peer_name: peer_name.into(),
            state: SessionState::Establishing,
            pending,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Hostname (client side) or accepted username (server side)
    pub fn peer_name(&self) -> &str {
        &self.peer_name
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the connection is still open
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Send one chunk in full
    pub(crate) async fn send(&mut self, data: &[u8]) -> Result<(), SessionError> {
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;
        stream.write_all(data).await.map_err(SessionError::Send)?;
        stream.flush().await.map_err(SessionError::Send)
    }

    /// Shut down and drop the connection. Does nothing if already closed.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                tracing::debug!("Shutdown of connection to {} failed: {}", self.peer_name, e);
            }
            tracing::debug!("Closed connection to {}", self.peer_name);
        }
    }

    /// Hold the finished session until the operator interrupts.
    pub async fn wait_for_interrupt(&mut self, cancel: &CancellationToken) {
        self.state = SessionState::WaitingForSignal;
        tracing::debug!("Dialogue over, waiting for interrupt");
        cancel.cancelled().await;
        self.state = SessionState::Terminated;
    }
}

fn not_connected() -> SessionError {
    SessionError::Send(std::io::Error::from(std::io::ErrorKind::NotConnected))
}

/// Run a whole dialogue on `console`: start the window, multiplex until the
/// dialogue ends, linger after a peer close until interrupted, then restore
/// the terminal.
pub async fn converse<S, C>(
    mut session: Session<S>,
    mut console: C,
    verbosity: u8,
    cancel: &CancellationToken,
) -> Result<Outcome, TalkError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
    C: Console,
{
    console.set_verbosity(verbosity);
    console.start_windowing().map_err(SessionError::Output)?;

    let outcome = match run(&mut session, &mut console, cancel).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let _ = console.stop_windowing();
            session.close().await;
            return Err(e);
        }
    };

    if outcome == Outcome::PeerClosed {
        session.wait_for_interrupt(cancel).await;
    }
    session.state = SessionState::Terminated;

    console.stop_windowing().map_err(SessionError::Output)?;
    Ok(outcome)
}
