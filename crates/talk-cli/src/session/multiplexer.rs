//! Duplex dialogue loop
//!
//! Each iteration waits, with no timeout, on the two members of the watch set
//! (local input and the connection) plus the interrupt token, then handles
//! whichever fired. The watch set always has exactly these two members.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio_util::sync::CancellationToken;

use talk_core::error::{SessionError, TalkError};
use talk_core::traits::Console;
use talk_core::SessionState;
use talk_protocol::{LineBuffer, CONNECTION_CLOSED_NOTICE};

use super::Session;

/// Readiness sources polled each iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Watch {
    /// Operator keyboard
    Local,
    /// The peer connection
    Remote,
}

/// How the dialogue ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Local `bye` or end of input; exit right away
    LocalClosed,
    /// Peer sent `bye` or hung up; linger until interrupted
    PeerClosed,
    /// Operator interrupted mid-dialogue
    Interrupted,
}

enum Wakeup {
    Ready(Watch, io::Result<usize>),
    Interrupt,
}

/// Multiplex `console` and the session's connection until the dialogue ends.
pub async fn run<S, C>(
    session: &mut Session<S>,
    console: &mut C,
    cancel: &CancellationToken,
) -> Result<Outcome, TalkError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
    C: Console + ?Sized,
{
    let mut inbound = LineBuffer::new();
    let mut outbound = LineBuffer::new();

    session.state = SessionState::Active;
    tracing::info!(
        role = %session.role,
        peer = %session.peer_name,
        "Dialogue started"
    );

    let pending = std::mem::take(&mut session.pending);
    if !pending.is_empty() {
        console
            .write_to_output(&pending)
            .map_err(SessionError::Output)?;
        inbound.fill_from(&pending);
        if inbound.is_termination() {
            return Ok(peer_closed(session, console).await?);
        }
    }

    while !session.state.is_done() {
        let wakeup = {
            let stream = session
                .stream
                .as_mut()
                .ok_or_else(|| SessionError::Receive(io::ErrorKind::NotConnected.into()))?;

            tokio::select! {
                _ = cancel.cancelled() => Wakeup::Interrupt,
                res = console.update_input_buffer() => Wakeup::Ready(Watch::Local, res.map(|_| 0)),
                res = stream.read(inbound.spare_mut()) => Wakeup::Ready(Watch::Remote, res),
            }
        };

        match wakeup {
            Wakeup::Interrupt => {
                tracing::debug!("Interrupted during dialogue");
                session.close().await;
                session.state = SessionState::Terminated;
                return Ok(Outcome::Interrupted);
            }

            Wakeup::Ready(Watch::Local, res) => {
                res.map_err(SessionError::Input)?;
                if console.has_whole_line() {
                    let len = console.read_from_input(outbound.spare_mut());
                    outbound.set_len(len);
                    tracing::trace!(len, "sending line");
                    session.send(outbound.as_bytes()).await?;

                    if console.has_hit_eof() {
                        tracing::debug!("Local input ended");
                        return Ok(local_closed(session).await);
                    }
                }
            }

            Wakeup::Ready(Watch::Remote, res) => {
                let n = res.map_err(SessionError::Receive)?;
                if n == 0 {
                    tracing::debug!("{} closed the connection", session.peer_name);
                    inbound.clear();
                    return Ok(peer_closed(session, console).await?);
                }
                inbound.set_len(n);
                tracing::trace!(len = n, "received chunk");
                console
                    .write_to_output(inbound.as_bytes())
                    .map_err(SessionError::Output)?;
            }
        }

        if outbound.is_termination() {
            tracing::debug!("Sent termination keyword");
            return Ok(local_closed(session).await);
        }
        if inbound.is_termination() {
            tracing::debug!("{} sent termination keyword", session.peer_name);
            return Ok(peer_closed(session, console).await?);
        }
    }

    // Only reachable if the session was already finished when called
    Ok(match session.state {
        SessionState::PeerClosed => Outcome::PeerClosed,
        _ => Outcome::LocalClosed,
    })
}

async fn local_closed<S>(session: &mut Session<S>) -> Outcome
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    session.close().await;
    session.state = SessionState::LocalClosed;
    Outcome::LocalClosed
}

async fn peer_closed<S, C>(session: &mut Session<S>, console: &mut C) -> Result<Outcome, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
    C: Console + ?Sized,
{
    console
        .write_to_output(format!("{}\n", CONNECTION_CLOSED_NOTICE).as_bytes())
        .map_err(SessionError::Output)?;
    session.close().await;
    session.state = SessionState::PeerClosed;
    Ok(Outcome::PeerClosed)
}
