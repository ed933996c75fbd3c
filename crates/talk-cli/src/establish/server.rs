//! Server role: listen, accept one client, ask the operator

use std::net::SocketAddr;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio_util::codec::Framed;

use talk_core::config::{Options, Port};
use talk_core::error::{SessionError, SetupError, TalkError};
use talk_core::traits::Prompt;
use talk_core::{ConnectionRequest, Role};
use talk_protocol::{HandshakeCodec, HandshakeMessage, Verdict};

use super::Established;
use crate::output::print_info;
use crate::session::Session;

/// Bind `0.0.0.0:port` with address reuse and start listening
pub fn bind_listener(port: Port, backlog: u32) -> Result<TcpListener, SetupError> {
    let socket = TcpSocket::new_v4().map_err(SetupError::Socket)?;
    socket.set_reuseaddr(true).map_err(SetupError::Socket)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port.get()));
    socket.bind(addr).map_err(|source| SetupError::Bind {
        port: port.get(),
        source,
    })?;

    let listener = socket.listen(backlog).map_err(SetupError::Listen)?;
    tracing::info!("Listening on {}", addr);
    Ok(listener)
}

/// Listen on `port` and run the handshake with the first client to connect
pub async fn establish_server<P>(
    port: Port,
    options: &Options,
    prompt: &mut P,
) -> Result<Established<TcpStream>, TalkError>
where
    P: Prompt + ?Sized,
{
    tracing::info!("Activating server side");
    let listener = bind_listener(port, options.backlog)?;
    accept_one(listener, options, prompt).await
}

/// Accept exactly one connection, then stop listening
pub async fn accept_one<P>(
    listener: TcpListener,
    options: &Options,
    prompt: &mut P,
) -> Result<Established<TcpStream>, TalkError>
where
    P: Prompt + ?Sized,
{
    let (stream, addr) = listener.accept().await.map_err(SetupError::Accept)?;
    // Later clients are refused by the OS
    drop(listener);

    tracing::info!("New connection from: {}:{}", addr.ip(), addr.port());
    negotiate(stream, addr, options, prompt).await
}

/// Server half of the handshake on an accepted stream
pub async fn negotiate<S, P>(
    stream: S,
    addr: SocketAddr,
    options: &Options,
    prompt: &mut P,
) -> Result<Established<S>, TalkError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
    P: Prompt + ?Sized,
{
    let mut framed = Framed::new(stream, HandshakeCodec::new());

    let identity = match framed.next().await {
        Some(Ok(HandshakeMessage::Identity(identity))) => identity,
        Some(Ok(other)) => {
            tracing::warn!("Expected identity, got {:?}", other.message_type());
            return Err(SessionError::UnexpectedMessage {
                expected: "identity",
            }
            .into());
        }
        Some(Err(e)) => return Err(e.into()),
        None => return Err(SessionError::HandshakeClosed.into()),
    };

    let request = ConnectionRequest::new(&identity, addr);
    tracing::debug!("Talk request from {}", request);

    let verdict = if options.auto_accept {
        if options.verbose() {
            print_info("-a flag. Accepted connection.");
        }
        Verdict::Accepted
    } else if prompt.confirm(&request).await.map_err(SessionError::Input)? {
        Verdict::Accepted
    } else {
        Verdict::Rejected
    };

    framed.send(HandshakeMessage::verdict(verdict)).await?;

    if !verdict.is_accepted() {
        tracing::info!("Declined connection from {}", request);
        let mut stream = framed.into_inner();
        if let Err(e) = stream.shutdown().await {
            tracing::debug!("Shutdown after rejection failed: {}", e);
        }
        return Ok(Established::Rejected {
            peer: request.to_string(),
        });
    }

    let parts = framed.into_parts();
    Ok(Established::Accepted(Session::new(
        Role::Server,
        parts.io,
        request.identity,
        parts.read_buf.freeze(),
    )))
}
