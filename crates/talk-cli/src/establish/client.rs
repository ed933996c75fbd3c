//! Client role: connect, introduce ourselves, wait for the verdict

use std::net::SocketAddr;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{lookup_host, TcpStream};
use tokio_util::codec::Framed;

use talk_core::config::{Options, Port};
use talk_core::error::{SessionError, SetupError, TalkError};
use talk_core::identity::local_username;
use talk_core::Role;
use talk_protocol::{HandshakeCodec, HandshakeMessage, Verdict};

use super::Established;
use crate::output::print_notice;
use crate::session::Session;

/// Resolve `host` to its addresses, in resolver order
pub async fn resolve(host: &str, port: Port) -> Result<Vec<SocketAddr>, SetupError> {
    let addrs: Vec<SocketAddr> = lookup_host((host, port.get()))
        .await
        .map_err(|source| SetupError::Resolve {
            host: host.to_string(),
            source,
        })?
        .collect();

    if addrs.is_empty() {
        return Err(SetupError::NoAddress(host.to_string()));
    }
    tracing::debug!("{} resolved to {:?}", host, addrs);
    Ok(addrs)
}

/// Connect to the first address that accepts
pub async fn connect(addrs: &[SocketAddr]) -> Result<TcpStream, SetupError> {
    let mut last_err = None;
    for &addr in addrs {
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                tracing::info!("Connected to {}", addr);
                return Ok(stream);
            }
            Err(source) => {
                tracing::debug!("Connect to {} failed: {}", addr, source);
                last_err = Some(SetupError::Connect { addr, source });
            }
        }
    }
    Err(last_err.unwrap_or_else(|| SetupError::NoAddress(String::new())))
}

/// Connect to `host:port` and ask for a talk session
pub async fn establish_client(
    host: &str,
    port: Port,
    options: &Options,
) -> Result<Established<TcpStream>, TalkError> {
    tracing::info!("Activating client side");
    let addrs = resolve(host, port).await?;
    let stream = connect(&addrs).await?;
    let username = local_username()?;

    let established = request_talk(stream, host, &username).await?;
    if options.verbose() && matches!(established, Established::Accepted(_)) {
        tracing::info!("ok received from {}", host);
    }
    Ok(established)
}

/// Client half of the handshake on a connected stream
pub async fn request_talk<S>(
    stream: S,
    host: &str,
    username: &str,
) -> Result<Established<S>, TalkError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let mut framed = Framed::new(stream, HandshakeCodec::new());
    framed.send(HandshakeMessage::identity(username)).await?;

    print_notice(&format!("Waiting for a response from {}", host));

    let token = match framed.next().await {
        Some(Ok(HandshakeMessage::Verdict(token))) => token,
        Some(Ok(other)) => {
            tracing::warn!("Expected verdict, got {:?}", other.message_type());
            return Err(SessionError::UnexpectedMessage { expected: "verdict" }.into());
        }
        Some(Err(e)) => return Err(e.into()),
        None => return Err(SessionError::HandshakeClosed.into()),
    };

    if !Verdict::from_token(&token).is_accepted() {
        print_notice(&format!("{} declined connection.", host));
        return Ok(Established::Rejected {
            peer: host.to_string(),
        });
    }

    let parts = framed.into_parts();
    Ok(Established::Accepted(Session::new(
        Role::Client,
        parts.io,
        host,
        parts.read_buf.freeze(),
    )))
}
