//! Tokio codec for framed handshake messages

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ProtocolError;
use crate::frame::{FrameHeader, MAX_PAYLOAD_SIZE};
use crate::message::{HandshakeMessage, MessageType};

/// Codec for encoding/decoding handshake frames
///
/// Used through `tokio_util::codec::Framed` for the identity/verdict
/// exchange only. Once the handshake is over, `Framed::into_parts` hands back
/// the stream together with any dialogue bytes already read.
#[derive(Debug, Default)]
pub struct HandshakeCodec {
    /// Current header being decoded (if any)
    pending_header: Option<FrameHeader>,
}

impl HandshakeCodec {
    /// Create a new codec
    pub fn new() -> Self {
        Self {
            pending_header: None,
        }
    }
}

impl Decoder for HandshakeCodec {
    type Item = HandshakeMessage;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let header = match self.pending_header.take() {
            Some(h) => h,
            None => match FrameHeader::decode(src)? {
                Some(h) => h,
                None => return Ok(None),
            },
        };

        let payload_len = header.payload_length as usize;
        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload_len,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        if src.len() < payload_len {
            self.pending_header = Some(header);
            src.reserve(payload_len - src.len());
            return Ok(None);
        }

        let payload = src.split_to(payload_len).freeze();
        tracing::trace!(
            message_type = ?header.message_type,
            len = payload_len,
            "decoded handshake frame"
        );

        Ok(Some(match header.message_type {
            MessageType::Identity => HandshakeMessage::Identity(payload),
            MessageType::Verdict => HandshakeMessage::Verdict(payload),
        }))
    }
}

impl Encoder<HandshakeMessage> for HandshakeCodec {
    type Error = ProtocolError;

    fn encode(&mut self, message: HandshakeMessage, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let payload = message.payload();
        let payload_len = payload.len();

        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload_len,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let header = FrameHeader::new(message.message_type(), payload_len as u16);
        header.encode(dst);
        dst.extend_from_slice(payload);

        Ok(())
    }
}
