//! Line framing over the raw byte stream.
//!
//! The wire terminator is a newline with one optional adjacent carriage
//! return (servers send `\n\r`); the codec strips both. Lines longer than
//! the configured maximum fail the stream, which the dispatcher treats as
//! an unrecoverable disconnect.

use std::io;

use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::error::ClientError;

pub(crate) struct LineCodec {
    max_length: usize,
    /// Start of the unsearched region of the buffer, so repeated decode
    /// calls do not rescan bytes already known to hold no newline.
    next_index: usize,
}

impl LineCodec {
    pub(crate) fn new(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
        }
    }

    fn finish_line(&self, mut bytes: &[u8]) -> Result<String, ClientError> {
        if bytes.ends_with(b"\r") {
            bytes = &bytes[..bytes.len() - 1];
        }
        // Leftover from a preceding `\n\r` pair.
        if bytes.starts_with(b"\r") {
            bytes = &bytes[1..];
        }
        let line = std::str::from_utf8(bytes)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "line is not valid utf-8"))?;
        Ok(line.to_string())
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ClientError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, ClientError> {
        let read_to = self.max_length.saturating_add(1).min(buf.len());
        if let Some(offset) = buf[self.next_index..read_to]
            .iter()
            .position(|b| *b == b'\n')
        {
            let end = self.next_index + offset;
            self.next_index = 0;
            let line = buf.split_to(end + 1);
            return Ok(Some(self.finish_line(&line[..line.len() - 1])?));
        }
        if buf.len() > self.max_length {
            return Err(ClientError::LineTooLong {
                max: self.max_length,
            });
        }
        self.next_index = read_to;
        Ok(None)
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, ClientError> {
        if let Some(line) = self.decode(buf)? {
            return Ok(Some(line));
        }
        self.next_index = 0;
        if buf.is_empty() {
            return Ok(None);
        }
        // Final unterminated line before end of stream.
        let line = buf.split_to(buf.len());
        Ok(Some(self.finish_line(&line)?))
    }
}
