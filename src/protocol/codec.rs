//! Protocol codec
//!
//! Length-prefixed framing shared by server and client.

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::error::{Result, StoreError};

use super::Response;

/// Size of the big-endian length prefix
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Default cap on an inbound frame body (1 MiB)
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 1024 * 1024;

/// Validate a declared body length against the cap
fn check_length(len: u32, max_len: u32) -> Result<usize> {
    if len == 0 {
        return Err(StoreError::Protocol("Empty frame".to_string()));
    }
    if len > max_len {
        return Err(StoreError::Protocol(format!(
            "Frame too large: {} bytes (max {})",
            len, max_len
        )));
    }
    Ok(len as usize)
}

// =============================================================================
// Buffer Encoding/Decoding
// =============================================================================

/// Encode a body into a complete frame
///
/// Format: body_len (4, big-endian) + body
pub fn encode_frame(payload: &[u8]) -> Result<Bytes> {
    let len = u32::try_from(payload.len()).map_err(|_| {
        StoreError::Protocol(format!("Frame body of {} bytes exceeds u32", payload.len()))
    })?;
    if len == 0 {
        return Err(StoreError::Protocol("Empty frame".to_string()));
    }

    let mut frame = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    frame.put_u32(len);
    frame.put_slice(payload);
    Ok(frame.freeze())
}

/// Decode one complete frame held in `bytes`, returning its body
pub fn decode_frame(bytes: &[u8], max_len: u32) -> Result<&[u8]> {
    if bytes.len() < LENGTH_PREFIX_SIZE {
        return Err(StoreError::Protocol(format!(
            "Incomplete length prefix: expected {} bytes, got {}",
            LENGTH_PREFIX_SIZE,
            bytes.len()
        )));
    }

    let len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let body_len = check_length(len, max_len)?;

    let total_len = LENGTH_PREFIX_SIZE + body_len;
    if bytes.len() < total_len {
        return Err(StoreError::Protocol(format!(
            "Incomplete frame body: expected {} bytes, got {}",
            body_len,
            bytes.len() - LENGTH_PREFIX_SIZE
        )));
    }

    Ok(&bytes[LENGTH_PREFIX_SIZE..total_len])
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete frame body from a stream
///
/// Blocks until the whole body has arrived or an error occurs. A peer that
/// closes cleanly between frames surfaces as `Io(UnexpectedEof)`.
pub fn read_frame<R: Read>(reader: &mut R, max_len: u32) -> Result<Vec<u8>> {
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    reader.read_exact(&mut prefix)?;

    let body_len = check_length(u32::from_be_bytes(prefix), max_len)?;

    let mut body = vec![0u8; body_len];
    reader.read_exact(&mut body)?;
    Ok(body)
}

/// Write a frame carrying `payload` and flush
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    let frame = encode_frame(payload)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

/// Serialize `message` as JSON and write it as one frame
pub fn write_message<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<()> {
    let body = serde_json::to_vec(message)?;
    write_frame(writer, &body)
}

/// Read one frame and decode it as a response envelope
pub fn read_response<R: Read>(reader: &mut R, max_len: u32) -> Result<Response> {
    let body = read_frame(reader, max_len)?;
    Response::from_slice(&body)
}
