//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::Engine;
use crate::error::{Result, StoreError};
use crate::protocol::{read_frame, write_message, Response};

use super::ShutdownHandle;

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Reference to the request dispatcher
    engine: Arc<Engine>,

    /// Server-wide stop signal
    shutdown: ShutdownHandle,

    /// Peer address for logging
    peer_addr: String,

    /// Largest frame body accepted
    max_frame_size: u32,

    /// Time allowed to finish a frame once its first byte arrived
    read_timeout: Option<Duration>,

    /// Idle wait granularity between shutdown checks
    poll_interval: Duration,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O and configures timeouts from the engine's config
    pub fn new(stream: TcpStream, engine: Arc<Engine>, shutdown: ShutdownHandle) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let config = engine.config();
        let max_frame_size = config.max_frame_size;
        let read_timeout = millis(config.read_timeout_ms);
        let poll_interval = Duration::from_millis(config.poll_interval_ms.max(1));

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;
        stream.set_write_timeout(millis(config.write_timeout_ms))?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            engine,
            shutdown,
            peer_addr,
            max_frame_size,
            read_timeout,
            poll_interval,
        })
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Requests are answered strictly one at a time in arrival order.
    /// Returns when the client disconnects, the server shuts down, or an
    /// error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            if !self.wait_for_frame()? {
                tracing::debug!("Closing connection to {}", self.peer_addr);
                return Ok(());
            }

            // Read next frame
            let body = match read_frame(&mut self.reader, self.max_frame_size) {
                Ok(body) => body,
                Err(StoreError::Io(ref e)) if is_disconnect(e) => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Err(StoreError::Io(ref e)) if is_timeout(e) => {
                    // A partial frame cannot be resynchronized
                    tracing::debug!("Read timeout mid-frame for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e @ StoreError::Protocol(_)) => {
                    tracing::warn!("Protocol violation from {}: {}", self.peer_addr, e);
                    let _ = self.send_response(&Response::error(e.to_string()));
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            tracing::trace!("Received {} byte request from {}", body.len(), self.peer_addr);

            // Dispatch
            let response = self.engine.handle_frame(&body);

            // Send response
            if let Err(e) = self.send_response(&response) {
                // If the client disconnected before we could send the response,
                // log and exit gracefully rather than treating it as a server error.
                if let StoreError::Io(ref io_err) = e {
                    if is_disconnect(io_err) {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// Block until the next frame starts arriving
    ///
    /// Returns `Ok(false)` when the peer closed the connection or shutdown
    /// was requested while idle.
    fn wait_for_frame(&mut self) -> Result<bool> {
        if !self.reader.buffer().is_empty() {
            return Ok(true);
        }

        let stream = self.reader.get_ref();
        stream.set_read_timeout(Some(self.poll_interval))?;

        let mut probe = [0u8; 1];
        let outcome = loop {
            if self.shutdown.is_shutdown() {
                break Ok(false);
            }
            match stream.peek(&mut probe) {
                Ok(0) => break Ok(false),
                Ok(_) => break Ok(true),
                Err(ref e) if is_timeout(e) || e.kind() == ErrorKind::Interrupted => continue,
                Err(ref e) if is_disconnect(e) => break Ok(false),
                Err(e) => break Err(StoreError::Io(e)),
            }
        };

        stream.set_read_timeout(self.read_timeout)?;
        outcome
    }

    /// Send a response to the client
    fn send_response(&mut self, response: &Response) -> Result<()> {
        write_message(&mut self.writer, response)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Zero disables the timeout
fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

fn is_disconnect(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
    )
}

// Windows reports TimedOut where Unix reports WouldBlock
fn is_timeout(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}
