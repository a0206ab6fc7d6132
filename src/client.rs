//! Client
//!
//! Blocking client speaking the length-prefixed JSON protocol.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use serde_json::Value;

use crate::error::Result;
use crate::protocol::{read_response, write_message, Request, Response};

/// Inbound cap for responses; larger than the server's request cap because
/// find results can be big
pub const CLIENT_MAX_FRAME_SIZE: u32 = 16 * 1024 * 1024;

/// A connection to a docstore server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    max_frame_size: u32,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            max_frame_size: CLIENT_MAX_FRAME_SIZE,
        })
    }

    /// Apply a timeout to both reads and writes
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        self.writer.get_ref().set_write_timeout(timeout)?;
        Ok(())
    }

    /// Send a raw request object and wait for its response
    pub fn request(&mut self, request: &Value) -> Result<Response> {
        write_message(&mut self.writer, request)?;
        read_response(&mut self.reader, self.max_frame_size)
    }

    /// Send a typed request
    pub fn send(&mut self, request: &Request) -> Result<Response> {
        self.request(&request.to_value())
    }

    /// Insert one document (object) or several (array)
    pub fn insert(&mut self, database: &str, collection: &str, data: Value) -> Result<Response> {
        self.send(&Request::insert(database, collection, data))
    }

    /// Find documents matching `query`
    pub fn find(&mut self, database: &str, collection: &str, query: Value) -> Result<Response> {
        self.send(&Request::find(database, collection, query))
    }

    /// Delete documents matching `query`
    pub fn delete(&mut self, database: &str, collection: &str, query: Value) -> Result<Response> {
        self.send(&Request::delete(database, collection, query))
    }

    /// Record an index on `field`
    pub fn create_index(&mut self, database: &str, collection: &str, field: &str) -> Result<Response> {
        self.send(&Request::create_index(database, collection, field))
    }
}
