//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor loop that never touches storage
//! - One worker thread per connection, handles retained and joined on shutdown
//! - Requests routed through `Engine`
//!
//! ## Connection States
//! ```text
//! Connected → [ ReadingLength → ReadingBody → Dispatching → WritingResponse ]* → Closed
//! ```
//! A connection closes on peer disconnect, socket failure, a protocol
//! violation, a timeout in the middle of a frame, or server shutdown.

mod connection;
mod server;
mod shutdown;

pub use connection::Connection;
pub use server::Server;
pub use shutdown::ShutdownHandle;
