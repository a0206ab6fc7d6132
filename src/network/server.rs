//! TCP Server
//!
//! Accepts connections and dispatches them to supervised worker threads.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::Result;
use crate::protocol::{write_message, Response};

use super::{Connection, ShutdownHandle};

/// TCP server for docstore
///
/// ## Lifecycle
/// 1. `bind` claims the listen address
/// 2. `run` accepts until the shutdown handle fires, spawning one worker per
///    connection and keeping its `JoinHandle`
/// 3. on shutdown, idle workers close their sockets, busy ones finish the
///    request in flight, and `run` joins them all before returning
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: TcpListener,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Bind the configured listen address
    pub fn bind(config: Config, engine: Arc<Engine>) -> Result<Self> {
        config.validate()?;
        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            engine,
            listener,
            shutdown: ShutdownHandle::new(),
        })
    }

    /// The address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// A handle that stops this server when triggered
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }

    /// Start the server (blocking until shutdown)
    pub fn run(&self) -> Result<()> {
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);
        let mut workers: Vec<JoinHandle<()>> = Vec::new();
        let mut next_connection_id: u64 = 0;

        tracing::info!(
            "Listening on {} (data directory: {})",
            self.local_addr()?,
            self.config.data_dir.display()
        );

        while !self.shutdown.is_shutdown() {
            reap_finished(&mut workers);

            match self.listener.accept() {
                Ok((stream, peer)) => {
                    if workers.len() >= self.config.max_connections {
                        tracing::warn!(
                            "Connection limit ({}) reached, rejecting {}",
                            self.config.max_connections,
                            peer
                        );
                        reject(stream);
                        continue;
                    }

                    next_connection_id += 1;
                    tracing::debug!("Client connected from {}", peer);
                    match self.spawn_worker(stream, next_connection_id) {
                        Ok(handle) => workers.push(handle),
                        Err(e) => tracing::warn!("Failed to start worker for {}: {}", peer, e),
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(poll_interval),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!("Accept error: {}", e);
                    thread::sleep(poll_interval);
                }
            }
        }

        tracing::info!("Waiting for {} connection(s) to finish", workers.len());
        for worker in workers {
            if worker.join().is_err() {
                tracing::warn!("Connection worker panicked");
            }
        }
        tracing::info!("Server stopped");

        Ok(())
    }

    fn spawn_worker(&self, stream: TcpStream, id: u64) -> std::io::Result<JoinHandle<()>> {
        // Accepted sockets may inherit the listener's non-blocking mode
        stream.set_nonblocking(false)?;

        let engine = Arc::clone(&self.engine);
        let shutdown = self.shutdown.clone();

        thread::Builder::new()
            .name(format!("docstore-conn-{}", id))
            .spawn(move || {
                let mut connection = match Connection::new(stream, engine, shutdown) {
                    Ok(connection) => connection,
                    Err(e) => {
                        tracing::warn!("Failed to set up connection: {}", e);
                        return;
                    }
                };
                if let Err(e) = connection.handle() {
                    tracing::debug!("Connection {} closed with error: {}", connection.peer_addr(), e);
                }
            })
    }
}

/// Join workers whose threads have already exited
fn reap_finished(workers: &mut Vec<JoinHandle<()>>) {
    let mut i = 0;
    while i < workers.len() {
        if workers[i].is_finished() {
            if workers.swap_remove(i).join().is_err() {
                tracing::warn!("Connection worker panicked");
            }
        } else {
            i += 1;
        }
    }
}

/// Tell an over-limit client why it is being dropped
fn reject(mut stream: TcpStream) {
    let _ = stream.set_nonblocking(false);
    let _ = stream.set_write_timeout(Some(Duration::from_secs(1)));
    let _ = write_message(
        &mut stream,
        &Response::error("Server busy: connection limit reached"),
    );
}
