//! Line-stream server.
//!
//! Reads one request per line and answers each before reading the next, so
//! there is at most one request in flight per stream. Empty lines are
//! skipped; a line holding only whitespace is not empty and is answered with
//! a decode error. A malformed line, including one that is not valid UTF-8,
//! gets an error response and the loop carries on. The loop ends at end of
//! stream; a read or write failure is returned to the caller.

use std::future::Future;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::mcp::dispatcher::Dispatcher;
use crate::mcp::protocol::decode_request;
use crate::mcp::transport::LineTransport;

/// Serves MCP requests over a line-delimited byte stream.
pub struct StdioServer<R, W> {
    transport: LineTransport<R, W>,
    dispatcher: Arc<Dispatcher>,
}

impl<R, W> StdioServer<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a server over a transport.
    pub const fn new(transport: LineTransport<R, W>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            transport,
            dispatcher,
        }
    }

    /// Runs until end of stream.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the stream fails.
    pub async fn run(&mut self) -> Result<(), TransportError> {
        while let Some(line) = self.transport.read_line().await? {
            self.handle_line(&line).await?;
        }
        info!("Input stream closed");
        Ok(())
    }

    /// Runs until end of stream or until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the stream fails.
    pub async fn run_with_shutdown<F>(&mut self, shutdown: F) -> Result<(), TransportError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown requested, stopping stdio server");
                    return Ok(());
                }

                line = self.transport.read_line() => {
                    let Some(line) = line? else {
                        info!("Input stream closed");
                        return Ok(());
                    };
                    self.handle_line(&line).await?;
                }
            }
        }
    }

    /// Handles a single line of input.
    async fn handle_line(&mut self, line: &[u8]) -> Result<(), TransportError> {
        if line.is_empty() {
            debug!("Skipping empty line");
            return Ok(());
        }

        let response = match decode_request(line) {
            Ok(request) => self.dispatcher.handle(request).await,
            Err(response) => {
                warn!(id = ?response.id, "Malformed message");
                response
            }
        };

        self.transport
            .write_response(&response.with_jsonrpc_tag())
            .await
    }

    /// Consumes the server and returns the transport's writer.
    pub fn into_writer(self) -> W {
        self.transport.into_writer()
    }
}
