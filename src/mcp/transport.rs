//! Line-delimited JSON framing.
//!
//! - Messages are UTF-8 encoded JSON; invalid bytes are left to the decoder
//! - Messages are delimited by newlines
//! - Messages must not contain embedded newlines
//!
//! The transport is generic over its reader and writer so the stdio server
//! can be driven from in-memory buffers in tests.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::trace;

use crate::error::TransportError;
use crate::mcp::protocol::Response;

/// A newline-delimited JSON transport over a byte stream pair.
pub struct LineTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl LineTransport<tokio::io::Stdin, tokio::io::Stdout> {
    /// Creates a transport over the process stdin/stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a transport with the given reader and writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Reads the next line as raw bytes, without its line terminator.
    ///
    /// Returns `None` at end of stream. The bytes are not checked for UTF-8
    /// here; a line that is not valid UTF-8 is a decode failure for the
    /// caller, not a read failure.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the stream fails.
    pub async fn read_line(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut line = Vec::new();
        let bytes_read = self
            .reader
            .read_until(b'\n', &mut line)
            .await
            .map_err(TransportError::Read)?;

        if bytes_read == 0 {
            return Ok(None);
        }

        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }

        trace!(len = line.len(), "read message");
        Ok(Some(line))
    }

    /// Writes a response as one JSON line.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_response(&mut self, response: &Response) -> Result<(), TransportError> {
        let json = serde_json::to_string(response).map_err(TransportError::Serialise)?;
        self.write_raw(&json).await
    }

    /// Writes a raw JSON string with newline termination.
    async fn write_raw(&mut self, json: &str) -> Result<(), TransportError> {
        debug_assert!(
            !json.contains('\n'),
            "JSON message must not contain embedded newlines"
        );
        trace!(len = json.len(), "writing message");

        self.writer
            .write_all(json.as_bytes())
            .await
            .map_err(TransportError::Write)?;
        self.writer
            .write_all(b"\n")
            .await
            .map_err(TransportError::Write)?;
        self.writer.flush().await.map_err(TransportError::Write)?;

        Ok(())
    }

    /// Consumes the transport and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}
