use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::TcpStream;

use crate::http::parser::{parse_http_request, ParseError};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::todo::ListHandler;

const READ_CHUNK: usize = 4096;

/// One client connection: a single request followed by a single response.
pub struct Connection<S = TcpStream> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    handler: ListHandler,
    max_request_size: usize,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

/// Failure to obtain a complete request from the client
#[derive(Debug)]
pub enum ReadError {
    Parse(ParseError),
    /// Client closed the stream part-way through a request
    Truncated,
    /// Request grew past the configured limit
    TooLarge(usize),
    Io(std::io::Error),
}

impl ReadError {
    pub fn status(&self) -> StatusCode {
        match self {
            ReadError::Parse(_) | ReadError::Truncated => StatusCode::BadRequest,
            ReadError::TooLarge(_) => StatusCode::PayloadTooLarge,
            ReadError::Io(_) => StatusCode::InternalServerError,
        }
    }
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::Parse(e) => write!(f, "parse error: {}", e),
            ReadError::Truncated => write!(f, "connection closed mid-request"),
            ReadError::TooLarge(limit) => write!(f, "request exceeds {} bytes", limit),
            ReadError::Io(e) => write!(f, "read failed: {}", e),
        }
    }
}

impl std::error::Error for ReadError {}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, handler: ListHandler, max_request_size: usize) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Reading,
            handler,
            max_request_size,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await {
                        Ok(Some(req)) => ConnectionState::Processing(req),
                        Ok(None) => ConnectionState::Closed,
                        Err(e) => {
                            match &e {
                                ReadError::Io(_) => {
                                    tracing::error!(error = %e, "Failed to read request")
                                }
                                _ => tracing::warn!(error = %e, "Rejected request"),
                            }
                            let response = Response::status(e.status());
                            ConnectionState::Writing(ResponseWriter::new(&response))
                        }
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = self.handler.handle(req).await;

                    tracing::debug!(
                        method = %req.method,
                        path = %req.path,
                        status = response.status.as_u16(),
                        "Request handled"
                    );

                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(writer) => {
                    let result = writer.write_to_stream(&mut self.stream).await;
                    self.state = ConnectionState::Closed;
                    result?;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until one complete request is buffered.
    ///
    /// Returns `Ok(None)` when the client closes the stream without sending
    /// anything.
    pub async fn read_request(&mut self) -> Result<Option<Request>, ReadError> {
        loop {
            match parse_http_request(&self.buffer) {
                Ok((_, consumed)) if consumed > self.max_request_size => {
                    return Err(ReadError::TooLarge(self.max_request_size));
                }

                Ok((request, _)) => return Ok(Some(request)),

                Err(ParseError::Incomplete) => {
                    if self.buffer.len() >= self.max_request_size {
                        return Err(ReadError::TooLarge(self.max_request_size));
                    }
                }

                Err(e) => return Err(ReadError::Parse(e)),
            }

            self.buffer.reserve(READ_CHUNK);
            let n = self
                .stream
                .read_buf(&mut self.buffer)
                .await
                .map_err(ReadError::Io)?;

            if n == 0 {
                return if self.buffer.is_empty() {
                    Ok(None)
                } else {
                    Err(ReadError::Truncated)
                };
            }
        }
    }
}
