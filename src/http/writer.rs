use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes a response in the service's wire format.
///
/// Each header line starts with a single space, e.g.
/// `HTTP/1.1 200 OK\r\n Content-Length: 2\r\n\r\n{}`. Existing clients
/// depend on that exact layout.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        buf.push(b' ');
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    // Body
    buf.extend_from_slice(&resp.body);

    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream
                .write(&self.buffer[self.written..])
                .await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::StatusCode;

    #[test]
    fn ok_with_body() {
        let bytes = serialize_response(&Response::ok("{}"));
        assert_eq!(bytes, b"HTTP/1.1 200 OK\r\n Content-Length: 2\r\n\r\n{}");
    }

    #[test]
    fn error_without_body() {
        let bytes = serialize_response(&Response::status(StatusCode::BadRequest));
        assert_eq!(bytes, b"HTTP/1.1 400 Bad Request\r\n Content-Length: 0\r\n\r\n");
    }

    #[tokio::test]
    async fn writes_everything_to_stream() {
        let mut out = Vec::new();
        let mut writer = ResponseWriter::new(&Response::not_found());

        writer.write_to_stream(&mut out).await.unwrap();

        assert_eq!(out, b"HTTP/1.1 404 Not Found\r\n Content-Length: 0\r\n\r\n");
    }
}
