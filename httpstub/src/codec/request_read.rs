use bytes::Buf;
use bytes::Bytes;
use bytes::BytesMut;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;

use crate::misc::latin1_to_string;
use crate::misc::BsDebug;
use crate::Error;
use crate::Headers;

const INITIAL_MAX_HEADERS: usize = 64;
const READ_CHUNK: usize = 8 * 1024;

/// Request line and headers of an HTTP/1.x request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestHead {
    pub method: String,
    pub uri: String,
    /// Minor version, `1` for `HTTP/1.1`.
    pub minor_version: u8,
    pub headers: Headers,
}

impl RequestHead {
    pub fn protocol(&self) -> String {
        format!("HTTP/1.{}", self.minor_version)
    }

    fn connection_has(&self, token: &str) -> bool {
        match self.headers.get_ignore_case("connection") {
            Some(value) => value
                .split(',')
                .any(|t| t.trim().eq_ignore_ascii_case(token)),
            None => false,
        }
    }

    pub fn keep_alive(&self) -> bool {
        if self.minor_version == 0 {
            self.connection_has("keep-alive")
        } else {
            !self.connection_has("close")
        }
    }

    pub fn expects_continue(&self) -> bool {
        self.minor_version >= 1
            && self
                .headers
                .get_ignore_case("expect")
                .map_or(false, |e| e.trim().eq_ignore_ascii_case("100-continue"))
    }

    fn is_chunked(&self) -> bool {
        self.headers
            .get_ignore_case("transfer-encoding")
            .and_then(|te| te.split(',').last())
            .map_or(false, |last| last.trim().eq_ignore_ascii_case("chunked"))
    }

    fn content_length(&self) -> crate::Result<u64> {
        match self.headers.get_ignore_case("content-length") {
            Some(len) => len
                .trim()
                .parse()
                .map_err(|_| Error::MalformedRequest(format!("bad content-length: {}", len))),
            None => Ok(0),
        }
    }
}

/// Parse request head from the beginning of the buffer,
/// consuming it on success, leaving the buffer untouched if the head is incomplete.
fn parse_head(buf: &mut BytesMut) -> crate::Result<Option<RequestHead>> {
    let mut max_headers = INITIAL_MAX_HEADERS;
    loop {
        let parsed = {
            let mut headers = vec![httparse::EMPTY_HEADER; max_headers];
            let mut req = httparse::Request::new(&mut headers);
            match req.parse(&buf[..]) {
                Ok(httparse::Status::Complete(len)) => {
                    let mut head = RequestHead {
                        method: req.method.unwrap_or_default().to_owned(),
                        uri: req.path.unwrap_or_default().to_owned(),
                        minor_version: req.version.unwrap_or(1),
                        headers: Headers::new(),
                    };
                    for header in req.headers.iter() {
                        head.headers
                            .add(header.name, latin1_to_string(header.value));
                    }
                    Some((head, len))
                }
                Ok(httparse::Status::Partial) => None,
                Err(httparse::Error::TooManyHeaders) => {
                    max_headers *= 2;
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        };

        return Ok(parsed.map(|(head, len)| {
            buf.advance(len);
            head
        }));
    }
}

/// Reads HTTP/1.x requests from a byte stream.
///
/// Bytes read past the end of one request stay buffered for the next one.
pub(crate) struct RequestReader<R> {
    read: R,
    buf: BytesMut,
}

impl<R: AsyncRead + Unpin> RequestReader<R> {
    pub fn new(read: R) -> RequestReader<R> {
        RequestReader {
            read,
            buf: BytesMut::new(),
        }
    }

    /// Returns `false` on EOF.
    async fn fill_buf(&mut self) -> crate::Result<bool> {
        self.buf.reserve(READ_CHUNK);
        let n = self.read.read_buf(&mut self.buf).await?;
        Ok(n != 0)
    }

    /// Read the next request head.
    ///
    /// `None` means the peer closed the connection between requests.
    pub async fn read_head(&mut self) -> crate::Result<Option<RequestHead>> {
        loop {
            if !self.buf.is_empty() {
                if let Some(head) = parse_head(&mut self.buf)? {
                    return Ok(Some(head));
                }
            }
            if !self.fill_buf().await? {
                return if self.buf.is_empty() {
                    Ok(None)
                } else {
                    debug!("EOF inside request head: {:?}", BsDebug(&self.buf));
                    Err(Error::UnexpectedEof)
                };
            }
        }
    }

    async fn read_exact_bytes(&mut self, len: usize) -> crate::Result<Bytes> {
        while self.buf.len() < len {
            if !self.fill_buf().await? {
                return Err(Error::UnexpectedEof);
            }
        }
        Ok(self.buf.split_to(len).freeze())
    }

    /// Read one line, strip the line terminator.
    async fn read_line(&mut self) -> crate::Result<Bytes> {
        loop {
            if let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
                let mut line = self.buf.split_to(pos + 1);
                line.truncate(pos);
                if line.last() == Some(&b'\r') {
                    line.truncate(pos - 1);
                }
                return Ok(line.freeze());
            }
            if !self.fill_buf().await? {
                return Err(Error::UnexpectedEof);
            }
        }
    }

    async fn read_chunked_body(&mut self) -> crate::Result<Bytes> {
        let mut body = BytesMut::new();
        loop {
            let line = self.read_line().await?;
            let line = latin1_to_string(&line);
            // chunk extensions are ignored
            let size = line.split(';').next().unwrap_or_default().trim();
            let size = usize::from_str_radix(size, 16)
                .map_err(|_| Error::MalformedRequest(format!("bad chunk size: {:?}", line)))?;
            if size == 0 {
                // trailers are read and dropped
                while !self.read_line().await?.is_empty() {}
                return Ok(body.freeze());
            }
            let chunk = self.read_exact_bytes(size).await?;
            body.extend_from_slice(&chunk);
            if !self.read_line().await?.is_empty() {
                return Err(Error::MalformedRequest(
                    "chunk is not followed by CRLF".to_owned(),
                ));
            }
        }
    }

    /// Read the request body described by the head.
    pub async fn read_body(&mut self, head: &RequestHead) -> crate::Result<Bytes> {
        if head.is_chunked() {
            self.read_chunked_body().await
        } else {
            let len = head.content_length()?;
            if len == 0 {
                return Ok(Bytes::new());
            }
            self.read_exact_bytes(len as usize).await
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime")
            .block_on(f)
    }

    #[test]
    fn head_and_content_length_body() {
        block_on(async {
            let input: &[u8] =
                b"POST /3?q=1 HTTP/1.1\r\nHost: x\r\nContent-Length: 5\r\nX-Case: A:b\r\n\r\nhelloGET";
            let mut reader = RequestReader::new(input);
            let head = reader.read_head().await.unwrap().unwrap();
            assert_eq!("POST", head.method);
            assert_eq!("/3?q=1", head.uri);
            assert_eq!("HTTP/1.1", head.protocol());
            assert_eq!(Some("A:b"), head.headers.get("X-Case"));
            assert!(head.keep_alive());
            assert_eq!(&b"hello"[..], &reader.read_body(&head).await.unwrap()[..]);
            assert_eq!(&b"GET"[..], &reader.buf[..]);
        });
    }

    #[test]
    fn pipelined_requests() {
        block_on(async {
            let input: &[u8] = b"GET /1 HTTP/1.1\r\n\r\nGET /2 HTTP/1.0\r\n\r\n";
            let mut reader = RequestReader::new(input);
            let first = reader.read_head().await.unwrap().unwrap();
            assert_eq!("/1", first.uri);
            assert!(reader.read_body(&first).await.unwrap().is_empty());
            let second = reader.read_head().await.unwrap().unwrap();
            assert_eq!("/2", second.uri);
            assert!(!second.keep_alive());
            assert!(reader.read_head().await.unwrap().is_none());
        });
    }

    #[test]
    fn chunked_body() {
        block_on(async {
            let input: &[u8] = b"PUT / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n\
                4;ext=1\r\nWiki\r\n5\r\npedia\r\n0\r\nTrailer: x\r\n\r\n";
            let mut reader = RequestReader::new(input);
            let head = reader.read_head().await.unwrap().unwrap();
            assert_eq!(&b"Wikipedia"[..], &reader.read_body(&head).await.unwrap()[..]);
            assert!(reader.buf.is_empty());
        });
    }

    #[test]
    fn many_headers() {
        block_on(async {
            let mut input = b"GET / HTTP/1.1\r\n".to_vec();
            for i in 0..200 {
                input.extend_from_slice(format!("H{}: {}\r\n", i, i).as_bytes());
            }
            input.extend_from_slice(b"\r\n");
            let mut reader = RequestReader::new(&input[..]);
            let head = reader.read_head().await.unwrap().unwrap();
            assert_eq!(200, head.headers.len());
            assert_eq!(Some("199"), head.headers.get("H199"));
        });
    }

    #[test]
    fn connection_flags() {
        block_on(async {
            let input: &[u8] = b"GET / HTTP/1.1\r\nConnection: Close\r\nExpect: 100-continue\r\n\r\n";
            let head = RequestReader::new(input).read_head().await.unwrap().unwrap();
            assert!(!head.keep_alive());
            assert!(head.expects_continue());
        });
    }

    #[test]
    fn eof_inside_head() {
        block_on(async {
            let input: &[u8] = b"GET / HTTP/1.1\r\nHost";
            match RequestReader::new(input).read_head().await {
                Err(Error::UnexpectedEof) => {}
                r => panic!("unexpected: {:?}", r),
            }
        });
    }

    #[test]
    fn eof_inside_body() {
        block_on(async {
            let input: &[u8] = b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc";
            let mut reader = RequestReader::new(input);
            let head = reader.read_head().await.unwrap().unwrap();
            assert!(matches!(reader.read_body(&head).await, Err(Error::UnexpectedEof)));
        });
    }

    #[test]
    fn malformed_head() {
        block_on(async {
            let input: &[u8] = b"GET / HTTP/1.1\r\nBad Header\r\n\r\n";
            assert!(matches!(
                RequestReader::new(input).read_head().await,
                Err(Error::MalformedRequest(..))
            ));
        });
    }
}
