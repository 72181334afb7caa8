//! HTTP/1.1 over a plain `TcpStream`, for tests which control the bytes on the wire.

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::net::TcpStream;
use std::net::ToSocketAddrs;
use std::time::Duration;

/// Response read from a [`RawConn`].
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    /// Header names as received.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_str(&self) -> &str {
        t!(std::str::from_utf8(&self.body))
    }
}

pub struct RawConn {
    reader: BufReader<TcpStream>,
}

impl RawConn {
    pub fn connect<A: ToSocketAddrs>(addr: A) -> RawConn {
        let stream = t!(TcpStream::connect(addr));
        t!(stream.set_read_timeout(Some(Duration::from_secs(10))));
        RawConn {
            reader: BufReader::new(stream),
        }
    }

    /// Connect to the host and port of a stub URL.
    pub fn connect_url(url: &str) -> RawConn {
        let url = t!(reqwest::Url::parse(url));
        let host = url.host_str().unwrap().to_owned();
        let port = url.port().unwrap();
        RawConn::connect((host.as_str(), port))
    }

    pub fn send(&mut self, bytes: &[u8]) {
        let stream = self.reader.get_mut();
        t!(stream.write_all(bytes));
        t!(stream.flush());
    }

    fn read_line(&mut self) -> String {
        let mut line = String::new();
        t!(self.reader.read_line(&mut line));
        line.trim_end_matches(&['\r', '\n'][..]).to_owned()
    }

    /// Read status line and headers, and a body of `Content-Length` bytes
    /// unless `head_only` is set.
    pub fn read_response_head_only(&mut self, head_only: bool) -> RawResponse {
        let status_line = self.read_line();
        let mut parts = status_line.splitn(3, ' ');
        assert_eq!(Some("HTTP/1.1"), parts.next(), "{}", status_line);
        let status: u16 = t!(parts.next().unwrap_or_default().parse());

        let mut headers = Vec::new();
        loop {
            let line = self.read_line();
            if line.is_empty() {
                break;
            }
            let (name, value) = line.split_once(':').unwrap();
            headers.push((name.to_owned(), value.trim().to_owned()));
        }

        let mut response = RawResponse {
            status,
            headers,
            body: Vec::new(),
        };

        if !head_only {
            if let Some(len) = response.header("content-length") {
                let len: usize = t!(len.parse());
                let mut body = vec![0; len];
                t!(self.reader.read_exact(&mut body));
                response.body = body;
            }
        }

        response
    }

    pub fn read_response(&mut self) -> RawResponse {
        self.read_response_head_only(false)
    }

    /// True if the server closed the connection.
    pub fn is_closed(&mut self) -> bool {
        let mut buf = [0; 1];
        match self.reader.read(&mut buf) {
            Ok(0) => true,
            Ok(_) => false,
            // reset by peer
            Err(_) => true,
        }
    }
}
