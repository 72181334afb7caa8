use std::net::SocketAddr;

use bytes::Bytes;

use crate::codec::request_read::RequestHead;
use crate::Headers;

/// Fully read HTTP request passed to a handler.
#[derive(Debug, Clone)]
pub struct ServerRequest {
    /// Request method, e. g. `GET`.
    pub method: String,
    /// Request target as sent by the client, including query.
    pub uri: String,
    /// `HTTP/1.0` or `HTTP/1.1`.
    pub protocol: String,
    /// Request headers in the order they were received.
    pub headers: Headers,
    pub body: Bytes,
    pub peer_addr: SocketAddr,
}

impl ServerRequest {
    pub(crate) fn new(head: RequestHead, body: Bytes, peer_addr: SocketAddr) -> ServerRequest {
        ServerRequest {
            protocol: head.protocol(),
            method: head.method,
            uri: head.uri,
            headers: head.headers,
            body,
            peer_addr,
        }
    }

    /// Request URI without query.
    pub fn path(&self) -> &str {
        self.uri.split('?').next().unwrap_or_default()
    }
}
