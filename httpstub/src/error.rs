use std::io;
use std::net::SocketAddr;

use void::Void;

use crate::assert_types::*;

/// An enum representing errors that can arise when starting stub servers
/// or serving requests on them.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[source] io::Error),
    #[error("tls-api layer error: {0}")]
    TlsError(#[source] anyhow::Error),
    #[error("Address resolved to empty list")]
    AddrResolvedToEmptyList,
    #[error("Address resolved to more than one address")]
    AddrResolvedToMoreThanOneAddr(Vec<SocketAddr>),
    #[error("Listen address is not specified")]
    ListenAddrNotSpecified,
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    #[error("Unexpected EOF in the middle of a request")]
    UnexpectedEof,
    /// Status code cannot be written into a status line.
    #[error("Invalid status code: {0}")]
    InvalidStatusCode(u16),
    #[error("Request handler panicked: {0}")]
    HandlerPanicked(String),
    #[error("Request handler finished without sending a response")]
    ResponseNotSent,
    #[error("Connection was closed before the response could be sent")]
    ConnectionClosed,
    #[error("Shutdown of local server")]
    Shutdown,
    #[error("User error: {0}")]
    User(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

fn _assert_error_sync_send() {
    assert_send::<Error>();
    assert_sync::<Error>();
}

/// Implement the trait that allows us to automatically convert `io::Error`s
/// into an `Error` by wrapping the given `io::Error` into an `Error::IoError` variant.
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<httparse::Error> for Error {
    fn from(e: httparse::Error) -> Self {
        Error::MalformedRequest(e.to_string())
    }
}

impl From<Void> for Error {
    fn from(v: Void) -> Self {
        match v {}
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        match e {
            Error::IoError(e) => e,
            e => io::Error::new(io::ErrorKind::Other, e),
        }
    }
}
