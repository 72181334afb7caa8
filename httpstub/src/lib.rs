#![deny(broken_intra_doc_links)]

//! On-demand HTTP and HTTPS stub servers for tests.
//!
//! A stub is a canned response (or a custom handler) registered under a
//! fresh path on a lazily started server bound to an ephemeral loopback
//! port. Registration returns the URL to request.
//!
//! HTTP/1.1 server implementation is based on tokio, TLS is provided by
//! `tls-api` with the OpenSSL backend.

#[macro_use]
extern crate log;

pub use crate::error::Error;
pub use crate::handlers::Echo;
pub use crate::handlers::FixedResponse;
pub use crate::headers::Header;
pub use crate::headers::Headers;
pub use crate::message::SimpleHttpMessage;
pub use crate::registry::Stub;
pub use crate::registry::StubServers;
pub use crate::result::Result;
pub use crate::server::conf::ServerConf;
pub use crate::server::handler::ServerHandler;
pub use crate::server::handler::ServerHandlerFn;
pub use crate::server::handler_paths::ServerHandlerPaths;
pub use crate::server::req::ServerRequest;
pub use crate::server::resp::ServerResponse;
pub use crate::server::tls::ServerTlsOption;
pub use crate::server::HttpScheme;
pub use crate::server::Server;
pub use crate::server::ServerBuilder;
pub use crate::tls::tls_identity;
pub use crate::tls::TlsIdentity;
pub use crate::tls::PKCS12_PASSWORD;

mod error;
mod result;

mod codec;
mod handlers;
mod headers;
mod message;
mod registry;
mod server;
mod tls;

mod futures_misc;

mod assert_types;

mod misc;

pub(crate) mod net;
