use std::sync::Arc;

use tls_api::TlsAcceptorBox;

use crate::HttpScheme;

/// Whether server accepts plain TCP connections or performs TLS handshake first.
pub enum ServerTlsOption {
    Plain,
    Tls(Arc<TlsAcceptorBox>),
}

impl ServerTlsOption {
    /// URL scheme of the server.
    pub fn scheme(&self) -> HttpScheme {
        match self {
            ServerTlsOption::Plain => HttpScheme::Http,
            ServerTlsOption::Tls(..) => HttpScheme::Https,
        }
    }
}

impl Clone for ServerTlsOption {
    fn clone(&self) -> Self {
        match self {
            ServerTlsOption::Plain => ServerTlsOption::Plain,
            ServerTlsOption::Tls(a) => ServerTlsOption::Tls(a.clone()),
        }
    }
}
