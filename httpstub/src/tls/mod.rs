//! Self-signed server identity used by HTTPS stubs.
//!
//! The certificate is issued to `localhost` and `127.0.0.1` and has long
//! expired, so clients must disable certificate and hostname verification.

use std::fmt;
use std::sync::Arc;
use std::sync::OnceLock;

use base64::Engine;
use tls_api::TlsAcceptor as tls_api_TlsAcceptor;
use tls_api::TlsAcceptorBox;
use tls_api::TlsAcceptorBuilder as tls_api_TlsAcceptorBuilder;

use crate::Error;
use crate::ServerTlsOption;

/// PKCS#12 store with the key and certificate, base64 encoded.
const PKCS12_BASE64: &str = include_str!("identity.p12.b64");

/// Password of the embedded PKCS#12 store.
pub const PKCS12_PASSWORD: &str = "simulator";

/// Server key material plus TLS acceptor built from it.
pub struct TlsIdentity {
    pkcs12: Vec<u8>,
    acceptor: Arc<TlsAcceptorBox>,
}

impl fmt::Debug for TlsIdentity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TlsIdentity")
            .field("pkcs12_len", &self.pkcs12.len())
            .finish()
    }
}

impl TlsIdentity {
    /// Decode the embedded key store and build an acceptor.
    pub fn load() -> crate::Result<TlsIdentity> {
        let encoded: String = PKCS12_BASE64
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let pkcs12 = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| Error::TlsError(e.into()))?;
        TlsIdentity::from_pkcs12(pkcs12, PKCS12_PASSWORD)
    }

    /// Build an identity from arbitrary PKCS#12 bytes.
    pub fn from_pkcs12(pkcs12: Vec<u8>, password: &str) -> crate::Result<TlsIdentity> {
        let builder =
            <tls_api_openssl::TlsAcceptor as tls_api_TlsAcceptor>::builder_from_pkcs12(
                &pkcs12, password,
            )
            .map_err(Error::TlsError)?;
        let acceptor = builder.build().map_err(Error::TlsError)?;
        Ok(TlsIdentity {
            pkcs12,
            acceptor: Arc::new(acceptor.into_dyn()),
        })
    }

    /// Raw PKCS#12 bytes, protected by [`PKCS12_PASSWORD`].
    pub fn pkcs12(&self) -> &[u8] {
        &self.pkcs12
    }

    /// Shared acceptor.
    pub fn acceptor(&self) -> Arc<TlsAcceptorBox> {
        self.acceptor.clone()
    }

    /// TLS option for [`ServerBuilder`](crate::ServerBuilder).
    pub fn server_tls_option(&self) -> ServerTlsOption {
        ServerTlsOption::Tls(self.acceptor())
    }
}

/// Process-wide identity, loaded on first use.
///
/// Nothing can be served over TLS without it, so a failure to load
/// terminates the process.
pub fn tls_identity() -> &'static TlsIdentity {
    static IDENTITY: OnceLock<TlsIdentity> = OnceLock::new();
    IDENTITY.get_or_init(|| match TlsIdentity::load() {
        Ok(identity) => {
            debug!("loaded TLS identity: {:?}", identity);
            identity
        }
        Err(e) => {
            error!("failed to load TLS identity: {}", e);
            std::process::exit(1);
        }
    })
}
