//! Lazily started shared stub servers and the `Stub` registration value.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;

use crate::handlers::Echo;
use crate::handlers::FixedResponse;
use crate::tls::tls_identity;
use crate::Error;
use crate::Headers;
use crate::HttpScheme;
use crate::Server;
use crate::ServerBuilder;
use crate::ServerConf;
use crate::ServerHandler;
use crate::ServerHandlerFn;
use crate::ServerRequest;
use crate::ServerResponse;
use crate::ServerTlsOption;

/// One plain and one TLS server, both started on first use, plus the
/// context path counter shared by them.
///
/// Context paths are `/0`, `/1`, ... and are never reused, including
/// across [`stop`](StubServers::stop). The value can be shared between
/// threads with `Arc`.
///
/// ```no_run
/// use httpstub::Stub;
/// use httpstub::StubServers;
///
/// let servers = StubServers::new();
/// let url = Stub::new().content("hello").start(&servers).unwrap();
/// assert!(url.starts_with("http://127.0.0.1:"));
/// servers.stop();
/// ```
pub struct StubServers {
    conf: ServerConf,
    state: Mutex<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    plain: Option<Server>,
    tls: Option<Server>,
    next_context: u64,
}

impl Default for StubServers {
    fn default() -> StubServers {
        StubServers::new()
    }
}

impl fmt::Debug for StubServers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("StubServers")
            .field("plain", &state.plain)
            .field("tls", &state.tls)
            .field("next_context", &state.next_context)
            .finish()
    }
}

impl StubServers {
    /// No servers are started until the first registration.
    pub fn new() -> StubServers {
        StubServers::with_conf(ServerConf::new())
    }

    /// Servers created by this registry use given configuration.
    pub fn with_conf(conf: ServerConf) -> StubServers {
        StubServers {
            conf,
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// Register the stub under a fresh context path and return its URL,
    /// `scheme://127.0.0.1:port/N`.
    ///
    /// Starts the server for the stub scheme if it is not running.
    /// If the server cannot be started, nothing changes and the call
    /// can be retried.
    pub fn register(&self, stub: Stub) -> crate::Result<String> {
        let scheme = stub.scheme();
        let handler = stub.into_handler()?;

        let mut state = self.state.lock();
        let RegistryState {
            plain,
            tls,
            next_context,
        } = &mut *state;

        let slot = match scheme {
            HttpScheme::Http => plain,
            HttpScheme::Https => tls,
        };
        let server = match slot {
            Some(server) => server,
            None => slot.insert(start_server(scheme, &self.conf)?),
        };

        let path = format!("/{}", next_context);
        *next_context += 1;

        server.add_context(&path, handler);
        let url = format!("{}{}", server.origin(), path);
        info!("registered stub {}", url);
        Ok(url)
    }

    /// Stop both servers. Does nothing if none is running.
    ///
    /// The next registration starts a new server, usually on another port.
    /// The context path counter is not reset.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        let plain = state.plain.take();
        let tls = state.tls.take();
        // servers are stopped on drop
        drop(plain);
        drop(tls);
    }

    /// Is the server for the scheme started.
    pub fn is_running(&self, scheme: HttpScheme) -> bool {
        self.origin(scheme).is_some()
    }

    /// Origin of the server for the scheme, if it is started.
    pub fn origin(&self, scheme: HttpScheme) -> Option<String> {
        let state = self.state.lock();
        let slot = match scheme {
            HttpScheme::Http => &state.plain,
            HttpScheme::Https => &state.tls,
        };
        slot.as_ref().map(|server| server.origin())
    }
}

impl Drop for StubServers {
    fn drop(&mut self) {
        self.stop();
    }
}

fn start_server(scheme: HttpScheme, conf: &ServerConf) -> crate::Result<Server> {
    let mut server = ServerBuilder::new();
    server.set_port(0);
    server.conf = conf.clone();
    server.tls = match scheme {
        HttpScheme::Http => ServerTlsOption::Plain,
        HttpScheme::Https => tls_identity().server_tls_option(),
    };
    server.build()
}

/// What a registered stub responds with.
///
/// Built with `with`-style methods and consumed by
/// [`start`](Stub::start) or [`StubServers::register`]. By default the stub
/// answers `200` with an empty body over plain HTTP.
#[derive(Clone)]
pub struct Stub {
    content: Bytes,
    ssl: bool,
    response_code: u16,
    headers: Option<Headers>,
    handler: Option<Arc<dyn ServerHandler>>,
}

impl Default for Stub {
    fn default() -> Stub {
        Stub::new()
    }
}

impl fmt::Debug for Stub {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Stub")
            .field("content_len", &self.content.len())
            .field("ssl", &self.ssl)
            .field("response_code", &self.response_code)
            .field("headers", &self.headers)
            .field("custom_handler", &self.handler.is_some())
            .finish()
    }
}

impl Stub {
    pub fn new() -> Stub {
        Stub {
            content: Bytes::new(),
            ssl: false,
            response_code: 200,
            headers: None,
            handler: None,
        }
    }

    /// Response body.
    pub fn content<B: Into<Bytes>>(mut self, content: B) -> Stub {
        self.content = content.into();
        self
    }

    /// Serve over HTTPS.
    pub fn ssl(mut self) -> Stub {
        self.ssl = true;
        self
    }

    /// Response status, `200` by default.
    ///
    /// Must be in `200..=999`, otherwise registration fails with
    /// [`Error::InvalidStatusCode`].
    pub fn response_code(mut self, response_code: u16) -> Stub {
        self.response_code = response_code;
        self
    }

    /// Response headers.
    pub fn headers(mut self, headers: Headers) -> Stub {
        self.headers = Some(headers);
        self
    }

    /// Response headers as `Name: value` lines, see [`Headers::parse`].
    pub fn headers_text(self, raw: &str) -> Stub {
        self.headers(Headers::parse(raw))
    }

    /// Serve requests with a custom handler.
    ///
    /// Content, response code and headers are then ignored.
    pub fn handler<H: ServerHandler>(mut self, handler: H) -> Stub {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Serve requests with a function.
    pub fn handler_fn<F>(self, f: F) -> Stub
    where
        F: Fn(ServerRequest, ServerResponse) -> crate::Result<()> + Send + Sync + 'static,
    {
        self.handler(ServerHandlerFn(f))
    }

    /// Respond with the description of the request, see [`Echo`].
    pub fn echo(self) -> Stub {
        self.handler(Echo)
    }

    /// Register in `servers` and return the stub URL.
    pub fn start(self, servers: &StubServers) -> crate::Result<String> {
        servers.register(self)
    }

    /// Register an echo stub and return its URL.
    pub fn start_echo(self, servers: &StubServers) -> crate::Result<String> {
        self.echo().start(servers)
    }

    fn scheme(&self) -> HttpScheme {
        match self.ssl {
            true => HttpScheme::Https,
            false => HttpScheme::Http,
        }
    }

    fn into_handler(self) -> crate::Result<Arc<dyn ServerHandler>> {
        if let Some(handler) = self.handler {
            return Ok(handler);
        }
        // interim 1xx responses cannot end a request
        if !(200..=999).contains(&self.response_code) {
            return Err(Error::InvalidStatusCode(self.response_code));
        }
        let headers = self.headers.unwrap_or_default();
        Ok(Arc::new(FixedResponse::new(
            self.response_code,
            headers,
            self.content,
        )))
    }
}
