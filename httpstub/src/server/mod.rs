use std::fmt;
use std::net::SocketAddr;
use std::net::ToSocketAddrs;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use futures::future::try_join;
use parking_lot::RwLock;
use tls_api::TlsAcceptor;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use void::Void;

use crate::assert_types::assert_send_future;
use crate::error::Error;
use crate::futures_misc::*;
use crate::net::tcp;
pub use crate::server::conf::ServerConf;
use crate::server::conn::serve_socket;
use crate::server::handler::ServerHandler;
use crate::server::handler_paths::ServerHandlerPaths;

pub use self::tls::ServerTlsOption;

pub mod conf;
pub(crate) mod conn;
pub mod handler;
pub mod handler_paths;
pub mod req;
pub mod resp;
pub mod tls;

/// URL scheme served by a [`Server`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HttpScheme {
    /// `http://`
    Http,
    /// `https://`
    Https,
}

impl HttpScheme {
    pub fn as_str(&self) -> &'static str {
        match *self {
            HttpScheme::Http => "http",
            HttpScheme::Https => "https",
        }
    }
}

impl fmt::Display for HttpScheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for [`Server`].
pub struct ServerBuilder {
    /// Configuration.
    pub conf: ServerConf,
    /// TLS configuration.
    pub tls: ServerTlsOption,
    /// Listen address. This is required.
    pub addr: Option<SocketAddr>,
    /// Path prefix handlers.
    pub service: ServerHandlerPaths,
}

impl ServerBuilder {
    /// New server builder with defaults.
    ///
    /// Address or port must be set, other properties are optional.
    pub fn new() -> ServerBuilder {
        ServerBuilder {
            conf: ServerConf::new(),
            tls: ServerTlsOption::Plain,
            addr: None,
            service: ServerHandlerPaths::new(),
        }
    }

    /// New plain HTTP server builder.
    pub fn new_plain() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Listen on loopback interface.
    /// Port can be zero to bind on any available port,
    /// which can be later obtained by `Server::local_addr`.
    pub fn set_port(&mut self, port: u16) {
        self.addr = Some(SocketAddr::from(([127, 0, 0, 1], port)));
    }

    /// Set address server listens on.
    pub fn set_addr<S: ToSocketAddrs>(&mut self, addr: S) -> crate::Result<()> {
        let mut addrs: Vec<_> = addr.to_socket_addrs()?.collect();
        if addrs.len() > 1 {
            return Err(Error::AddrResolvedToMoreThanOneAddr(addrs));
        }
        match addrs.pop() {
            Some(addr) => self.addr = Some(addr),
            None => return Err(Error::AddrResolvedToEmptyList),
        }
        Ok(())
    }

    /// Set TLS acceptor for the server. If not called, server will be non-TLS.
    pub fn set_tls<A: TlsAcceptor>(&mut self, acceptor: A) {
        self.tls = ServerTlsOption::Tls(Arc::new(acceptor.into_dyn()));
    }

    /// Bind the listener and start the server thread.
    pub fn build(self) -> crate::Result<Server> {
        let addr = match self.addr {
            Some(addr) => addr,
            None => return Err(Error::ListenAddrNotSpecified),
        };

        let listener = tcp::listener(&addr, &self.conf)?;
        let local_addr = listener.local_addr()?;

        let mut runtime = tokio::runtime::Builder::new_multi_thread();
        runtime.enable_all();
        if let Some(max_blocking_threads) = self.conf.max_blocking_threads {
            runtime.max_blocking_threads(max_blocking_threads);
        }
        let runtime = runtime.build()?;

        let (alive_tx, alive_rx) = mpsc::channel();
        let (shutdown_signal, shutdown_future) = shutdown_signal();

        let scheme = self.tls.scheme();
        let service = Arc::new(RwLock::new(self.service));
        let tls = self.tls;
        let conf = self.conf;
        let service_copy = service.clone();

        let thread_name = conf
            .thread_name
            .clone()
            .unwrap_or_else(|| "httpstub-server-loop".to_owned());

        let join = thread::Builder::new().name(thread_name).spawn(move || {
            run_server_event_loop(
                runtime,
                listener,
                tls,
                conf,
                service_copy,
                shutdown_future,
                alive_tx,
            )
        })?;

        info!("{} server listening on {}", scheme, local_addr);

        Ok(Server {
            scheme,
            local_addr,
            service,
            shutdown: shutdown_signal,
            alive_rx,
            join: Some(join),
        })
    }
}

fn run_server_event_loop(
    runtime: Runtime,
    listener: std::net::TcpListener,
    tls: ServerTlsOption,
    conf: ServerConf,
    service: Arc<RwLock<ServerHandlerPaths>>,
    shutdown_future: ShutdownFuture,
    _alive_tx: mpsc::Sender<()>,
) {
    let loop_run = accept_loop(listener, tls, conf, service);

    // Either the accept loop fails or the shutdown future
    // completes with error, which cancels the loop.
    let done = assert_send_future::<crate::Result<_>, _>(try_join(loop_run, shutdown_future));

    match runtime.block_on(done) {
        Err(Error::Shutdown) => debug!("server loop shut down"),
        Err(e) => warn!("server loop failed: {}", e),
        Ok((v, _)) => void::unreachable(v),
    }

    // in-flight connections and handlers are abandoned
    runtime.shutdown_background();
}

async fn accept_loop(
    listener: std::net::TcpListener,
    tls: ServerTlsOption,
    conf: ServerConf,
    service: Arc<RwLock<ServerHandlerPaths>>,
) -> crate::Result<Void> {
    let listener = TcpListener::from_std(listener)?;

    loop {
        let (socket, peer_addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                // typically EMFILE, give the process some time to recover
                warn!("accept failed: {}", e);
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
        };

        debug!("accepted connection from {}", peer_addr);

        tokio::spawn(serve_socket(
            socket,
            peer_addr,
            tls.clone(),
            conf.clone(),
            service.clone(),
        ));
    }
}

/// HTTP/1.1 server listening on a single address.
///
/// Can be created with [`ServerBuilder`].
/// The server is stopped when dropped.
pub struct Server {
    scheme: HttpScheme,
    local_addr: SocketAddr,
    service: Arc<RwLock<ServerHandlerPaths>>,
    shutdown: ShutdownSignal,
    alive_rx: mpsc::Receiver<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Server")
            .field("scheme", &self.scheme)
            .field("local_addr", &self.local_addr)
            .finish()
    }
}

impl Server {
    /// Listen address.
    pub fn local_addr(&self) -> &SocketAddr {
        &self.local_addr
    }

    /// `http` or `https`.
    pub fn scheme(&self) -> HttpScheme {
        self.scheme
    }

    /// `scheme://127.0.0.1:port` of the bound listener.
    pub fn origin(&self) -> String {
        format!(
            "{}://{}:{}",
            self.scheme,
            self.local_addr.ip(),
            self.local_addr.port()
        )
    }

    /// Register handler for the path and everything below it.
    ///
    /// Replaces a handler previously registered for the same path.
    pub fn add_context(&self, path: &str, handler: Arc<dyn ServerHandler>) {
        debug!("adding context {} to {}", path, self.origin());
        self.service.write().set_service(path, handler);
    }

    /// Number of registered contexts.
    pub fn context_count(&self) -> usize {
        self.service.read().len()
    }

    /// Is server still alive.
    pub fn is_alive(&self) -> bool {
        self.alive_rx.try_recv() != Err(mpsc::TryRecvError::Disconnected)
    }

    /// Stop the server immediately. Same as drop.
    pub fn stop(self) {}
}

// We shutdown the server in the destructor.
impl Drop for Server {
    fn drop(&mut self) {
        self.shutdown.shutdown();

        // ignore errors of join, it means that server event loop crashed
        if let Some(join) = self.join.take() {
            drop(join.join());
        }

        info!("{} server on {} stopped", self.scheme, self.local_addr);
    }
}
