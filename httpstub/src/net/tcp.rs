use std::io;
use std::net::SocketAddr;
use std::net::TcpListener;

use crate::ServerConf;

#[cfg(not(windows))]
fn configure_tcp(tcp: &net2::TcpBuilder) -> io::Result<()> {
    tcp.reuse_address(true)?;
    Ok(())
}

#[cfg(windows)]
fn configure_tcp(_tcp: &net2::TcpBuilder) -> io::Result<()> {
    // SO_REUSEADDR on Windows allows stealing a bound port
    Ok(())
}

/// Bind a listening socket.
///
/// Port zero binds an ephemeral port, the actual one is available
/// from the listener `local_addr`.
pub(crate) fn listener(addr: &SocketAddr, conf: &ServerConf) -> io::Result<TcpListener> {
    let listener = match *addr {
        SocketAddr::V4(_) => net2::TcpBuilder::new_v4()?,
        SocketAddr::V6(_) => net2::TcpBuilder::new_v6()?,
    };

    configure_tcp(&listener)?;
    debug!("binding socket to {}", addr);
    listener.bind(addr)?;
    let backlog = conf.backlog.unwrap_or(1024);
    let listener = listener.listen(backlog)?;
    // required by tokio
    listener.set_nonblocking(true)?;
    Ok(listener)
}
