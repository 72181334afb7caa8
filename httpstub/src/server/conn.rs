use std::net::SocketAddr;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::codec::request_read::RequestReader;
use crate::codec::response_write::encode_response;
use crate::codec::response_write::CONTINUE_100;
use crate::misc::any_to_string;
use crate::server::handler_paths::ServerHandlerPaths;
use crate::server::req::ServerRequest;
use crate::Error;
use crate::ServerConf;
use crate::ServerResponse;
use crate::ServerTlsOption;
use crate::SimpleHttpMessage;

/// Serve one accepted TCP connection until the peer closes it
/// or the connection is no longer kept alive.
pub(crate) async fn serve_socket(
    socket: TcpStream,
    peer_addr: SocketAddr,
    tls: ServerTlsOption,
    conf: ServerConf,
    service: Arc<RwLock<ServerHandlerPaths>>,
) {
    let no_delay = conf.no_delay.unwrap_or(true);
    if let Err(e) = socket.set_nodelay(no_delay) {
        warn!("failed to set TCP_NODELAY for {}: {}", peer_addr, e);
    }

    let r = match tls {
        ServerTlsOption::Plain => serve_conn(socket, peer_addr, service).await,
        ServerTlsOption::Tls(acceptor) => match acceptor.accept(socket).await {
            Ok(tls_stream) => {
                debug!("TLS handshake done with {}", peer_addr);
                serve_conn(tls_stream, peer_addr, service).await
            }
            Err(e) => Err(Error::TlsError(e)),
        },
    };

    match r {
        Ok(()) => debug!("connection from {} closed", peer_addr),
        Err(e) => debug!("connection from {} failed: {}", peer_addr, e),
    }
}

async fn serve_conn<S>(
    socket: S,
    peer_addr: SocketAddr,
    service: Arc<RwLock<ServerHandlerPaths>>,
) -> crate::Result<()>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (read, mut write) = tokio::io::split(socket);
    let mut reader = RequestReader::new(read);

    loop {
        let head = match reader.read_head().await {
            Ok(Some(head)) => head,
            Ok(None) => return Ok(()),
            Err(e @ Error::MalformedRequest(..)) => {
                let message = SimpleHttpMessage::bad_request_400(&e.to_string());
                write.write_all(&encode_response(&message, false, true)).await?;
                write.shutdown().await?;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        debug!("{} {} {} from {}", head.method, head.uri, head.protocol(), peer_addr);

        if head.expects_continue() {
            write.write_all(CONTINUE_100).await?;
            write.flush().await?;
        }

        let body = reader.read_body(&head).await?;

        let keep_alive = head.keep_alive();
        let head_only = head.method == "HEAD";

        let message = dispatch(&service, ServerRequest::new(head, body, peer_addr)).await;

        write
            .write_all(&encode_response(&message, head_only, !keep_alive))
            .await?;
        write.flush().await?;

        if !keep_alive {
            write.shutdown().await?;
            return Ok(());
        }
    }
}

/// Find the handler for the request and run it on the blocking pool.
async fn dispatch(
    service: &RwLock<ServerHandlerPaths>,
    req: ServerRequest,
) -> SimpleHttpMessage {
    let handler = service.read().find_service(req.path());
    let handler = match handler {
        Some(handler) => handler,
        None => {
            debug!("serving 404 for path {}", req.path());
            return SimpleHttpMessage::not_found_404("No context found for request");
        }
    };

    let path = req.path().to_owned();
    let (resp, rx): (ServerResponse, _) = ServerResponse::new();

    let join = tokio::task::spawn_blocking(move || {
        let r = handler.start_request(req, resp);
        if let Err(e) = &r {
            warn!("request handler failed: {}", e);
        }
        r
    });

    match rx.await {
        Ok(message) if message.status < 200 || message.status > 999 => {
            warn!("handler for {} responded with status {}", path, message.status);
            SimpleHttpMessage::internal_error_500(
                &Error::InvalidStatusCode(message.status).to_string(),
            )
        }
        Ok(message) => message,
        Err(_canceled) => {
            let reason = match join.await {
                Ok(Ok(())) => Error::ResponseNotSent,
                Ok(Err(e)) => e,
                Err(e) if e.is_panic() => Error::HandlerPanicked(any_to_string(e.into_panic())),
                Err(e) => Error::InternalError(e.to_string()),
            };
            warn!("responding 500 to {}: {}", path, reason);
            SimpleHttpMessage::internal_error_500(&reason.to_string())
        }
    }
}
