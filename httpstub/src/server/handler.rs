use crate::server::req::ServerRequest;
use crate::ServerResponse;

/// Server request callback.
///
/// This trait can be implemented by handler provided by user.
/// Handlers are invoked on a blocking thread pool, concurrently
/// with other requests, so blocking inside a handler is fine.
pub trait ServerHandler: Send + Sync + 'static {
    /// Serve the request.
    ///
    /// `req` is fully read, including the body.
    /// The handler is expected to consume `resp` by sending a response;
    /// if the response is dropped unsent, the client receives `500`.
    fn start_request(&self, req: ServerRequest, resp: ServerResponse) -> crate::Result<()>;
}

/// Adapter which makes `ServerHandler` from a function.
pub struct ServerHandlerFn<F>(pub F);

impl<F> ServerHandler for ServerHandlerFn<F>
where
    F: Fn(ServerRequest, ServerResponse) -> crate::Result<()> + Send + Sync + 'static,
{
    fn start_request(&self, req: ServerRequest, resp: ServerResponse) -> crate::Result<()> {
        (self.0)(req, resp)
    }
}
