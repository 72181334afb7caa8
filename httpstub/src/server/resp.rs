use bytes::Bytes;
use futures::channel::oneshot;

use crate::assert_types::assert_send;
use crate::Error;
use crate::Headers;
use crate::SimpleHttpMessage;

/// Server response provided to a server callback.
///
/// Response is sent when one of `send_*` methods is called.
pub struct ServerResponse {
    tx: Option<oneshot::Sender<SimpleHttpMessage>>,
    drop_callback: Option<Box<dyn FnOnce() -> crate::Result<SimpleHttpMessage> + Send>>,
}

impl Drop for ServerResponse {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            if let Some(drop_callback) = self.drop_callback.take() {
                warn!("response was not sent, invoking custom callback");
                match drop_callback() {
                    Err(e) => {
                        warn!("custom callback resulted in error: {}", e);
                    }
                    Ok(message) => {
                        drop(tx.send(message));
                    }
                }
            } else {
                // receiver answers 500
                debug!("response dropped without being sent");
            }
        }
    }
}

fn _assert_types() {
    assert_send::<ServerResponse>();
}

impl ServerResponse {
    pub(crate) fn new() -> (ServerResponse, oneshot::Receiver<SimpleHttpMessage>) {
        let (tx, rx) = oneshot::channel();
        (
            ServerResponse {
                tx: Some(tx),
                drop_callback: None,
            },
            rx,
        )
    }

    /// Callback to be invoked on response drop.
    ///
    /// Callback is invoked if a request handler did not send the response.
    pub fn set_drop_callback<F>(&mut self, f: F)
    where
        F: FnOnce() -> crate::Result<SimpleHttpMessage> + Send + 'static,
    {
        self.drop_callback = Some(Box::new(f));
    }

    /// Send complete response.
    pub fn send_message(mut self, message: SimpleHttpMessage) -> crate::Result<()> {
        let tx = self.tx.take().ok_or(Error::ConnectionClosed)?;
        tx.send(message).map_err(|_| Error::ConnectionClosed)
    }

    /// Send status, headers and body.
    pub fn send<B: Into<Bytes>>(self, status: u16, headers: Headers, body: B) -> crate::Result<()> {
        self.send_message(SimpleHttpMessage {
            status,
            headers,
            body: body.into(),
        })
    }

    /// Send response with given status, no headers and empty body.
    pub fn send_status(self, status: u16) -> crate::Result<()> {
        self.send_message(SimpleHttpMessage::new(status))
    }

    /// Send plain text 200 response.
    pub fn send_found_200_plain_text(self, body: &str) -> crate::Result<()> {
        self.send_message(SimpleHttpMessage::found_200_plain_text(body))
    }

    /// Send 302 redirect.
    pub fn send_redirect_302(self, location: &str) -> crate::Result<()> {
        self.send_message(SimpleHttpMessage::redirect_302(location))
    }

    /// Send 404 response.
    pub fn send_not_found_404(self, message: &str) -> crate::Result<()> {
        self.send_message(SimpleHttpMessage::not_found_404(message))
    }

    /// Send internal error.
    pub fn send_internal_error_500(self, message: &str) -> crate::Result<()> {
        self.send_message(SimpleHttpMessage::internal_error_500(message))
    }
}
