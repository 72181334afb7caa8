use bytes::Bytes;

use crate::Headers;
use crate::ServerHandler;
use crate::ServerRequest;
use crate::ServerResponse;
use crate::SimpleHttpMessage;

/// Answers every request with the same status, headers and body.
///
/// The request itself is ignored.
#[derive(Debug, Clone)]
pub struct FixedResponse {
    message: SimpleHttpMessage,
}

impl FixedResponse {
    pub fn new<B: Into<Bytes>>(status: u16, headers: Headers, content: B) -> FixedResponse {
        FixedResponse {
            message: SimpleHttpMessage {
                status,
                headers,
                body: content.into(),
            },
        }
    }

    pub fn message(&self) -> &SimpleHttpMessage {
        &self.message
    }
}

impl From<SimpleHttpMessage> for FixedResponse {
    fn from(message: SimpleHttpMessage) -> FixedResponse {
        FixedResponse { message }
    }
}

impl ServerHandler for FixedResponse {
    fn start_request(&self, _req: ServerRequest, resp: ServerResponse) -> crate::Result<()> {
        resp.send_message(self.message.clone())
    }
}
