use bytes::Bytes;

use crate::Headers;

/// Simple HTTP message is status, headers and body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleHttpMessage {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl Default for SimpleHttpMessage {
    fn default() -> SimpleHttpMessage {
        SimpleHttpMessage::new(200)
    }
}

impl SimpleHttpMessage {
    /// New message with empty headers and body.
    pub fn new(status: u16) -> SimpleHttpMessage {
        SimpleHttpMessage {
            status,
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    fn plain_text(status: u16, body: &str) -> SimpleHttpMessage {
        SimpleHttpMessage {
            status,
            headers: Headers::new().with("Content-Type", "text/plain; charset=utf-8"),
            body: Bytes::copy_from_slice(body.as_bytes()),
        }
    }

    /// Create 200 message.
    pub fn found_200_plain_text(body: &str) -> SimpleHttpMessage {
        SimpleHttpMessage::plain_text(200, body)
    }

    /// Create 302 redirect message.
    pub fn redirect_302(location: &str) -> SimpleHttpMessage {
        SimpleHttpMessage {
            status: 302,
            headers: Headers::new().with("Location", location),
            body: Bytes::new(),
        }
    }

    /// Create 400 message.
    pub fn bad_request_400(message: &str) -> SimpleHttpMessage {
        SimpleHttpMessage::plain_text(400, message)
    }

    /// Create 404 message.
    pub fn not_found_404(message: &str) -> SimpleHttpMessage {
        SimpleHttpMessage::plain_text(404, message)
    }

    /// Create 500 message.
    pub fn internal_error_500(message: &str) -> SimpleHttpMessage {
        SimpleHttpMessage::plain_text(500, message)
    }
}
