use bytes::BufMut;
use bytes::Bytes;
use bytes::BytesMut;

use crate::SimpleHttpMessage;

/// Headers owned by the framing, values configured by handlers are dropped.
const FRAMING_HEADERS: &[&str] = &["content-length", "transfer-encoding", "connection"];

fn reason_phrase(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}

/// Whether a response with this status is allowed to have a body.
fn status_allows_body(status: u16) -> bool {
    !(status < 200 || status == 204 || status == 304)
}

fn is_framing_header(name: &str) -> bool {
    FRAMING_HEADERS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(name))
}

/// Serialize an HTTP/1.1 response.
///
/// `head_only` is set for responses to `HEAD` requests: the length is announced
/// but the body is not written.
pub(crate) fn encode_response(message: &SimpleHttpMessage, head_only: bool, close: bool) -> Bytes {
    let mut buf = BytesMut::with_capacity(256 + message.body.len());

    buf.put_slice(
        format!(
            "HTTP/1.1 {} {}\r\n",
            message.status,
            reason_phrase(message.status)
        )
        .as_bytes(),
    );

    for header in &message.headers {
        if is_framing_header(&header.name) {
            warn!("ignoring framing header {} set by handler", header.name);
            continue;
        }
        for value in &header.values {
            buf.put_slice(header.name.as_bytes());
            buf.put_slice(b": ");
            buf.put_slice(value.as_bytes());
            buf.put_slice(b"\r\n");
        }
    }

    let with_body = status_allows_body(message.status);
    if with_body {
        buf.put_slice(format!("Content-Length: {}\r\n", message.body.len()).as_bytes());
    }
    if close {
        buf.put_slice(b"Connection: close\r\n");
    }
    buf.put_slice(b"\r\n");

    if with_body && !head_only {
        buf.put_slice(&message.body);
    }

    buf.freeze()
}

/// Interim response for `Expect: 100-continue`.
pub(crate) const CONTINUE_100: &[u8] = b"HTTP/1.1 100 Continue\r\n\r\n";
