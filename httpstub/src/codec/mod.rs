//! HTTP/1.x wire format.

pub(crate) mod request_read;
pub(crate) mod response_write;
