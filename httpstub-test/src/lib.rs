//! Helpers shared by httpstub integration tests.

#[macro_use]
mod t;

mod client;
mod raw_conn;

use std::sync::Once;

use rand::distributions::Alphanumeric;
use rand::Rng;

pub use client::*;
pub use raw_conn::*;

// Bind on IPv4, stubs are always served on IPv4 loopback
pub const BIND_HOST: &str = "127.0.0.1";

pub const TEST_CONTENT: &str = "test content";

pub fn init_logger() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        env_logger::init();
    });
}

/// Random alphanumeric string of given length.
pub fn random_content(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
