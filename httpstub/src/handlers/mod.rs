//! Built-in request handlers.

mod echo;
mod fixed;

pub use self::echo::Echo;
pub use self::fixed::FixedResponse;
