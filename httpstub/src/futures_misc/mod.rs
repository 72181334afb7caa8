mod shutdown_signal;

pub(crate) use self::shutdown_signal::*;
