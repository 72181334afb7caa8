/// Server configuration.
#[derive(Default, Debug, Clone)]
pub struct ServerConf {
    /// TCP_NODELAY
    pub no_delay: Option<bool>,
    /// Name of the thread driving the server runtime.
    pub thread_name: Option<String>,

    /// Socket option.
    pub backlog: Option<i32>,

    /// Upper bound of threads running request handlers.
    /// Tokio default when not set.
    pub max_blocking_threads: Option<usize>,
}

impl ServerConf {
    pub fn new() -> ServerConf {
        Default::default()
    }
}
