use std::collections::hash_map;
use std::collections::HashMap;
use std::sync::Arc;

use crate::server::handler::ServerHandler;
use crate::server::handler::ServerHandlerFn;
use crate::server::req::ServerRequest;
use crate::ServerResponse;

#[derive(Default)]
struct Node {
    service: Option<Arc<dyn ServerHandler>>,
    children: HashMap<String, Node>,
}

impl Node {
    fn add_service(&mut self, path: &str, service: Arc<dyn ServerHandler>) {
        match split_path(path) {
            None => {
                self.service = Some(service);
            }
            Some((first, rem)) => {
                let node = match self.children.entry(first.to_owned()) {
                    hash_map::Entry::Occupied(e) => e.into_mut(),
                    hash_map::Entry::Vacant(e) => e.insert(Node::default()),
                };
                node.add_service(rem, service);
            }
        }
    }

    fn find_service(&self, path: &str) -> Option<&Arc<dyn ServerHandler>> {
        if let Some((first, rem)) = split_path(path) {
            if let Some(node) = self.children.get(first) {
                if let Some(service) = node.find_service(rem) {
                    return Some(service);
                }
            }
        }

        self.service.as_ref()
    }

    fn count(&self) -> usize {
        self.service.iter().count() + self.children.values().map(Node::count).sum::<usize>()
    }
}

fn split_path(mut path: &str) -> Option<(&str, &str)> {
    path = path.trim_start_matches('/');

    if path.is_empty() {
        None
    } else {
        let slash = path.find('/');
        match slash {
            Some(slash) => Some((&path[..slash], &path[slash + 1..])),
            None => Some((path, "")),
        }
    }
}

/// Handlers registered by path prefix, matched by whole path segments.
///
/// The handler with the longest registered prefix of the request path wins,
/// so `/1` serves `/1` and `/1/a`, but not `/10`.
#[derive(Default)]
pub struct ServerHandlerPaths {
    root: Node,
}

impl ServerHandlerPaths {
    /// Empty paths; all requests are answered with `404`.
    pub fn new() -> ServerHandlerPaths {
        Default::default()
    }

    /// Register a service for given path, replacing the previous one.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use httpstub::*;
    ///
    /// struct Root {}
    ///
    /// impl ServerHandler for Root {
    ///     fn start_request(&self, _req: ServerRequest, resp: ServerResponse) -> httpstub::Result<()> {
    ///         resp.send_found_200_plain_text("This is root page")
    ///     }
    /// }
    ///
    /// let mut server = ServerBuilder::new_plain();
    /// server.service.set_service("/", Arc::new(Root {}));
    /// server.service.set_service_fn("/files", |_req, resp| resp.send_found_200_plain_text("This is files"));
    /// ```
    pub fn set_service(&mut self, path: &str, service: Arc<dyn ServerHandler>) {
        debug_assert!(path.starts_with('/'));
        self.root.add_service(path, service);
    }

    pub fn set_service_fn<F>(&mut self, path: &str, service: F)
    where
        F: Fn(ServerRequest, ServerResponse) -> crate::Result<()> + Send + Sync + 'static,
    {
        self.set_service(path, Arc::new(ServerHandlerFn(service)))
    }

    /// Handler for the request path (query is ignored).
    pub fn find_service(&self, path: &str) -> Option<Arc<dyn ServerHandler>> {
        let path = path.split('?').next().unwrap_or_default();
        self.root.find_service(path).cloned()
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.root.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
