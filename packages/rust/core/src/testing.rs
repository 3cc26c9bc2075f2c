//! Test doubles for the host capabilities.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fluentsitemap_routing::{HostContext, PathResolver, RequestContext, Router};
use fluentsitemap_shared::{Result, RouteValues, SitemapError};

/// Routes `controller/action` to `/Controller/Action?k=v...` and named route
/// `Default` to `/route/Default?k=v...`. Controllers named `Ghost*` and the
/// value [`StubRouter::UNRESOLVABLE`] fail.
pub(crate) struct StubRouter;

impl StubRouter {
    pub(crate) const UNRESOLVABLE: &'static str = "unresolvable";

    fn query(values: &RouteValues) -> Result<String> {
        let mut pairs = Vec::new();
        for (k, v) in values.iter() {
            let v = v.to_string();
            if v == Self::UNRESOLVABLE {
                return Err(SitemapError::unresolved(format!("{k} cannot be routed")));
            }
            pairs.push(format!("{k}={v}"));
        }
        Ok(if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        })
    }
}

impl Router for StubRouter {
    fn resolve_action(&self, controller: &str, action: &str, params: &RouteValues) -> Result<String> {
        if controller.starts_with("Ghost") {
            return Err(SitemapError::unresolved(format!("unknown controller {controller}")));
        }
        Ok(format!("/{controller}/{action}{}", Self::query(params)?))
    }

    fn resolve_route(&self, route_name: &str, values: &RouteValues) -> Result<String> {
        if route_name != "Default" {
            return Err(SitemapError::unresolved(format!("no route named {route_name}")));
        }
        Ok(format!("/route/{route_name}{}", Self::query(values)?))
    }
}

/// Maps `~/x` under a directory and counts how often it is asked.
#[derive(Clone)]
pub(crate) struct CountingPaths {
    root: PathBuf,
    calls: Arc<AtomicUsize>,
}

impl CountingPaths {
    pub(crate) fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PathResolver for CountingPaths {
    fn map_path(&self, virtual_path: &str) -> Result<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.root.join(virtual_path.trim_start_matches("~/")))
    }
}

pub(crate) fn host_with_paths(paths: CountingPaths) -> HostContext {
    let request = RequestContext::parse("https://x").expect("valid base url");
    HostContext::new(request, StubRouter, paths)
}

/// Host at `https://x` with a stub router and a resolver rooted in the temp dir.
pub(crate) fn host() -> HostContext {
    host_with_paths(CountingPaths::new(&std::env::temp_dir()))
}
