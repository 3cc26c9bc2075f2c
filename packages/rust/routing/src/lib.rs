//! Host-side capabilities the sitemap builder consumes.
//!
//! The builder never routes or touches the filesystem layout itself. A host
//! supplies:
//! - a [`Router`] that maps controller/action or named-route references to URLs
//! - a [`PathResolver`] that maps `~/` application-relative paths to disk
//! - a [`RequestContext`] carrying the base scheme, authority and app path
//!
//! [`HostContext`] bundles the three. [`RouteTable`] and [`AppRoot`] are
//! ready-made implementations for hosts without their own routing layer.

mod paths;
mod route_table;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use fluentsitemap_shared::{Result, RouteValues, SitemapError};
use url::Url;

pub use paths::{AppRoot, VIRTUAL_ROOT};
pub use route_table::{Route, RouteTable};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Maps symbolic references to URLs.
///
/// Implementations may return an absolute URL, which is used verbatim, or an
/// application-relative path such as `/Home/About`, which is prefixed with the
/// request's base URL.
pub trait Router: Send + Sync {
    /// Resolve a controller/action pair plus parameters.
    fn resolve_action(&self, controller: &str, action: &str, params: &RouteValues)
    -> Result<String>;

    /// Resolve a named route with route values.
    fn resolve_route(&self, route_name: &str, values: &RouteValues) -> Result<String>;
}

/// Maps `~/`-prefixed virtual paths to filesystem paths.
pub trait PathResolver: Send + Sync {
    fn map_path(&self, virtual_path: &str) -> Result<PathBuf>;
}

// ---------------------------------------------------------------------------
// RequestContext
// ---------------------------------------------------------------------------

/// Base URL of the running application, captured once per builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    base_url: String,
}

impl RequestContext {
    /// Build from a request URL: keeps scheme, host, explicit port and path
    /// (the application path), dropping any trailing `/`, query and fragment.
    pub fn from_url(url: &Url) -> Result<Self> {
        let host = url
            .host_str()
            .ok_or(SitemapError::MissingArgument { name: "host" })?;

        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        Ok(Self {
            base_url: format!(
                "{}://{}{}",
                url.scheme(),
                authority,
                url.path().trim_end_matches('/')
            ),
        })
    }

    /// Parse a base URL string such as `https://example.com/app/`.
    pub fn parse(base_url: &str) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(SitemapError::MissingArgument { name: "base_url" });
        }
        let url = Url::parse(base_url)
            .map_err(|e| SitemapError::config(format!("invalid base URL {base_url}: {e}")))?;
        Self::from_url(&url)
    }

    /// `scheme://authority/app-path` without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Qualify a routed URL against the base. Absolute URLs pass through.
    pub fn absolute(&self, routed: &str) -> String {
        if routed.starts_with("http://") || routed.starts_with("https://") {
            routed.to_string()
        } else if routed.starts_with('/') {
            format!("{}{routed}", self.base_url)
        } else {
            format!("{}/{routed}", self.base_url)
        }
    }
}

// ---------------------------------------------------------------------------
// HostContext
// ---------------------------------------------------------------------------

/// Everything a builder needs from the enclosing application.
///
/// Cheap to clone; the router and resolver are shared read-only.
#[derive(Clone)]
pub struct HostContext {
    request: RequestContext,
    router: Arc<dyn Router>,
    paths: Arc<dyn PathResolver>,
}

impl HostContext {
    pub fn new(
        request: RequestContext,
        router: impl Router + 'static,
        paths: impl PathResolver + 'static,
    ) -> Self {
        Self::shared(request, Arc::new(router), Arc::new(paths))
    }

    /// Build from already-shared collaborators.
    pub fn shared(
        request: RequestContext,
        router: Arc<dyn Router>,
        paths: Arc<dyn PathResolver>,
    ) -> Self {
        Self {
            request,
            router,
            paths,
        }
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    pub fn paths(&self) -> &dyn PathResolver {
        self.paths.as_ref()
    }

    /// Resolve a controller/action reference to an absolute URL.
    pub fn action_url(&self, controller: &str, action: &str, params: &RouteValues) -> Result<String> {
        let routed = self.router.resolve_action(controller, action, params)?;
        Ok(self.request.absolute(&routed))
    }

    /// Resolve a named route to an absolute URL.
    pub fn route_url(&self, route_name: &str, values: &RouteValues) -> Result<String> {
        let routed = self.router.resolve_route(route_name, values)?;
        Ok(self.request.absolute(&routed))
    }
}

impl fmt::Debug for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostContext")
            .field("base_url", &self.request.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoRouter;

    impl Router for EchoRouter {
        fn resolve_action(&self, controller: &str, action: &str, _: &RouteValues) -> Result<String> {
            Ok(format!("/{controller}/{action}"))
        }

        fn resolve_route(&self, route_name: &str, _: &RouteValues) -> Result<String> {
            if route_name == "External" {
                return Ok("https://cdn.example.com/feed".into());
            }
            Err(SitemapError::unresolved(format!("no route named {route_name}")))
        }
    }

    #[test]
    fn base_url_keeps_app_path_and_port() {
        let ctx = RequestContext::parse("http://localhost:8080/shop/").unwrap();
        assert_eq!(ctx.base_url(), "http://localhost:8080/shop");

        let ctx = RequestContext::parse("https://example.com/?q=1#top").unwrap();
        assert_eq!(ctx.base_url(), "https://example.com");
    }

    #[test]
    fn default_port_is_dropped() {
        let ctx = RequestContext::parse("https://example.com:443/app").unwrap();
        assert_eq!(ctx.base_url(), "https://example.com/app");
    }

    #[test]
    fn missing_host_is_missing_argument() {
        let err = RequestContext::parse("file:///var/www").unwrap_err();
        assert!(matches!(err, SitemapError::MissingArgument { name: "host" }));

        let err = RequestContext::parse("  ").unwrap_err();
        assert!(matches!(err, SitemapError::MissingArgument { name: "base_url" }));
    }

    #[test]
    fn absolute_joins_relative_and_passes_absolute() {
        let ctx = RequestContext::parse("https://x/app").unwrap();
        assert_eq!(ctx.absolute("/Home/Index"), "https://x/app/Home/Index");
        assert_eq!(ctx.absolute("Home/Index"), "https://x/app/Home/Index");
        assert_eq!(ctx.absolute("https://y/z"), "https://y/z");
    }

    #[test]
    fn host_context_qualifies_router_output() {
        let host = HostContext::new(
            RequestContext::parse("https://x").unwrap(),
            EchoRouter,
            AppRoot::new("/srv/site"),
        );
        let url = host.action_url("Home", "About", &RouteValues::new()).unwrap();
        assert_eq!(url, "https://x/Home/About");

        let url = host.route_url("External", &RouteValues::new()).unwrap();
        assert_eq!(url, "https://cdn.example.com/feed");

        let err = host.route_url("Blog", &RouteValues::new()).unwrap_err();
        assert!(matches!(err, SitemapError::UnresolvedReference { .. }));
    }
}
