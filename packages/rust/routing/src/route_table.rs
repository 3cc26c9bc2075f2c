//! Template-based router.
//!
//! Routes are `/`-separated templates where a whole segment may be a
//! `{placeholder}`. URL generation follows the usual MVC conventions:
//! trailing placeholders that are absent-and-optional or equal to their
//! default are dropped, and leftover values become the query string.

use std::sync::LazyLock;

use fluentsitemap_shared::{Result, RouteConfig, RouteValue, RouteValues, SitemapError};
use regex::Regex;
use tracing::debug;
use url::{Position, Url};

use crate::Router;

/// Matches a whole-segment `{placeholder}`.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{(\w+)\}$").expect("placeholder regex"));

/// Scratch base used only to borrow `url`'s percent-encoding.
const SCRATCH_BASE: &str = "http://route.invalid/";

const CONTROLLER_KEY: &str = "controller";
const ACTION_KEY: &str = "action";

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// One named route template.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    segments: Vec<Segment>,
    defaults: RouteValues,
    optional: Vec<String>,
}

impl Route {
    /// Parse a template such as `{controller}/{action}/{id}`.
    pub fn new(
        name: impl Into<String>,
        template: &str,
        defaults: RouteValues,
        optional: Vec<String>,
    ) -> Result<Self> {
        let name = name.into();
        let mut segments = Vec::new();

        for part in template.split('/').filter(|p| !p.is_empty()) {
            if let Some(caps) = PLACEHOLDER_RE.captures(part) {
                segments.push(Segment::Param(caps[1].to_string()));
            } else if part.contains('{') || part.contains('}') {
                return Err(SitemapError::config(format!(
                    "route {name}: segment {part:?} mixes literal text and placeholders"
                )));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            name,
            segments,
            defaults,
            optional,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn has_param(&self, key: &str) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Param(p) if p.eq_ignore_ascii_case(key)))
    }

    fn is_optional(&self, key: &str) -> bool {
        self.optional.iter().any(|o| o.eq_ignore_ascii_case(key))
    }

    fn matches_default(&self, key: &str, value: &RouteValue) -> bool {
        self.defaults
            .get(key)
            .is_some_and(|d| same_value(d, value))
    }

    /// Whether `key` can be satisfied: by a placeholder, or fixed by a default.
    fn accepts(&self, key: &str, value: &RouteValue) -> bool {
        self.has_param(key) || self.matches_default(key, value)
    }

    /// Generate the app-relative URL (path plus query) for `values`.
    fn build(&self, values: &RouteValues) -> Result<String> {
        let mut parts: Vec<(Option<String>, bool)> = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => parts.push((Some(lit.clone()), false)),
                Segment::Param(key) => match values.get(key) {
                    Some(v) => parts.push((Some(v.to_string()), self.matches_default(key, v))),
                    None => match self.defaults.get(key) {
                        Some(d) => parts.push((Some(d.to_string()), true)),
                        None if self.is_optional(key) => parts.push((None, true)),
                        None => {
                            return Err(SitemapError::unresolved(format!(
                                "route {}: no value for required placeholder {{{key}}}",
                                self.name
                            )));
                        }
                    },
                },
            }
        }

        // Trim trailing placeholders that add nothing.
        while let Some(&(_, droppable)) = parts.last() {
            let is_param = matches!(self.segments[parts.len() - 1], Segment::Param(_));
            if is_param && droppable {
                parts.pop();
            } else {
                break;
            }
        }

        let mut url = Url::parse(SCRATCH_BASE)
            .map_err(|e| SitemapError::unresolved(format!("route {}: {e}", self.name)))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| SitemapError::unresolved(format!("route {}: bad base", self.name)))?;
            path.clear();
            for (value, _) in &parts {
                let value = value.as_deref().ok_or_else(|| {
                    SitemapError::unresolved(format!(
                        "route {}: optional placeholder followed by a value",
                        self.name
                    ))
                })?;
                path.push(value);
            }
        }

        let extra: Vec<(&str, &RouteValue)> = values
            .iter()
            .filter(|(k, v)| !self.has_param(k) && !self.matches_default(k, v))
            .collect();
        if !extra.is_empty() {
            let mut query = url.query_pairs_mut();
            for (k, v) in extra {
                query.append_pair(k, &v.to_string());
            }
        }

        Ok(url[Position::BeforePath..].to_string())
    }
}

fn same_value(a: &RouteValue, b: &RouteValue) -> bool {
    a.to_string().eq_ignore_ascii_case(&b.to_string())
}

/// Ordered set of named routes, optionally restricted to known controllers.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    controllers: Option<Vec<String>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `[[routes]]` config entries.
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self> {
        let mut table = Self::new();
        for route in routes {
            table.push(Route::new(
                route.name.clone(),
                &route.template,
                route.defaults.clone(),
                route.optional.clone(),
            )?);
        }
        Ok(table)
    }

    /// Builder-style route registration.
    pub fn route(
        mut self,
        name: &str,
        template: &str,
        defaults: RouteValues,
        optional: &[&str],
    ) -> Result<Self> {
        let optional = optional.iter().map(|s| s.to_string()).collect();
        self.push(Route::new(name, template, defaults, optional)?);
        Ok(self)
    }

    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Reject controller names outside this set (case-insensitive).
    pub fn with_known_controllers<I, S>(mut self, controllers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.controllers = Some(controllers.into_iter().map(Into::into).collect());
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    fn knows_controller(&self, controller: &str) -> bool {
        self.controllers
            .as_ref()
            .is_none_or(|known| known.iter().any(|c| c.eq_ignore_ascii_case(controller)))
    }
}

impl Router for RouteTable {
    fn resolve_action(
        &self,
        controller: &str,
        action: &str,
        params: &RouteValues,
    ) -> Result<String> {
        if !self.knows_controller(controller) {
            return Err(SitemapError::unresolved(format!(
                "unknown controller {controller}"
            )));
        }

        let mut values = params.clone();
        values.insert(CONTROLLER_KEY, controller);
        values.insert(ACTION_KEY, action);

        let controller_value = RouteValue::from(controller);
        let action_value = RouteValue::from(action);

        for route in &self.routes {
            if !route.accepts(CONTROLLER_KEY, &controller_value)
                || !route.accepts(ACTION_KEY, &action_value)
            {
                continue;
            }
            match route.build(&values) {
                Ok(url) => {
                    debug!(route = route.name(), controller, action, %url, "resolved action");
                    return Ok(url);
                }
                Err(e) => debug!(route = route.name(), error = %e, "route skipped"),
            }
        }

        Err(SitemapError::unresolved(format!(
            "no route matches {controller}.{action}"
        )))
    }

    fn resolve_route(&self, route_name: &str, values: &RouteValues) -> Result<String> {
        let route = self
            .routes
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(route_name))
            .ok_or_else(|| SitemapError::unresolved(format!("no route named {route_name}")))?;

        let url = route.build(values)?;
        debug!(route = route.name(), %url, "resolved route");
        Ok(url)
    }
}
