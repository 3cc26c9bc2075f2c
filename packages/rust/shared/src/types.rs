//! Core domain types for FluentSitemap.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Suffix stripped from controller type names to get the logical name.
const CONTROLLER_SUFFIX: &str = "Controller";

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// A UUID v7 identifying one sitemap builder session (time-sortable).
///
/// Nodes created by a builder remember this id instead of holding a
/// reference to the builder itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new session identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ChangeFrequency
// ---------------------------------------------------------------------------

/// How often the page at a location is likely to change (`<changefreq>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// Lower-cased protocol value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown change frequency: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// RouteValue / RouteValues
// ---------------------------------------------------------------------------

/// A single literal route or action parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for RouteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

impl From<&str> for RouteValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for RouteValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<bool> for RouteValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for RouteValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for RouteValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for RouteValue {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for RouteValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// An ordered parameter bag for route/action resolution.
///
/// Keys compare case-insensitively; inserting an existing key replaces its
/// value in place so declaration order is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, RouteValue>", into = "BTreeMap<String, RouteValue>")]
pub struct RouteValues {
    entries: Vec<(String, RouteValue)>,
}

impl RouteValues {
    /// An empty parameter bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RouteValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RouteValue>) {
        let key = key.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&RouteValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RouteValues
where
    K: Into<String>,
    V: Into<RouteValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (k, v) in iter {
            values.insert(k, v);
        }
        values
    }
}

impl From<BTreeMap<String, RouteValue>> for RouteValues {
    fn from(map: BTreeMap<String, RouteValue>) -> Self {
        map.into_iter().collect()
    }
}

impl From<RouteValues> for BTreeMap<String, RouteValue> {
    fn from(values: RouteValues) -> Self {
        values.entries.into_iter().collect()
    }
}

/// Build a [`RouteValues`] bag from `key => value` pairs.
///
/// ```
/// use fluentsitemap_shared::route_values;
/// let values = route_values! { "id" => 1, "slug" => "intro" };
/// assert_eq!(values.len(), 2);
/// ```
#[macro_export]
macro_rules! route_values {
    () => { $crate::RouteValues::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::RouteValues::new()$(.with($key, $value))+
    };
}

// ---------------------------------------------------------------------------
// Controller / action descriptors
// ---------------------------------------------------------------------------

/// One invokable method on a controller, as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Method name as declared.
    pub method: String,
    /// Explicit action-name override (the "rename" annotation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Declared parameter names, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
    /// Whether the method is publicly invokable.
    #[serde(default = "default_true")]
    pub public: bool,
    /// Whether the return type belongs to the content/view result family.
    #[serde(default = "default_true")]
    pub returns_content: bool,
}

fn default_true() -> bool {
    true
}

impl ActionDescriptor {
    /// A public, content-returning action with no parameters.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            name: None,
            parameters: Vec::new(),
            public: true,
            returns_content: true,
        }
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    pub fn non_content(mut self) -> Self {
        self.returns_content = false;
        self
    }

    /// Logical action name: the rename override if present, else the method name.
    pub fn action_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.method)
    }

    /// Public and returning content, i.e. reachable as a page.
    pub fn is_action(&self) -> bool {
        self.public && self.returns_content
    }
}

/// A route-handler type and its methods, as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerDescriptor {
    /// Type name, e.g. `HomeController`.
    pub name: String,
    #[serde(default)]
    pub actions: Vec<ActionDescriptor>,
}

impl ControllerDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
        }
    }

    pub fn action(mut self, action: ActionDescriptor) -> Self {
        self.actions.push(action);
        self
    }

    /// Type name with any `Controller` suffix stripped, case preserved.
    pub fn logical_name(&self) -> &str {
        controller_name(&self.name)
    }

    /// Find a method by its declared name.
    pub fn find_method(&self, method: &str) -> Option<&ActionDescriptor> {
        self.actions.iter().find(|a| a.method == method)
    }
}

/// Strip a trailing `Controller` (any case) from a type name.
pub fn controller_name(type_name: &str) -> &str {
    let split = type_name.len().saturating_sub(CONTROLLER_SUFFIX.len());
    match type_name.get(split..) {
        Some(tail) if tail.eq_ignore_ascii_case(CONTROLLER_SUFFIX) => &type_name[..split],
        _ => type_name,
    }
}
