//! Host configuration for the sample FluentSitemap application.
//!
//! The manifest lives at `fluentsitemap.toml` next to the site by default and
//! describes the base URL, route table, controller registry and literal nodes.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SitemapError};
use crate::types::{ChangeFrequency, ControllerDescriptor, RouteValues};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "fluentsitemap.toml";

// ---------------------------------------------------------------------------
// Config structs (matching fluentsitemap.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Site identity.
    #[serde(default)]
    pub site: SiteConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Named route templates, tried in declaration order.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,

    /// Controller registry scanned for actions.
    #[serde(default)]
    pub controllers: Vec<ControllerDescriptor>,

    /// Literal nodes added after scanning.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Scheme, authority and application path, e.g. `https://example.com/app`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory that `~/` paths map to.
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            root_dir: default_root_dir(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost".into()
}
fn default_root_dir() -> String {
    ".".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the document is written; `~/` is relative to `site.root_dir`.
    #[serde(default = "default_output_path")]
    pub path: String,

    /// Pretty-print with two-space indentation.
    #[serde(default)]
    pub indent: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            indent: false,
        }
    }
}

fn default_output_path() -> String {
    "~/sitemap.xml".into()
}

/// `[[routes]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub name: String,
    /// Slash-separated segments; `{name}` segments are placeholders.
    pub template: String,
    #[serde(default, skip_serializing_if = "RouteValues::is_empty")]
    pub defaults: RouteValues,
    /// Placeholders that may be left out.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional: Vec<String>,
}

/// `[[nodes]]` entry: a literal sitemap node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<ChangeFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
}

impl AppConfig {
    /// The config written by `init_config`: one conventional MVC route.
    pub fn starter() -> Self {
        Self {
            routes: vec![RouteConfig {
                name: "Default".into(),
                template: "{controller}/{action}/{id}".into(),
                defaults: RouteValues::new()
                    .with("controller", "Home")
                    .with("action", "Index"),
                optional: vec!["id".into()],
            }],
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SitemapError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SitemapError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a starter config file. Refuses to overwrite an existing file.
/// Returns the path to the created file.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Err(SitemapError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| SitemapError::io(dir, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::starter())
        .map_err(|e| SitemapError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| SitemapError::io(path, e))?;
    tracing::info!(?path, "created starter config file");

    Ok(path.to_path_buf())
}
