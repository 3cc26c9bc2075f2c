//! Exported, read-only sitemap and file output.

use std::io::Write;
use std::path::PathBuf;

use fluentsitemap_routing::{HostContext, VIRTUAL_ROOT};
use fluentsitemap_shared::{Result, SitemapError};
use tracing::{info, instrument};

use crate::node::SitemapNode;
use crate::xml::{self, XmlOptions};

/// An immutable snapshot of a builder's nodes.
///
/// Nodes added to the builder after [`export`](crate::SitemapConfigurator::export)
/// do not show up here.
#[derive(Debug, Clone)]
pub struct Sitemap {
    nodes: Vec<SitemapNode>,
    host: HostContext,
    options: XmlOptions,
}

impl Sitemap {
    pub(crate) fn new(nodes: Vec<SitemapNode>, host: HostContext, options: XmlOptions) -> Self {
        Self {
            nodes,
            host,
            options,
        }
    }

    pub fn nodes(&self) -> &[SitemapNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The sitemap document as a string.
    pub fn xml(&self) -> Result<String> {
        xml::to_xml(&self.nodes, self.options)
    }

    /// Stream the sitemap document into `out`.
    pub fn write_xml<W: Write>(&self, out: W) -> Result<()> {
        xml::write_urlset(&self.nodes, out, self.options)
    }

    /// Write the document to `path` and return where it went.
    ///
    /// `~/` paths go through the host's path resolver; anything else is used
    /// as given.
    #[instrument(skip_all, fields(path = %path, nodes = self.nodes.len()))]
    pub fn save(&self, path: &str) -> Result<PathBuf> {
        let target = resolve_target(&self.host, path)?;
        let document = self.xml()?;

        std::fs::write(&target, document).map_err(|e| SitemapError::io(&target, e))?;
        info!(target = %target.display(), "sitemap saved");

        Ok(target)
    }
}

fn resolve_target(host: &HostContext, path: &str) -> Result<PathBuf> {
    if path.trim().is_empty() {
        return Err(SitemapError::MissingArgument { name: "path" });
    }

    if path.starts_with(VIRTUAL_ROOT) {
        host.paths().map_path(path)
    } else {
        Ok(PathBuf::from(path))
    }
}
