//! Sitemap nodes: one `<url>` entry each.

use std::ops::Deref;

use chrono::NaiveDate;
use fluentsitemap_shared::{ChangeFrequency, Result, SessionId, SitemapError, ValidationError};

use crate::configurator::SitemapConfigurator;
use crate::validator;

/// One entry in the sitemap.
///
/// A node is either *attached* (created by a [`SitemapConfigurator`], which it
/// remembers by [`SessionId`]) or *detached* (built by the caller and later
/// handed to [`SitemapConfigurator::add`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SitemapNode {
    location: String,
    last_modified: Option<NaiveDate>,
    change_frequency: Option<ChangeFrequency>,
    priority: Option<f64>,
    owner: Option<SessionId>,
}

impl SitemapNode {
    /// An empty, detached node.
    pub fn new() -> Self {
        Self::default()
    }

    /// A detached node pointing at `location`.
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    pub(crate) fn attached(owner: SessionId, location: String) -> Self {
        Self {
            location,
            owner: Some(owner),
            ..Self::default()
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn last_modified(&self) -> Option<NaiveDate> {
        self.last_modified
    }

    pub fn change_frequency(&self) -> Option<ChangeFrequency> {
        self.change_frequency
    }

    pub fn priority(&self) -> Option<f64> {
        self.priority
    }

    /// The builder session that owns this node, if any.
    pub fn owner(&self) -> Option<SessionId> {
        self.owner
    }

    pub(crate) fn adopt(&mut self, owner: SessionId) {
        self.owner = Some(owner);
    }

    pub fn with_location(&mut self, location: impl Into<String>) -> &mut Self {
        self.location = location.into();
        self
    }

    pub fn with_last_modified(&mut self, last_modified: impl Into<Option<NaiveDate>>) -> &mut Self {
        self.last_modified = last_modified.into();
        self
    }

    pub fn with_change_frequency(
        &mut self,
        change_frequency: impl Into<Option<ChangeFrequency>>,
    ) -> &mut Self {
        self.change_frequency = change_frequency.into();
        self
    }

    pub fn with_priority(&mut self, priority: impl Into<Option<f64>>) -> &mut Self {
        self.priority = priority.into();
        self
    }

    /// Copy `lastmod`, `changefreq` and `priority` from `changes` (never the
    /// location) and hand back the owning session.
    ///
    /// Fails with [`SitemapError::UnownedNode`] on a detached node, before
    /// anything is copied.
    pub fn set(&mut self, changes: Option<&SitemapNode>) -> Result<SessionId> {
        let owner = self.owner.ok_or(SitemapError::UnownedNode)?;

        if let Some(changes) = changes {
            self.change_frequency = changes.change_frequency;
            self.last_modified = changes.last_modified;
            self.priority = changes.priority;
        }

        Ok(owner)
    }

    /// Run [`validator::validate`] on this node.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        validator::validate(Some(self))
    }
}

// ---------------------------------------------------------------------------
// NodeMut
// ---------------------------------------------------------------------------

/// Fluent handle to a node that a builder just appended.
///
/// The handle borrows the builder; [`NodeMut::set`] ends the node edit and
/// returns the builder so chaining can continue.
pub struct NodeMut<'a> {
    sitemap: &'a mut SitemapConfigurator,
    index: usize,
}

impl<'a> NodeMut<'a> {
    pub(crate) fn new(sitemap: &'a mut SitemapConfigurator, index: usize) -> Self {
        Self { sitemap, index }
    }

    fn node(&mut self) -> &mut SitemapNode {
        self.sitemap.node_mut(self.index)
    }

    /// Position of the node in the builder's list.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.node().with_location(location);
        self
    }

    pub fn with_last_modified(mut self, last_modified: impl Into<Option<NaiveDate>>) -> Self {
        self.node().with_last_modified(last_modified);
        self
    }

    pub fn with_change_frequency(
        mut self,
        change_frequency: impl Into<Option<ChangeFrequency>>,
    ) -> Self {
        self.node().with_change_frequency(change_frequency);
        self
    }

    pub fn with_priority(mut self, priority: impl Into<Option<f64>>) -> Self {
        self.node().with_priority(priority);
        self
    }

    /// Return to the owning builder.
    pub fn set(self) -> Result<&'a mut SitemapConfigurator> {
        self.finish(None)
    }

    /// Copy metadata from `changes`, then return to the owning builder.
    pub fn set_from(self, changes: &SitemapNode) -> Result<&'a mut SitemapConfigurator> {
        self.finish(Some(changes))
    }

    fn finish(mut self, changes: Option<&SitemapNode>) -> Result<&'a mut SitemapConfigurator> {
        self.node().set(changes)?;
        Ok(self.sitemap)
    }
}

impl Deref for NodeMut<'_> {
    type Target = SitemapNode;

    fn deref(&self) -> &SitemapNode {
        &self.sitemap.nodes()[self.index]
    }
}
