//! Controller discovery and decentralized sitemap contributions.
//!
//! A [`ControllerRegistry`] reports the host's controller types; the scanner
//! keeps every public, content-returning method and adds one node per action
//! with no parameters. [`SitemapMetadata`] contributors add their own nodes to
//! a shared builder instead.

use fluentsitemap_routing::HostContext;
use fluentsitemap_shared::{ControllerDescriptor, Result};
use tracing::{debug, info, instrument};

use crate::action::Controller;
use crate::configurator::SitemapConfigurator;

/// Enumerates the types the host classifies as controllers.
pub trait ControllerRegistry {
    fn controllers(&self) -> Vec<ControllerDescriptor>;
}

/// Adds a feature area's nodes to a shared builder.
pub trait SitemapMetadata {
    fn populate(&self, sitemap: &mut SitemapConfigurator) -> Result<()>;
}

/// A fixed list of controllers.
#[derive(Debug, Clone, Default)]
pub struct ControllerSet {
    controllers: Vec<ControllerDescriptor>,
}

impl ControllerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a typed controller.
    pub fn register<C: Controller>(mut self) -> Self {
        self.controllers.push(C::descriptor());
        self
    }

    pub fn with(mut self, controller: ControllerDescriptor) -> Self {
        self.controllers.push(controller);
        self
    }
}

impl From<Vec<ControllerDescriptor>> for ControllerSet {
    fn from(controllers: Vec<ControllerDescriptor>) -> Self {
        Self { controllers }
    }
}

impl ControllerRegistry for ControllerSet {
    fn controllers(&self) -> Vec<ControllerDescriptor> {
        self.controllers.clone()
    }
}

/// `(controller, action)` logical names of every page action in `registry`,
/// in registry order.
pub fn discover(registry: &dyn ControllerRegistry) -> Vec<(String, String)> {
    let mut pages = Vec::new();

    for controller in registry.controllers() {
        let name = controller.logical_name();
        let before = pages.len();

        // Loop through all the methods picking out the controller actions.
        for action in controller.actions.iter().filter(|a| a.is_action()) {
            pages.push((name.to_string(), action.action_name().to_string()));
        }

        debug!(
            controller = %controller.name,
            actions = pages.len() - before,
            "controller scanned"
        );
    }

    pages
}

/// One-shot builders from registries or metadata contributors.
#[derive(Debug, Clone)]
pub struct ActionScanner {
    host: HostContext,
}

impl ActionScanner {
    pub fn new(host: HostContext) -> Self {
        Self { host }
    }

    /// A fresh builder holding one node per discovered action.
    #[instrument(skip_all, fields(registries = registries.len()))]
    pub fn scan(&self, registries: &[&dyn ControllerRegistry]) -> Result<SitemapConfigurator> {
        let mut sitemap = SitemapConfigurator::new(self.host.clone());
        sitemap.from_registries(registries)?;
        info!(nodes = sitemap.len(), "controllers scanned");
        Ok(sitemap)
    }

    /// A fresh builder populated by each contributor in order.
    pub fn from_metadata(&self, metadata: &[&dyn SitemapMetadata]) -> Result<SitemapConfigurator> {
        let mut sitemap = SitemapConfigurator::new(self.host.clone());
        sitemap.from_metadata(metadata)?;
        Ok(sitemap)
    }
}
