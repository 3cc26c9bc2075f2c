//! The sitemap builder.
//!
//! A [`SitemapConfigurator`] is a single-use session: it captures the host's
//! base URL once, accumulates nodes in insertion order (duplicates allowed),
//! and ends with [`export`](SitemapConfigurator::export), [`xml`](SitemapConfigurator::xml)
//! or [`save`](SitemapConfigurator::save).
//!
//! Node sources:
//! - caller-built nodes via [`add`](SitemapConfigurator::add)
//! - controller/action names, resolved by the host [`Router`](fluentsitemap_routing::Router)
//! - typed [`ActionRef`]s
//! - named routes
//! - controller registries and [`SitemapMetadata`] contributors
//!
//! Each source has a singular form and a bulk form driven by a parameter
//! supplier. A bulk call that fails leaves the node list as it was.

use std::path::PathBuf;

use fluentsitemap_routing::HostContext;
use fluentsitemap_shared::{Result, RouteValues, SessionId};
use tracing::{debug, instrument, warn};

use crate::action::ActionRef;
use crate::node::{NodeMut, SitemapNode};
use crate::scanner::{self, ControllerRegistry, SitemapMetadata};
use crate::sitemap::Sitemap;
use crate::xml::XmlOptions;

/// Mutable sitemap-building session.
#[derive(Debug)]
pub struct SitemapConfigurator {
    id: SessionId,
    host: HostContext,
    nodes: Vec<SitemapNode>,
    options: XmlOptions,
}

impl SitemapConfigurator {
    pub fn new(host: HostContext) -> Self {
        let id = SessionId::new();
        debug!(%id, base_url = host.request().base_url(), "sitemap session started");
        Self {
            id,
            host,
            nodes: Vec::new(),
            options: XmlOptions::default(),
        }
    }

    /// Set output formatting for `xml`/`save`/`export`.
    pub fn with_options(mut self, options: XmlOptions) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn host(&self) -> &HostContext {
        &self.host
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

    pub(crate) fn node_mut(&mut self, index: usize) -> &mut SitemapNode {
        &mut self.nodes[index]
    }

    fn push_attached(&mut self, location: String) -> usize {
        self.nodes.push(SitemapNode::attached(self.id, location));
        self.nodes.len() - 1
    }

    /// Run `f`; on error drop whatever it appended.
    fn atomically<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let mark = self.nodes.len();
        let result = f(self);
        if let Err(e) = &result {
            warn!(error = %e, discarded = self.nodes.len() - mark, "bulk add rolled back");
            self.nodes.truncate(mark);
        }
        result
    }

    fn create_many<S, I, F>(
        &mut self,
        resolve: impl Fn(&HostContext, &RouteValues) -> Result<String>,
        supplier: S,
        mut per_node: F,
    ) -> Result<&mut Self>
    where
        S: FnOnce() -> I,
        I: IntoIterator<Item = RouteValues>,
        F: FnMut(&mut SitemapNode),
    {
        self.atomically(|this| {
            let mark = this.nodes.len();
            for values in supplier() {
                let location = resolve(&this.host, &values)?;
                let index = this.push_attached(location);
                per_node(&mut this.nodes[index]);
            }
            debug!(created = this.nodes.len() - mark, "bulk nodes created");
            Ok(())
        })?;
        Ok(self)
    }

    // -----------------------------------------------------------------------
    // Direct nodes
    // -----------------------------------------------------------------------

    /// Validate a caller-built node and append it; the node becomes owned by
    /// this session.
    pub fn add(&mut self, mut node: SitemapNode) -> Result<&mut Self> {
        node.validate()?;
        node.adopt(self.id);
        debug!(location = node.location(), "node added");
        self.nodes.push(node);
        Ok(self)
    }

    /// Append an empty node to fill in fluently. It is validated when the
    /// sitemap is serialized.
    pub fn create(&mut self) -> NodeMut<'_> {
        let index = self.push_attached(String::new());
        NodeMut::new(self, index)
    }

    // -----------------------------------------------------------------------
    // Controller / action
    // -----------------------------------------------------------------------

    pub fn add_action(&mut self, controller: &str, action: &str) -> Result<&mut Self> {
        self.create_action(controller, action)?;
        Ok(self)
    }

    pub fn create_action(&mut self, controller: &str, action: &str) -> Result<NodeMut<'_>> {
        self.create_action_with(controller, action, &RouteValues::new())
    }

    pub fn add_action_with(
        &mut self,
        controller: &str,
        action: &str,
        params: &RouteValues,
    ) -> Result<&mut Self> {
        self.create_action_with(controller, action, params)?;
        Ok(self)
    }

    pub fn create_action_with(
        &mut self,
        controller: &str,
        action: &str,
        params: &RouteValues,
    ) -> Result<NodeMut<'_>> {
        let location = self.host.action_url(controller, action, params)?;
        let index = self.push_attached(location);
        Ok(NodeMut::new(self, index))
    }

    /// One node per parameter set from `supplier`.
    pub fn add_actions<S, I>(&mut self, controller: &str, action: &str, supplier: S) -> Result<&mut Self>
    where
        S: FnOnce() -> I,
        I: IntoIterator<Item = RouteValues>,
    {
        self.create_actions(controller, action, supplier, |_| {})
    }

    /// One node per parameter set from `supplier`; `per_node` runs on each
    /// node right after it is created.
    #[instrument(skip_all, fields(controller = %controller, action = %action))]
    pub fn create_actions<S, I, F>(
        &mut self,
        controller: &str,
        action: &str,
        supplier: S,
        per_node: F,
    ) -> Result<&mut Self>
    where
        S: FnOnce() -> I,
        I: IntoIterator<Item = RouteValues>,
        F: FnMut(&mut SitemapNode),
    {
        self.create_many(
            |host, values| host.action_url(controller, action, values),
            supplier,
            per_node,
        )
    }

    // -----------------------------------------------------------------------
    // Typed actions
    // -----------------------------------------------------------------------

    /// Add a node for a typed call; every argument must be a constant.
    pub fn add_typed(&mut self, action: &ActionRef) -> Result<&mut Self> {
        self.create_typed(action)?;
        Ok(self)
    }

    pub fn create_typed(&mut self, action: &ActionRef) -> Result<NodeMut<'_>> {
        let params = action.parameters()?;
        self.create_action_with(action.controller_name(), action.action_name()?, &params)
    }

    /// Bulk form of [`add_typed`](Self::add_typed). Only the controller and
    /// action are taken from `action`; parameters come from `supplier`.
    pub fn add_typed_many<S, I>(&mut self, action: &ActionRef, supplier: S) -> Result<&mut Self>
    where
        S: FnOnce() -> I,
        I: IntoIterator<Item = RouteValues>,
    {
        self.create_typed_many(action, supplier, |_| {})
    }

    pub fn create_typed_many<S, I, F>(
        &mut self,
        action: &ActionRef,
        supplier: S,
        per_node: F,
    ) -> Result<&mut Self>
    where
        S: FnOnce() -> I,
        I: IntoIterator<Item = RouteValues>,
        F: FnMut(&mut SitemapNode),
    {
        let action_name = action.action_name()?;
        self.create_actions(action.controller_name(), action_name, supplier, per_node)
    }

    // -----------------------------------------------------------------------
    // Named routes
    // -----------------------------------------------------------------------

    pub fn add_route(&mut self, route_name: &str, values: &RouteValues) -> Result<&mut Self> {
        self.create_route(route_name, values)?;
        Ok(self)
    }

    pub fn create_route(&mut self, route_name: &str, values: &RouteValues) -> Result<NodeMut<'_>> {
        let location = self.host.route_url(route_name, values)?;
        let index = self.push_attached(location);
        Ok(NodeMut::new(self, index))
    }

    pub fn add_routes<S, I>(&mut self, route_name: &str, supplier: S) -> Result<&mut Self>
    where
        S: FnOnce() -> I,
        I: IntoIterator<Item = RouteValues>,
    {
        self.create_routes(route_name, supplier, |_| {})
    }

    #[instrument(skip_all, fields(route = %route_name))]
    pub fn create_routes<S, I, F>(
        &mut self,
        route_name: &str,
        supplier: S,
        per_node: F,
    ) -> Result<&mut Self>
    where
        S: FnOnce() -> I,
        I: IntoIterator<Item = RouteValues>,
        F: FnMut(&mut SitemapNode),
    {
        self.create_many(
            |host, values| host.route_url(route_name, values),
            supplier,
            per_node,
        )
    }

    // -----------------------------------------------------------------------
    // Registries and metadata
    // -----------------------------------------------------------------------

    /// Add one node per action the registry exposes.
    #[instrument(skip_all)]
    pub fn from_registry(&mut self, registry: &dyn ControllerRegistry) -> Result<&mut Self> {
        let pages = scanner::discover(registry);
        self.atomically(|this| {
            for (controller, action) in &pages {
                this.add_action(controller, action)?;
            }
            Ok(())
        })?;
        Ok(self)
    }

    pub fn from_registries(&mut self, registries: &[&dyn ControllerRegistry]) -> Result<&mut Self> {
        self.atomically(|this| {
            for registry in registries {
                this.from_registry(*registry)?;
            }
            Ok(())
        })?;
        Ok(self)
    }

    /// Let each contributor add its nodes, in the order given.
    #[instrument(skip_all, fields(contributors = metadata.len()))]
    pub fn from_metadata(&mut self, metadata: &[&dyn SitemapMetadata]) -> Result<&mut Self> {
        self.atomically(|this| {
            for contributor in metadata {
                contributor.populate(this)?;
            }
            Ok(())
        })?;
        Ok(self)
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    /// Freeze the current nodes into a [`Sitemap`].
    pub fn export(&self) -> Sitemap {
        Sitemap::new(self.nodes.clone(), self.host.clone(), self.options)
    }

    pub fn xml(&self) -> Result<String> {
        crate::xml::to_xml(&self.nodes, self.options)
    }

    pub fn save(&self, path: &str) -> Result<PathBuf> {
        self.export().save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Controller;
    use crate::scanner::ControllerSet;
    use crate::testing::{CountingPaths, StubRouter, host, host_with_paths};
    use chrono::NaiveDate;
    use fluentsitemap_shared::{
        ActionDescriptor, ChangeFrequency, ControllerDescriptor, SitemapError, ValidationError,
        route_values,
    };

    fn locations(sitemap: &SitemapConfigurator) -> Vec<&str> {
        sitemap.nodes().iter().map(SitemapNode::location).collect()
    }

    struct OtherController;

    impl Controller for OtherController {
        fn descriptor() -> ControllerDescriptor {
            ControllerDescriptor::new("OtherController")
                .action(ActionDescriptor::new("Index"))
                .action(ActionDescriptor::new("Test").with_parameters(["id", "dude"]))
        }
    }

    #[test]
    fn add_actions_serialize_in_order() {
        let mut sitemap = SitemapConfigurator::new(host());
        sitemap
            .add_action("Home", "Index")
            .unwrap()
            .add_action("Home", "About")
            .unwrap();

        let xml = sitemap.xml().unwrap();
        assert!(xml.ends_with(
            "<url><loc>https://x/Home/Index</loc></url>\
             <url><loc>https://x/Home/About</loc></url></urlset>"
        ));
    }

    #[test]
    fn duplicates_are_kept() {
        let mut sitemap = SitemapConfigurator::new(host());
        sitemap.add_action("Home", "Index").unwrap();
        sitemap.add_action("Home", "Index").unwrap();
        assert_eq!(locations(&sitemap), ["https://x/Home/Index", "https://x/Home/Index"]);
    }

    #[test]
    fn invalid_add_leaves_list_unchanged() {
        let mut sitemap = SitemapConfigurator::new(host());
        sitemap.add(SitemapNode::at("https://x/ok")).unwrap();

        let mut bad = SitemapNode::at("https://x/bad");
        bad.with_priority(1.5);
        let err = sitemap.add(bad).unwrap_err();

        assert!(matches!(
            err,
            SitemapError::InvalidNode(ValidationError::PriorityOutOfRange { .. })
        ));
        assert_eq!(sitemap.len(), 1);
    }

    #[test]
    fn added_node_is_adopted() {
        let mut sitemap = SitemapConfigurator::new(host());
        sitemap.add(SitemapNode::at("http://localhost/mycustomnode/")).unwrap();
        assert_eq!(sitemap.nodes()[0].owner(), Some(sitemap.id()));
    }

    #[test]
    fn create_edits_then_returns_to_builder() {
        let mut sitemap = SitemapConfigurator::new(host());
        sitemap
            .create_route("Default", &route_values! { "controller" => "home", "action" => "index" })
            .unwrap()
            .with_priority(0.3)
            .with_change_frequency(ChangeFrequency::Never)
            .set()
            .unwrap()
            .add_action("Home", "About")
            .unwrap();

        assert_eq!(sitemap.len(), 2);
        let first = &sitemap.nodes()[0];
        assert_eq!(first.location(), "https://x/route/Default?controller=home&action=index");
        assert_eq!(first.priority(), Some(0.3));
        assert_eq!(first.change_frequency(), Some(ChangeFrequency::Never));
        assert_eq!(first.owner(), Some(sitemap.id()));
    }

    #[test]
    fn set_from_copies_metadata() {
        let mut changes = SitemapNode::new();
        changes.with_priority(0.8).with_change_frequency(ChangeFrequency::Monthly);

        let mut sitemap = SitemapConfigurator::new(host());
        sitemap
            .create_action("Home", "Index")
            .unwrap()
            .set_from(&changes)
            .unwrap();

        let node = &sitemap.nodes()[0];
        assert_eq!(node.location(), "https://x/Home/Index");
        assert_eq!(node.priority(), Some(0.8));
        assert_eq!(node.change_frequency(), Some(ChangeFrequency::Monthly));
    }

    #[test]
    fn empty_created_node_fails_at_serialization() {
        let mut sitemap = SitemapConfigurator::new(host());
        let index = sitemap.create().index();
        assert_eq!(index, 0);
        assert!(matches!(
            sitemap.xml(),
            Err(SitemapError::InvalidNode(ValidationError::MissingLocation))
        ));

        sitemap.node_mut(0).with_location("https://x/filled");
        assert!(sitemap.xml().is_ok());
    }

    #[test]
    fn bulk_with_callback_creates_one_node_per_parameter_set() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut calls = 0;

        let mut sitemap = SitemapConfigurator::new(host());
        sitemap
            .create_actions(
                "Home",
                "Index",
                || (1..=3).map(|id| route_values! { "id" => id }),
                |node| {
                    calls += 1;
                    node.with_last_modified(date);
                },
            )
            .unwrap();

        assert_eq!(calls, 3);
        assert_eq!(
            locations(&sitemap),
            [
                "https://x/Home/Index?id=1",
                "https://x/Home/Index?id=2",
                "https://x/Home/Index?id=3",
            ]
        );
        assert!(sitemap.nodes().iter().all(|n| n.last_modified() == Some(date)));
    }

    #[test]
    fn callback_runs_before_next_parameter_set() {
        let mut seen = Vec::new();
        let mut sitemap = SitemapConfigurator::new(host());
        sitemap
            .create_routes(
                "Default",
                || vec![route_values! { "id" => 1 }, route_values! { "id" => 2 }],
                |node| seen.push(node.location().to_string()),
            )
            .unwrap();
        assert_eq!(seen, ["https://x/route/Default?id=1", "https://x/route/Default?id=2"]);
    }

    #[test]
    fn supplier_called_once() {
        let mut supplied = 0;
        let mut sitemap = SitemapConfigurator::new(host());
        sitemap
            .add_routes("Default", || {
                supplied += 1;
                vec![RouteValues::new(), RouteValues::new()]
            })
            .unwrap();
        assert_eq!(supplied, 1);
        assert_eq!(sitemap.len(), 2);
    }

    #[test]
    fn failed_bulk_commits_nothing() {
        let mut sitemap = SitemapConfigurator::new(host());
        sitemap.add_action("Home", "Index").unwrap();

        let err = sitemap
            .add_actions("Home", "Index", || {
                vec![
                    route_values! { "id" => 1 },
                    route_values! { "id" => StubRouter::UNRESOLVABLE },
                    route_values! { "id" => 3 },
                ]
            })
            .unwrap_err();

        assert!(matches!(err, SitemapError::UnresolvedReference { .. }));
        assert_eq!(locations(&sitemap), ["https://x/Home/Index"]);
    }

    #[test]
    fn unknown_route_is_unresolved() {
        let mut sitemap = SitemapConfigurator::new(host());
        let err = sitemap.add_route("Nope", &RouteValues::new()).unwrap_err();
        assert!(matches!(err, SitemapError::UnresolvedReference { .. }));
        assert!(sitemap.is_empty());
    }

    #[test]
    fn typed_action_uses_constant_arguments() {
        let mut sitemap = SitemapConfigurator::new(host());
        sitemap
            .add_typed(&ActionRef::of::<OtherController>("Test").arg(1).arg("jeff"))
            .unwrap();
        assert_eq!(locations(&sitemap), ["https://x/Other/Test?id=1&dude=jeff"]);
    }

    #[test]
    fn typed_action_rejects_non_constant() {
        let mut sitemap = SitemapConfigurator::new(host());
        let action = ActionRef::of::<OtherController>("Test")
            .placeholder("It.Is<int>()")
            .placeholder("It.Is<string>()");

        let err = sitemap.add_typed(&action).unwrap_err();
        assert!(matches!(err, SitemapError::UnsupportedExpressionShape { .. }));
        assert!(sitemap.is_empty());
    }

    #[test]
    fn typed_bulk_ignores_call_site_arguments() {
        let mut sitemap = SitemapConfigurator::new(host());
        let action = ActionRef::of::<OtherController>("Test")
            .placeholder("It.Is<int>()")
            .placeholder("It.Is<string>()");

        sitemap
            .create_typed_many(
                &action,
                || {
                    vec![
                        route_values! { "id" => 1, "dude" => "Khalid" },
                        route_values! { "id" => 2, "dude" => "Mark" },
                    ]
                },
                |node| {
                    node.with_priority(0.2);
                },
            )
            .unwrap();

        assert_eq!(
            locations(&sitemap),
            ["https://x/Other/Test?id=1&dude=Khalid", "https://x/Other/Test?id=2&dude=Mark"]
        );
        assert!(sitemap.nodes().iter().all(|n| n.priority() == Some(0.2)));
    }

    #[test]
    fn export_is_a_snapshot() {
        let mut sitemap = SitemapConfigurator::new(host());
        sitemap.add_action("Home", "Index").unwrap();
        let exported = sitemap.export();

        sitemap.add_action("Home", "About").unwrap();

        assert_eq!(exported.len(), 1);
        assert_eq!(sitemap.len(), 2);
        assert!(!exported.xml().unwrap().contains("About"));
    }

    #[test]
    fn save_goes_through_export() {
        let dir = tempfile::tempdir().unwrap();
        let paths = CountingPaths::new(dir.path());
        let mut sitemap = SitemapConfigurator::new(host_with_paths(paths.clone()));
        sitemap.add_action("Home", "Index").unwrap();

        let written = sitemap.save("~/sitemap.xml").unwrap();
        assert_eq!(written, dir.path().join("sitemap.xml"));
        assert_eq!(paths.calls(), 1);
        let content = std::fs::read_to_string(written).unwrap();
        assert!(content.contains("<loc>https://x/Home/Index</loc>"));
    }

    #[test]
    fn failing_registry_rolls_back_earlier_registries() {
        let first = ControllerSet::new().with(
            ControllerDescriptor::new("HomeController").action(ActionDescriptor::new("Index")),
        );
        let second = ControllerSet::new().with(
            ControllerDescriptor::new("GhostController").action(ActionDescriptor::new("Boo")),
        );

        let mut sitemap = SitemapConfigurator::new(host());
        sitemap.add_action("Home", "About").unwrap();
        let err = sitemap.from_registries(&[&first, &second]).unwrap_err();

        assert!(matches!(err, SitemapError::UnresolvedReference { .. }));
        assert_eq!(locations(&sitemap), ["https://x/Home/About"]);
    }

    struct HalfDoneMetadata;

    impl SitemapMetadata for HalfDoneMetadata {
        fn populate(&self, sitemap: &mut SitemapConfigurator) -> Result<()> {
            sitemap.add_action("Home", "Contact")?;
            Err(SitemapError::unresolved("contact page has no route"))
        }
    }

    struct OtherIndexMetadata;

    impl SitemapMetadata for OtherIndexMetadata {
        fn populate(&self, sitemap: &mut SitemapConfigurator) -> Result<()> {
            sitemap.add_action("Other", "Index")?;
            Ok(())
        }
    }

    #[test]
    fn failing_metadata_rolls_back_whole_call() {
        let mut sitemap = SitemapConfigurator::new(host());
        sitemap.add_action("Home", "About").unwrap();

        let err = sitemap
            .from_metadata(&[&OtherIndexMetadata, &HalfDoneMetadata])
            .unwrap_err();

        assert!(matches!(err, SitemapError::UnresolvedReference { .. }));
        assert_eq!(locations(&sitemap), ["https://x/Home/About"]);
    }
}
