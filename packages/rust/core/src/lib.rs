//! Fluent sitemap construction for FluentSitemap.
//!
//! A [`SitemapConfigurator`] collects [`SitemapNode`]s from literal URLs,
//! controller actions, named routes, or controller discovery, then renders
//! them as a sitemaps.org `urlset` document. Location resolution goes through
//! the [`HostContext`](fluentsitemap_routing::HostContext) handed to the
//! builder, so this crate carries no routing of its own.

pub mod action;
pub mod configurator;
pub mod node;
pub mod scanner;
pub mod sitemap;
pub mod validator;
pub mod xml;

#[cfg(test)]
pub(crate) mod testing;

pub use action::{ActionArg, ActionRef, Controller};
pub use configurator::SitemapConfigurator;
pub use node::{NodeMut, SitemapNode};
pub use scanner::{ActionScanner, ControllerRegistry, ControllerSet, SitemapMetadata};
pub use sitemap::Sitemap;
pub use validator::validate;
pub use xml::{SITEMAP_NAMESPACE, XmlOptions};
