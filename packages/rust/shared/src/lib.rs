//! Shared types, error model, and configuration for FluentSitemap.
//!
//! This crate is the foundation depended on by all other FluentSitemap crates.
//! It provides:
//! - [`SitemapError`]: the unified error type, with [`ValidationError`] kinds
//! - Domain types ([`ChangeFrequency`], [`RouteValues`], [`SessionId`],
//!   [`ControllerDescriptor`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, NodeConfig, OutputConfig, RouteConfig, SiteConfig, init_config,
    load_config_from,
};
pub use error::{MAX_LOCATION_LEN, Result, SitemapError, ValidationError};
pub use types::{
    ActionDescriptor, ChangeFrequency, ControllerDescriptor, RouteValue, RouteValues, SessionId,
    controller_name,
};
