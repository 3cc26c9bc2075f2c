//! Error types for FluentSitemap.
//!
//! Library crates use [`SitemapError`] via `thiserror`.
//! The sample host (cli) wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Maximum length of a sitemap `<loc>` value, per the sitemaps.org protocol.
pub const MAX_LOCATION_LEN: usize = 2048;

/// Why a sitemap node was rejected.
///
/// Checks run in declaration order and stop at the first violation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// No node was supplied.
    #[error("node is required")]
    MissingNode,

    /// `location` is empty or whitespace.
    #[error("location is required")]
    MissingLocation,

    /// `location` does not start with `http://` or `https://`.
    #[error("location must start with http:// or https://")]
    InvalidScheme,

    /// `location` exceeds [`MAX_LOCATION_LEN`].
    #[error("location cannot be longer than {MAX_LOCATION_LEN} characters (got {len})")]
    LocationTooLong { len: usize },

    /// `priority` is outside `0.0..=1.0`.
    #[error("priority must be between 0.0 and 1.0 (got {priority})")]
    PriorityOutOfRange { priority: f64 },
}

/// Top-level error type for all FluentSitemap operations.
#[derive(Debug, thiserror::Error)]
pub enum SitemapError {
    /// A node failed validation on `add` or before serialization.
    #[error("invalid node: {0}")]
    InvalidNode(#[from] ValidationError),

    /// The router could not map a route, controller or action to a URL.
    #[error("unresolved reference: {message}")]
    UnresolvedReference { message: String },

    /// A typed action reference carried an argument that is not a constant.
    #[error("unsupported expression shape: {message}")]
    UnsupportedExpressionShape { message: String },

    /// `set()` was called on a node that no sitemap owns.
    #[error("you attempted to set a node outside of a sitemap")]
    UnownedNode,

    /// A required argument (path, host, ...) was empty or absent.
    #[error("missing argument: {name}")]
    MissingArgument { name: &'static str },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// XML writer failure.
    #[error("xml error: {0}")]
    Xml(String),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SitemapError>;

impl SitemapError {
    /// Create an unresolved-reference error from any displayable message.
    pub fn unresolved(msg: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            message: msg.into(),
        }
    }

    /// Create an unsupported-expression error from any displayable message.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedExpressionShape {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
