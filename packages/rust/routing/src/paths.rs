//! `~/` virtual path mapping.

use std::path::{Component, Path, PathBuf};

use fluentsitemap_shared::{Result, SitemapError};

use crate::PathResolver;

/// Marker for application-relative paths.
pub const VIRTUAL_ROOT: &str = "~/";

/// Maps `~/a/b` to `<root>/a/b`.
///
/// Paths that would land outside the root (absolute remainders, `..`
/// segments) are rejected.
#[derive(Debug, Clone)]
pub struct AppRoot {
    root: PathBuf,
}

impl AppRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PathResolver for AppRoot {
    fn map_path(&self, virtual_path: &str) -> Result<PathBuf> {
        let relative = virtual_path.strip_prefix(VIRTUAL_ROOT).ok_or_else(|| {
            SitemapError::unresolved(format!(
                "{virtual_path} is not an application-relative path"
            ))
        })?;

        let relative = Path::new(relative);
        let escapes = relative.is_absolute()
            || relative.components().any(|c| {
                matches!(
                    c,
                    Component::ParentDir | Component::RootDir | Component::Prefix(_)
                )
            });
        if escapes {
            return Err(SitemapError::unresolved(format!(
                "{virtual_path} leaves the application root {}",
                self.root.display()
            )));
        }

        Ok(self.root.join(relative))
    }
}
