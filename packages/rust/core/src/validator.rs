//! Node validation, run on `add` and again before serialization.

use fluentsitemap_shared::{MAX_LOCATION_LEN, ValidationError};

use crate::node::SitemapNode;

/// Check a node against the sitemap protocol constraints.
///
/// In order: the node is present, `location` is non-blank, starts with
/// `http://` or `https://`, is at most [`MAX_LOCATION_LEN`] characters, and
/// `priority` (if set) lies in `0.0..=1.0`. Stops at the first violation.
pub fn validate(node: Option<&SitemapNode>) -> Result<(), ValidationError> {
    let node = node.ok_or(ValidationError::MissingNode)?;
    let location = node.location();

    if location.trim().is_empty() {
        return Err(ValidationError::MissingLocation);
    }

    if !location.starts_with("http://") && !location.starts_with("https://") {
        return Err(ValidationError::InvalidScheme);
    }

    let len = location.chars().count();
    if len > MAX_LOCATION_LEN {
        return Err(ValidationError::LocationTooLong { len });
    }

    if let Some(priority) = node.priority() {
        if !(0.0..=1.0).contains(&priority) {
            return Err(ValidationError::PriorityOutOfRange { priority });
        }
    }

    Ok(())
}
