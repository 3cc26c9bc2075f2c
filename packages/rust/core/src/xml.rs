//! sitemaps.org 0.9 XML serialization.
//!
//! Emits `<?xml version="1.0" encoding="UTF-8" standalone="yes"?>` followed by
//! a `urlset` with one `url` per node, children in the fixed order
//! `loc, lastmod, changefreq, priority` and only for fields that are set.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::{debug, instrument};

use fluentsitemap_shared::{Result, SitemapError};

use crate::node::SitemapNode;

/// XML namespace of the sitemap protocol.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// `lastmod` date format (calendar date only).
const LASTMOD_FORMAT: &str = "%Y-%m-%d";

/// Indentation width when pretty-printing.
const INDENT_SIZE: usize = 2;

/// Output formatting options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XmlOptions {
    /// Pretty-print with two-space indentation.
    pub indent: bool,
}

/// Serialize `nodes` into a UTF-8 string.
pub fn to_xml(nodes: &[SitemapNode], opts: XmlOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_urlset(nodes, &mut buf, opts)?;
    String::from_utf8(buf).map_err(|e| SitemapError::Xml(e.to_string()))
}

/// Serialize `nodes` into `out`.
///
/// Every node is validated before the first byte is written, so an invalid
/// node leaves `out` untouched.
#[instrument(skip_all, fields(nodes = nodes.len(), indent = opts.indent))]
pub fn write_urlset<W: Write>(nodes: &[SitemapNode], out: W, opts: XmlOptions) -> Result<()> {
    for node in nodes {
        node.validate()?;
    }

    let mut writer = if opts.indent {
        Writer::new_with_indent(out, b' ', INDENT_SIZE)
    } else {
        Writer::new(out)
    };

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    emit(&mut writer, Event::Start(urlset))?;

    for node in nodes {
        emit(&mut writer, Event::Start(BytesStart::new("url")))?;

        // every node has a location
        text_element(&mut writer, "loc", node.location())?;

        if let Some(date) = node.last_modified() {
            text_element(&mut writer, "lastmod", &date.format(LASTMOD_FORMAT).to_string())?;
        }

        if let Some(freq) = node.change_frequency() {
            text_element(&mut writer, "changefreq", freq.as_str())?;
        }

        if let Some(priority) = node.priority() {
            text_element(&mut writer, "priority", &priority.to_string())?;
        }

        emit(&mut writer, Event::End(BytesEnd::new("url")))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("urlset")))?;
    writer
        .get_mut()
        .flush()
        .map_err(|e| SitemapError::Xml(e.to_string()))?;

    debug!("urlset written");
    Ok(())
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| SitemapError::Xml(e.to_string()))
}
