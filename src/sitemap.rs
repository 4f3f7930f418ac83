//! Sitemap generation for the blog.
//!
//! Builds the sitemap-protocol document from the article store: one entry
//! per article with a valid slug plus the home page. Exposed through the
//! `--sitemap` CLI mode, which prints the XML to stdout.

use chrono::{DateTime, Utc};

use crate::cms::ArticleSummary;

/// How often a URL is expected to change, per the sitemap protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Monthly,
    Yearly,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
        }
    }
}

/// One `<url>` element of the sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Build sitemap entries for the site.
///
/// The home page comes first (`monthly`, priority 1.0), followed by one
/// entry per article with a non-empty slug (`yearly`, priority 0.7 —
/// individual posts rank below the home page). Articles without a
/// publication date fall back to `generated_at` for `lastmod`. When the
/// store could not be fetched, callers pass an empty slice and the sitemap
/// degrades to the home entry alone.
pub fn build_sitemap(
    site_url: &str,
    articles: &[ArticleSummary],
    generated_at: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let base = site_url.trim_end_matches('/');

    let mut entries = vec![SitemapEntry {
        url: base.to_string(),
        last_modified: generated_at,
        change_frequency: ChangeFrequency::Monthly,
        priority: 1.0,
    }];

    entries.extend(
        articles
            .iter()
            .filter(|a| !a.slug.is_empty())
            .map(|a| SitemapEntry {
                url: format!("{}/{}", base, a.slug),
                last_modified: a.published_at.unwrap_or(generated_at),
                change_frequency: ChangeFrequency::Yearly,
                priority: 0.7,
            }),
    );

    entries
}

/// Render entries as a sitemap-protocol XML document.
pub fn render_xml(entries: &[SitemapEntry]) -> String {
    let mut out = String::with_capacity(entries.len() * 160 + 128);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for entry in entries {
        out.push_str("  <url>\n");
        out.push_str(&format!("    <loc>{}</loc>\n", xml_escape(&entry.url)));
        out.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            entry.last_modified.format("%Y-%m-%d")
        ));
        out.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.change_frequency.as_str()
        ));
        out.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        out.push_str("  </url>\n");
    }
    out.push_str("</urlset>\n");
    out
}

/// Escape the five XML-significant characters for element content.
fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
