//! Regenerates the site's own RSS 2.0 channel from stored records.

use crate::feed::types::NormalizedRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMeta {
    pub title: String,
    pub description: String,
    pub link: String,
}

/// Render `records` as an RSS document, in the order given.
pub fn render_channel(meta: &ChannelMeta, records: &[NormalizedRecord]) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<rss version=\"2.0\">\n<channel>\n");
    push_element(&mut out, "  ", "title", &meta.title);
    push_element(&mut out, "  ", "link", &meta.link);
    push_element(&mut out, "  ", "description", &meta.description);

    for record in records {
        out.push_str("  <item>\n");
        push_element(&mut out, "    ", "title", &record.title);
        push_element(&mut out, "    ", "link", &record.external_url);
        push_element(&mut out, "    ", "guid", &record.external_url);
        push_element(&mut out, "    ", "description", &record.description);
        push_element(&mut out, "    ", "pubDate", &record.published_at.to_rfc2822());
        out.push_str("  </item>\n");
    }

    out.push_str("</channel>\n</rss>\n");
    out
}

fn push_element(out: &mut String, indent: &str, tag: &str, text: &str) {
    out.push_str(&format!("{indent}<{tag}>{}</{tag}>\n", escape(text)));
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
