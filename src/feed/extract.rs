//! Tolerant `<item>` scanner for RSS bodies.
//!
//! This is a textual scan, not an XML parse: anything outside `<item>` blocks
//! is ignored, and inside a block only four exact tag names are looked at.
//! Every search moves forward through the input, so the whole pass stays
//! linear in the document length.

use super::types::RawFeedEntry;

const ITEM_OPEN: &str = "<item>";
const ITEM_CLOSE: &str = "</item>";
const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Pull every complete entry out of `xml`, in document order.
pub fn extract(xml: &str) -> Vec<RawFeedEntry> {
    item_blocks(xml).filter_map(parse_item).collect()
}

/// Inner text of each `<item>…</item>` block. An unterminated trailing block is skipped.
pub fn item_blocks(xml: &str) -> ItemBlocks<'_> {
    ItemBlocks { rest: xml }
}

pub struct ItemBlocks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for ItemBlocks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let open = self.rest.find(ITEM_OPEN)?;
        let body_start = open + ITEM_OPEN.len();
        let Some(close) = self.rest[body_start..].find(ITEM_CLOSE) else {
            self.rest = "";
            return None;
        };
        let body_end = body_start + close;
        let block = &self.rest[body_start..body_end];
        self.rest = &self.rest[body_end + ITEM_CLOSE.len()..];
        Some(block)
    }
}

/// Build an entry from one block; `None` when title, link or pubDate is missing or empty.
pub fn parse_item(block: &str) -> Option<RawFeedEntry> {
    let title = required_field(block, "title")?;
    let link = required_field(block, "link")?;
    let description = field(block, "description").unwrap_or_default();
    let pub_date = required_field(block, "pubDate")?;

    Some(RawFeedEntry {
        title,
        link,
        description,
        pub_date,
    })
}

fn required_field(block: &str, tag: &str) -> Option<String> {
    field(block, tag).filter(|v| !v.is_empty())
}

/// Value of `tag` inside `block`: a CDATA payload if one exists, else the plain inner text.
pub fn field(block: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    cdata_value(block, &open, &close)
        .or_else(|| plain_value(block, &open, &close))
        .map(|v| v.trim().to_string())
}

/// First `<tag>` ws `<![CDATA[ payload ]]>` ws `</tag>` in the block.
///
/// The payload runs to the first `]]>` that is followed by `</tag>`, so a
/// split escape like `]]]]><![CDATA[>` stays inside it.
fn cdata_value<'a>(block: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let mut cursor = 0;

    while let Some(found) = block[cursor..].find(open) {
        let content_start = cursor + found + open.len();
        cursor = content_start;

        let payload_start = content_start + leading_ws(&block[content_start..]);
        if !block[payload_start..].starts_with(CDATA_OPEN) {
            continue;
        }
        // No terminator after this opener means none after any later one either.
        let payload_start = payload_start + CDATA_OPEN.len();
        let end = find_terminator(block, payload_start, close)?;
        return Some(&block[payload_start..end]);
    }

    None
}

/// Position of the first `]]>` at or after `from` that is followed by ws and `close`.
fn find_terminator(block: &str, from: usize, close: &str) -> Option<usize> {
    let mut from = from;
    loop {
        let end = from + block[from..].find(CDATA_CLOSE)?;
        let tail = end + CDATA_CLOSE.len();
        let tail = tail + leading_ws(&block[tail..]);
        if block[tail..].starts_with(close) {
            return Some(end);
        }
        from = end + 1;
    }
}

/// Text between the first `<tag>` and the `</tag>` after it.
fn plain_value<'a>(block: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = block.find(open)? + open.len();
    let len = block[start..].find(close)?;
    Some(&block[start..start + len])
}

fn leading_ws(s: &str) -> usize {
    s.len() - s.trim_start().len()
}
