/// Entities decoded by [`normalize`], applied in this order as successive replacements.
const ENTITIES: [(&str, &str); 5] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// Turn an HTML fragment into a single line of plain text.
pub fn normalize(raw: &str) -> String {
    let stripped = strip_tags(raw);
    let decoded = ENTITIES
        .iter()
        .fold(stripped, |text, &(entity, ch)| text.replace(entity, ch));
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop every `<…>` run that has at least one character between the brackets.
fn strip_tags(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let after = &rest[lt + 1..];
        match after.find('>') {
            Some(0) => {
                // `<>` is not a tag
                out.push('<');
                rest = after;
            }
            Some(gt) => rest = &after[gt + 1..],
            None => {
                out.push_str(&rest[lt..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}
