// src/core/html.rs
//
// Case-insensitive tag scanning over raw HTML. No DOM, no regex: standings pages
// are scanned block by block (`<table>…</table>`, `<tr>…</tr>`, `<a …>…</a>`).

/// Next `<o …>…c` block at or after `from`, as byte offsets `(start, end)`.
/// Only ASCII case is folded, so offsets stay valid in the original string.
pub fn next_tag_block_ci(s: &str, o: &str, c: &str, from: usize) -> Option<(usize, usize)> {
    let lc = s.to_ascii_lowercase();
    let ol = o.to_ascii_lowercase();
    let cl = c.to_ascii_lowercase();
    let start = lc.get(from..)?.find(&ol)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(&cl)?;
    let end = open_end + end_rel + c.len();
    Some((start, end))
}

/// Byte spans of all `<tag …>…</tag>` blocks in order (non-nested).
/// `tag_spans(doc, "a")` does not pick up `<abbr>` or `<article>`.
pub fn tag_spans(s: &str, tag: &str) -> Vec<(usize, usize)> {
    let open = join!("<", tag);
    let close = join!("</", tag, ">");
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((b_s, b_e)) = next_tag_block_ci(s, &open, &close, pos) {
        let after = bytes.get(b_s + open.len()).copied().unwrap_or(b'>');
        if after == b'>' || after == b'/' || after.is_ascii_whitespace() {
            out.push((b_s, b_e));
            pos = b_e;
        } else {
            pos = b_s + open.len();
        }
    }
    out
}

pub fn tag_blocks<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    tag_spans(s, tag).into_iter().map(|(a, b)| &s[a..b]).collect()
}

pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

/// The opening tag of a block, e.g. `<a href="/nfl/team/_/name/kc" class="x">`.
pub fn open_tag(block: &str) -> &str {
    match block.find('>') {
        Some(i) => &block[..=i],
        None => block,
    }
}

/// Attribute value from an opening tag; quotes optional.
pub fn attr_value<'a>(open: &'a str, name: &str) -> Option<&'a str> {
    let lc = open.to_ascii_lowercase();
    let needle = join!(&name.to_ascii_lowercase(), "=");
    let mut from = 0usize;
    // must be preceded by whitespace so `data-href=` doesn't match `href=`
    let at = loop {
        let i = lc[from..].find(&needle)? + from;
        if i > 0 && lc.as_bytes()[i - 1].is_ascii_whitespace() {
            break i;
        }
        from = i + needle.len();
    };
    let val = &open[at + needle.len()..];
    let (quote, off) = match val.as_bytes().first() {
        Some(b'"') => (Some('"'), 1),
        Some(b'\'') => (Some('\''), 1),
        _ => (None, 0),
    };
    let end = match quote {
        Some(q) => val[off..].find(q).map(|e| off + e).unwrap_or(val.len()),
        None => val
            .find(|c: char| c.is_ascii_whitespace() || c == '>')
            .unwrap_or(val.len()),
    };
    Some(&val[off..end])
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}

/// Visible text of a block: entities normalized, tags stripped, whitespace collapsed.
pub fn text_of(block: &str) -> String {
    strip_tags(super::sanitize::normalize_entities(block))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_value_quoted_and_bare() {
        let tag = r#"<a class="AnchorLink" href="/nfl/team/_/name/kc/kansas-city-chiefs">"#;
        assert_eq!(attr_value(tag, "href"), Some("/nfl/team/_/name/kc/kansas-city-chiefs"));
        assert_eq!(attr_value("<td colspan=4 class=seed>", "class"), Some("seed"));
        assert_eq!(attr_value(r#"<a data-href="x">"#, "href"), None);
    }

    #[test]
    fn tag_blocks_in_order() {
        let doc = "<TR><td>1</td></TR><tr><td>2</td></tr>";
        let rows = tag_blocks(doc, "tr");
        assert_eq!(rows.len(), 2);
        assert_eq!(text_of(rows[1]), "2");
    }

    #[test]
    fn spans_skip_longer_tag_names() {
        let doc = "<abbr>KC</abbr><a href=/nfl/team/kc>Chiefs</a>";
        let spans = tag_spans(doc, "a");
        assert_eq!(spans.len(), 1);
        assert_eq!(text_of(&doc[spans[0].0..spans[0].1]), "Chiefs");
    }
}
