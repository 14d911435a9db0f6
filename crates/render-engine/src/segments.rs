//! Tag-aware text segmentation
//!
//! Inline injection passes run only over text that sits outside markup tags.
//! The walker hands each text span to a rewrite closure together with the
//! stack of elements currently open around it, and copies tag tokens through
//! verbatim — attribute values are part of the tag token and can never be
//! rewritten.

/// An element open at the current text position
#[derive(Debug, Clone)]
pub struct OpenTag {
    pub name: String,
    /// The raw opening tag, attributes included
    pub raw: String,
}

/// Elements whose subtree must not receive further inline injection
pub fn is_protected(stack: &[OpenTag]) -> bool {
    stack.iter().any(|tag| {
        tag.name == "a"
            || tag.name == "mark"
            || tag.raw.contains("data-note")
            || tag.raw.contains("data-ncm")
            || tag.raw.contains("highlight-exclusion")
            || tag.raw.contains("highlight-unit")
    })
}

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

/// Rewrite every text span of `input` through `rewrite`, leaving tags intact.
pub fn rewrite_text_segments<F>(input: &str, mut rewrite: F) -> String
where
    F: FnMut(&str, &[OpenTag]) -> String,
{
    let mut out = String::with_capacity(input.len());
    let mut stack: Vec<OpenTag> = Vec::new();
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        let (text, tail) = rest.split_at(open);
        if !text.is_empty() {
            out.push_str(&rewrite(text, &stack));
        }

        let Some(close) = find_tag_end(tail) else {
            // Unterminated tag: treat the remainder as text
            out.push_str(&rewrite(tail, &stack));
            return out;
        };
        let raw_tag = &tail[..=close];
        out.push_str(raw_tag);
        update_stack(&mut stack, raw_tag);
        rest = &tail[close + 1..];
    }

    if !rest.is_empty() {
        out.push_str(&rewrite(rest, &stack));
    }
    out
}

/// Byte offset of the `>` terminating the tag that starts `tag`, honoring
/// quoted attribute values.
fn find_tag_end(tag: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, ch) in tag.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '>' => return Some(idx),
                _ => {}
            },
        }
    }
    None
}

fn tag_name(raw_tag: &str) -> String {
    raw_tag
        .trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn update_stack(stack: &mut Vec<OpenTag>, raw_tag: &str) {
    let name = tag_name(raw_tag);
    if name.is_empty() {
        return;
    }
    if raw_tag.starts_with("</") {
        if let Some(pos) = stack.iter().rposition(|t| t.name == name) {
            stack.truncate(pos);
        }
    } else if !raw_tag.ends_with("/>") && !VOID_TAGS.contains(&name.as_str()) {
        stack.push(OpenTag {
            name,
            raw: raw_tag.to_string(),
        });
    }
}
