/// A single `@tag body` occurrence inside a comment block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name as written, without the leading `@`
    pub name: String,
    /// Raw body text, trimmed; empty for zero-argument tags
    pub body: String,
}

/// Parsed form of one documentation comment block.
///
/// Tags keep their original order so multi-occurrence tags (parameters) can
/// be collected as a sequence; single-value lookups take the last
/// occurrence. Non-tag lines accumulate as free text with line breaks
/// preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationBlock {
    tags: Vec<Tag>,
    free_text: String,
}

impl AnnotationBlock {
    /// Parses raw comment text into an annotation block.
    ///
    /// Recognizes lines matching `@<identifier> <rest-of-line>`; an
    /// identifier-only line is a zero-argument tag. Tag bodies never span
    /// multiple lines. Anything else is free text. Empty or absent input
    /// yields an empty block, silently.
    pub fn parse(comment: &str) -> Self {
        let mut tags = Vec::new();
        let mut free_lines: Vec<&str> = Vec::new();

        for line in comment.lines() {
            match parse_tag_line(line) {
                Some(tag) => tags.push(tag),
                None => free_lines.push(line),
            }
        }

        // Drop blank lines framing the prose so an empty block stays empty
        while free_lines.first().is_some_and(|l| l.trim().is_empty()) {
            free_lines.remove(0);
        }
        while free_lines.last().is_some_and(|l| l.trim().is_empty()) {
            free_lines.pop();
        }

        Self {
            tags,
            free_text: free_lines.join("\n"),
        }
    }

    /// Body of the last occurrence of a tag, matched case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .rev()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .map(|t| t.body.as_str())
    }

    /// All occurrences of a tag, in original order
    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |t| t.name.eq_ignore_ascii_case(name))
            .map(|t| t.body.as_str())
    }

    /// Whether the tag appears at least once, regardless of body
    pub fn has(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// The non-tagged prose portion of the block
    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    /// True when the block carries neither tags nor free text
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.free_text.is_empty()
    }
}

/// Class-level and method-level annotation blocks for one route.
///
/// Every resolver receives this pair explicitly; there is no implicit
/// fallback through inheritance.
#[derive(Debug, Clone, Default)]
pub struct AnnotationScopes {
    pub class_scope: AnnotationBlock,
    pub method_scope: AnnotationBlock,
}

impl AnnotationScopes {
    /// Create scopes from raw class-level and method-level comment text
    pub fn parse(class_comment: &str, method_comment: &str) -> Self {
        Self {
            class_scope: AnnotationBlock::parse(class_comment),
            method_scope: AnnotationBlock::parse(method_comment),
        }
    }
}

/// Parse one line as a tag, or return None for free text
fn parse_tag_line(line: &str) -> Option<Tag> {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix('@')?;

    let name_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(rest.len());
    if name_len == 0 {
        // A lone '@' is prose, not a tag
        return None;
    }

    let (name, remainder) = rest.split_at(name_len);
    // Tag bodies are separated by whitespace; '@foo(bar)' is prose
    if !remainder.is_empty() && !remainder.starts_with(char::is_whitespace) {
        return None;
    }

    Some(Tag {
        name: name.to_string(),
        body: remainder.trim().to_string(),
    })
}
