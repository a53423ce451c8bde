use crate::annotation::AnnotationScopes;

/// Short and long description of an endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointDescription {
    /// First line of the free-text portion
    pub title: String,
    /// Remaining lines, joined by newline
    pub description: String,
}

/// Resolves an endpoint's title and description from its annotation scopes.
///
/// Method-level free text wholly overrides class-level free text when
/// present; there is no merging of partial content. The first line becomes
/// the title and the remaining lines, joined by `\n`, the description. Text
/// passes through verbatim apart from dropping the blank separator lines
/// around the split; punctuation is never enforced or altered.
pub fn resolve_description(scopes: &AnnotationScopes) -> EndpointDescription {
    let free_text = if scopes.method_scope.free_text().is_empty() {
        scopes.class_scope.free_text()
    } else {
        scopes.method_scope.free_text()
    };

    split_free_text(free_text)
}

fn split_free_text(free_text: &str) -> EndpointDescription {
    let mut lines = free_text.lines();

    let title = match lines.next() {
        Some(line) => line.to_string(),
        None => return EndpointDescription::default(),
    };

    let rest: Vec<&str> = lines
        .skip_while(|l| l.trim().is_empty())
        .collect();

    EndpointDescription {
        title,
        description: rest.join("\n"),
    }
}
