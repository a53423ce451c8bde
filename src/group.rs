use crate::annotation::AnnotationScopes;

/// Group tag name
const GROUP_TAG: &str = "group";

/// Group used when neither scope declares one.
///
/// Stable by contract: records for untagged routes always land in this
/// group unless the caller overrides it through `ProcessorConfig`.
pub const DEFAULT_GROUP: &str = "general";

/// Resolves a route's documentation group.
///
/// A non-empty method-level `@group` body wins outright; otherwise the
/// class-level body is used; otherwise the supplied default.
pub fn resolve_group(scopes: &AnnotationScopes, default_group: &str) -> String {
    scope_group(scopes.method_scope.get(GROUP_TAG))
        .or_else(|| scope_group(scopes.class_scope.get(GROUP_TAG)))
        .unwrap_or_else(|| default_group.to_string())
}

fn scope_group(body: Option<&str>) -> Option<String> {
    body.map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
}
