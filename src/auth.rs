use crate::annotation::AnnotationScopes;

/// Authentication tag name
const AUTH_TAG: &str = "authenticated";

/// Resolves whether a route requires authentication.
///
/// Presence of `@authenticated` at either scope sets the flag; the tag body
/// is ignored. There are no negated auth semantics.
pub fn resolve_authentication(scopes: &AnnotationScopes) -> bool {
    scopes.method_scope.has(AUTH_TAG) || scopes.class_scope.has(AUTH_TAG)
}
