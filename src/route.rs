use crate::introspect::DeclarationSite;

/// HTTP methods accepted by route definitions.
///
/// These correspond to the standard methods used in RESTful APIs and render
/// as upper-case strings in documentation records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP DELETE method
    Delete,
    /// HTTP PATCH method
    Patch,
    /// HTTP OPTIONS method
    Options,
    /// HTTP HEAD method
    Head,
}

impl HttpMethod {
    /// Canonical upper-case string form, as it appears in a record's
    /// `methods` list.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }
}

/// Opaque binding from a route to its handler code.
///
/// A handler is either a method on a controller type or a registered
/// closure. The reference carries no behavior itself; the handler registry
/// and the source introspector give it meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HandlerRef {
    /// A method on a named controller type
    Method { type_name: String, method: String },
    /// A registered closure or free function
    Closure { name: String },
}

impl HandlerRef {
    /// Convenience constructor for a controller method reference
    pub fn method(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        HandlerRef::Method {
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    /// Convenience constructor for a closure reference
    pub fn closure(name: impl Into<String>) -> Self {
        HandlerRef::Closure { name: name.into() }
    }

    /// Registry key for this handler (`Type@method` or the closure name)
    pub fn key(&self) -> String {
        match self {
            HandlerRef::Method { type_name, method } => format!("{}@{}", type_name, method),
            HandlerRef::Closure { name } => name.clone(),
        }
    }

    /// Declaration site of the surrounding type, when there is one.
    ///
    /// Closures have no class-level annotation scope.
    pub fn class_site(&self) -> Option<DeclarationSite> {
        match self {
            HandlerRef::Method { type_name, .. } => {
                Some(DeclarationSite::Type(type_name.clone()))
            }
            HandlerRef::Closure { .. } => None,
        }
    }

    /// Declaration site of the handler itself
    pub fn method_site(&self) -> DeclarationSite {
        match self {
            HandlerRef::Method { type_name, method } => DeclarationSite::Method {
                type_name: type_name.clone(),
                method: method.clone(),
            },
            HandlerRef::Closure { name } => DeclarationSite::Function(name.clone()),
        }
    }
}

/// A single route definition as supplied by the external route table.
///
/// Immutable once constructed; the processor never mutates or caches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// HTTP methods this route answers to, in declaration order
    pub methods: Vec<HttpMethod>,
    /// The URL path pattern (e.g., "/api/users/{id}")
    pub path: String,
    /// Binding to the handler code
    pub handler: HandlerRef,
}

impl Route {
    /// Create a new Route
    pub fn new(methods: Vec<HttpMethod>, path: impl Into<String>, handler: HandlerRef) -> Self {
        Self {
            methods,
            path: path.into(),
            handler,
        }
    }

    /// Human-readable identity used in error reporting (e.g., "GET /api/test")
    pub fn identity(&self) -> String {
        let methods: Vec<&str> = self.methods.iter().map(HttpMethod::as_str).collect();
        format!("{} {}", methods.join("|"), self.path)
    }

    /// The route's methods as upper-case strings, in declaration order
    pub fn method_names(&self) -> Vec<String> {
        self.methods
            .iter()
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_strings() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_handler_key() {
        let handler = HandlerRef::method("UserController", "show");
        assert_eq!(handler.key(), "UserController@show");

        let closure = HandlerRef::closure("list_users");
        assert_eq!(closure.key(), "list_users");
    }

    #[test]
    fn test_handler_sites() {
        let handler = HandlerRef::method("UserController", "show");
        assert_eq!(
            handler.class_site(),
            Some(DeclarationSite::Type("UserController".to_string()))
        );
        assert_eq!(
            handler.method_site(),
            DeclarationSite::Method {
                type_name: "UserController".to_string(),
                method: "show".to_string(),
            }
        );

        let closure = HandlerRef::closure("list_users");
        assert_eq!(closure.class_site(), None);
        assert_eq!(
            closure.method_site(),
            DeclarationSite::Function("list_users".to_string())
        );
    }

    #[test]
    fn test_route_identity() {
        let route = Route::new(
            vec![HttpMethod::Get, HttpMethod::Post],
            "/api/test",
            HandlerRef::closure("dummy"),
        );
        assert_eq!(route.identity(), "GET|POST /api/test");
        assert_eq!(route.method_names(), vec!["GET", "POST"]);
    }
}
