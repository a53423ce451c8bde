/// Result type alias for the documentation pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the documentation pipeline
#[derive(Debug)]
pub enum Error {
    /// A `@bodyParam` body that is missing its name, missing its type, or
    /// carries an unrecognized type token. Recoverable: the offending
    /// parameter is skipped, the rest of the route still parses.
    MalformedParameterTag { parameter: String, message: String },
    /// A `@transformer` tag names an adapter that is not registered.
    UnknownTransformer(String),
    /// A `@transformermodel` tag (or a registry default) names a model with
    /// no registered sample factory.
    UnknownModel(String),
    /// The route's handler reference has no entry in the handler registry.
    UnknownHandler(String),
    /// Invoking a handler returned an error or panicked. Recoverable: the
    /// route record is emitted without a captured response.
    HandlerInvocation { handler: String, message: String },
    /// A handler dependency could not be resolved. Recoverable: invocation
    /// continues with an absent placeholder argument.
    UnresolvedDependency(String),
    SerializationError(String),
    /// Fatal wrapper attached by the orchestrator: identifies the route and
    /// carries the underlying cause.
    RouteProcessing { route: String, source: Box<Error> },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MalformedParameterTag { parameter, message } => {
                write!(f, "malformed parameter tag '{}': {}", parameter, message)
            }
            Error::UnknownTransformer(name) => write!(f, "unknown transformer: {}", name),
            Error::UnknownModel(name) => write!(f, "unknown model: {}", name),
            Error::UnknownHandler(handler) => write!(f, "unknown handler: {}", handler),
            Error::HandlerInvocation { handler, message } => {
                write!(f, "handler invocation failed for {}: {}", handler, message)
            }
            Error::UnresolvedDependency(type_id) => {
                write!(f, "unresolved dependency: {}", type_id)
            }
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            Error::RouteProcessing { route, source } => {
                write!(f, "failed to process route {}: {}", route, source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::RouteProcessing { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML serialization error: {}", err))
    }
}
