use crate::annotation::AnnotationScopes;
use crate::auth::resolve_authentication;
use crate::description::resolve_description;
use crate::error::{Error, Result};
use crate::group::{resolve_group, DEFAULT_GROUP};
use crate::introspect::{SourceIntrospector, StaticIntrospector};
use crate::invoke::{DependencyResolver, HandlerInvoker, HandlerRegistry, NullResolver};
use crate::parameter::{parse_parameters, ParameterDeclaration};
use crate::response::ResponseMaterializer;
use crate::route::Route;
use crate::transform::{ModelRegistry, TransformerRegistry};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Processor configuration.
///
/// Deliberately explicit: the group fallback is a configured value, not an
/// inferred one, so untagged routes land somewhere stable.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Group assigned when neither annotation scope declares one
    pub default_group: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            default_group: DEFAULT_GROUP.to_string(),
        }
    }
}

/// The normalized documentation record produced for one route.
///
/// Owned entirely by the orchestrator during construction and handed to the
/// caller as an immutable value; no component retains references across
/// calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationRecord {
    /// First line of the endpoint's free-text annotation
    pub title: String,
    /// Remaining free-text lines, joined by newline
    pub description: String,
    /// Documentation group the route belongs to
    pub group: String,
    /// Whether the route requires authentication
    pub authenticated: bool,
    /// Upper-case HTTP method names, in route declaration order
    pub methods: Vec<String>,
    /// Body parameter declarations, keyed by name in declaration order
    pub parameters: IndexMap<String, ParameterDeclaration>,
    /// Whether an example response was captured
    pub showresponse: bool,
    /// JSON-encoded example response body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// Route processing orchestrator.
///
/// Composes the annotation parser, the per-field resolvers, and the
/// response materializer into the public `process_route` contract. The
/// collaborator boundaries (comment source, dependency container, handler
/// invoker) are injected so the core stays decoupled from any concrete
/// reflection or runtime facility.
///
/// # Example
///
/// ```no_run
/// use apidoc_from_routes::introspect::SourceIndex;
/// use apidoc_from_routes::processor::RouteProcessor;
/// use apidoc_from_routes::route::{HandlerRef, HttpMethod, Route};
/// use std::path::Path;
///
/// let index = SourceIndex::from_dir(Path::new("./my-project")).unwrap();
/// let processor = RouteProcessor::new(Box::new(index));
///
/// let route = Route::new(
///     vec![HttpMethod::Get],
///     "/api/users",
///     HandlerRef::method("UserController", "index"),
/// );
/// let record = processor.process_route(&route).unwrap();
/// println!("{} -> {}", route.path, record.title);
/// ```
pub struct RouteProcessor {
    introspector: Box<dyn SourceIntrospector>,
    resolver: Box<dyn DependencyResolver>,
    invoker: Box<dyn HandlerInvoker>,
    transformers: TransformerRegistry,
    models: ModelRegistry,
    config: ProcessorConfig,
}

impl RouteProcessor {
    /// Create a processor over a comment source, with no handlers,
    /// transformers, or dependency container wired in
    pub fn new(introspector: Box<dyn SourceIntrospector>) -> Self {
        debug!("Initializing RouteProcessor");
        Self {
            introspector,
            resolver: Box::new(NullResolver),
            invoker: Box::new(HandlerRegistry::new()),
            transformers: TransformerRegistry::new(),
            models: ModelRegistry::new(),
            config: ProcessorConfig::default(),
        }
    }

    /// Create a processor with an empty static comment source
    pub fn empty() -> Self {
        Self::new(Box::new(StaticIntrospector::new()))
    }

    /// Set the dependency-resolution collaborator
    pub fn with_resolver(mut self, resolver: Box<dyn DependencyResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Set the handler invoker (usually a populated [`HandlerRegistry`])
    pub fn with_invoker(mut self, invoker: Box<dyn HandlerInvoker>) -> Self {
        self.invoker = invoker;
        self
    }

    /// Set the transformer registry
    pub fn with_transformers(mut self, transformers: TransformerRegistry) -> Self {
        self.transformers = transformers;
        self
    }

    /// Set the model sample registry
    pub fn with_models(mut self, models: ModelRegistry) -> Self {
        self.models = models;
        self
    }

    /// Override the configuration
    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.config = config;
        self
    }

    /// Produces the documentation record for one route.
    ///
    /// Deterministic given identical handler code and annotations, apart
    /// from whatever side effects the handler-invocation fallback performs
    /// inside user code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RouteProcessing`] carrying the route identity and
    /// the underlying cause. Recoverable conditions (malformed parameters,
    /// failed handler invocations, unresolvable dependencies) never reach
    /// this level; they degrade the record instead.
    pub fn process_route(&self, route: &Route) -> Result<DocumentationRecord> {
        debug!("Processing route {}", route.identity());

        self.assemble(route).map_err(|e| Error::RouteProcessing {
            route: route.identity(),
            source: Box::new(e),
        })
    }

    /// Processes a batch of routes, one `Result` per route.
    ///
    /// A failing route is logged and reported in its slot; it never aborts
    /// the rest of the batch.
    pub fn process_routes(&self, routes: &[Route]) -> Vec<Result<DocumentationRecord>> {
        let results: Vec<Result<DocumentationRecord>> = routes
            .iter()
            .map(|route| match self.process_route(route) {
                Ok(record) => Ok(record),
                Err(e) => {
                    warn!("{}", e);
                    Err(e)
                }
            })
            .collect();

        let failure_count = results.iter().filter(|r| r.is_err()).count();
        debug!(
            "Batch complete: {} succeeded, {} failed",
            results.len() - failure_count,
            failure_count
        );

        results
    }

    fn assemble(&self, route: &Route) -> Result<DocumentationRecord> {
        let scopes = self.annotation_scopes(route);

        let endpoint = resolve_description(&scopes);
        let group = resolve_group(&scopes, &self.config.default_group);
        let authenticated = resolve_authentication(&scopes);
        let parameters = parse_parameters(&scopes.method_scope);

        let materializer = ResponseMaterializer::new(
            self.invoker.as_ref(),
            self.resolver.as_ref(),
            &self.transformers,
            &self.models,
        );
        let captured = materializer.materialize(route, &scopes)?;

        Ok(DocumentationRecord {
            title: endpoint.title,
            description: endpoint.description,
            group,
            authenticated,
            methods: route.method_names(),
            parameters,
            showresponse: captured.show,
            response: captured.body,
        })
    }

    /// Annotation blocks for the route's class and method declaration
    /// sites; recomputed per call, never cached
    fn annotation_scopes(&self, route: &Route) -> AnnotationScopes {
        let class_comment = route
            .handler
            .class_site()
            .and_then(|site| self.introspector.comment_of(&site))
            .unwrap_or_default();
        let method_comment = self
            .introspector
            .comment_of(&route.handler.method_site())
            .unwrap_or_default();

        AnnotationScopes::parse(&class_comment, &method_comment)
    }
}
