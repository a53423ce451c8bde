use crate::annotation::AnnotationScopes;
use crate::error::Result;
use crate::invoke::{resolve_arguments, DependencyResolver, HandlerInvoker};
use crate::route::Route;
use crate::transform::{wrap_collection, wrap_item, ModelRegistry, TransformerRegistry};
use log::{debug, warn};
use serde_json::Value;

const RESPONSE_TAG: &str = "response";
const TRANSFORMER_TAG: &str = "transformer";
const TRANSFORMER_COLLECTION_TAG: &str = "transformercollection";
const TRANSFORMER_MODEL_TAG: &str = "transformermodel";

/// Outcome of response materialization for one route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedResponse {
    /// Whether the record should advertise an example response
    pub show: bool,
    /// JSON-encoded response body, when one was captured
    pub body: Option<String>,
}

impl CapturedResponse {
    fn captured(body: String) -> Self {
        Self {
            show: true,
            body: Some(body),
        }
    }

    fn suppressed() -> Self {
        Self::default()
    }
}

/// Produces an example response body for a route.
///
/// Three strategies are tried in strict priority order, first match wins:
///
/// 1. a literal `@response` tag body;
/// 2. a `@transformer`/`@transformercollection` adapter binding, which
///    never invokes the route handler;
/// 3. invoking the route handler itself with resolved dependencies.
///
/// Response-producing tags are read from the method-level scope, matching
/// the original generator.
pub struct ResponseMaterializer<'a> {
    invoker: &'a dyn HandlerInvoker,
    resolver: &'a dyn DependencyResolver,
    transformers: &'a TransformerRegistry,
    models: &'a ModelRegistry,
}

impl<'a> ResponseMaterializer<'a> {
    pub fn new(
        invoker: &'a dyn HandlerInvoker,
        resolver: &'a dyn DependencyResolver,
        transformers: &'a TransformerRegistry,
        models: &'a ModelRegistry,
    ) -> Self {
        Self {
            invoker,
            resolver,
            transformers,
            models,
        }
    }

    /// Materialize the example response for a route.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal conditions: an unregistered
    /// transformer or model name, or a serialization failure. Handler
    /// invocation problems are recoverable and yield a suppressed response
    /// instead.
    pub fn materialize(
        &self,
        route: &Route,
        scopes: &AnnotationScopes,
    ) -> Result<CapturedResponse> {
        let method_scope = &scopes.method_scope;

        if let Some(body) = method_scope.get(RESPONSE_TAG) {
            debug!("Route {} uses a literal response tag", route.identity());
            return Ok(Self::from_literal(body));
        }

        if let Some(name) = method_scope.get(TRANSFORMER_TAG) {
            return self.from_transformer(scopes, name, false);
        }
        if let Some(name) = method_scope.get(TRANSFORMER_COLLECTION_TAG) {
            return self.from_transformer(scopes, name, true);
        }

        Ok(self.from_handler(route))
    }

    /// Literal tag strategy: decode the body if it parses as JSON,
    /// otherwise pass the raw body through as an already-serialized string
    fn from_literal(body: &str) -> CapturedResponse {
        let encoded = match serde_json::from_str::<Value>(body) {
            Ok(value) => value.to_string(),
            Err(_) => body.to_string(),
        };
        CapturedResponse::captured(encoded)
    }

    /// Transformer strategy: build the representative model, run it through
    /// the named adapter, wrap it as an item or two-element collection
    fn from_transformer(
        &self,
        scopes: &AnnotationScopes,
        name: &str,
        collection: bool,
    ) -> Result<CapturedResponse> {
        let (transformer, default_model) = self
            .transformers
            .get(name)
            .ok_or_else(|| crate::error::Error::UnknownTransformer(name.to_string()))?;

        let model_name = scopes
            .method_scope
            .get(TRANSFORMER_MODEL_TAG)
            .filter(|n| !n.is_empty())
            .or(default_model);

        // Bare stand-in when no model is named anywhere
        let model = match model_name {
            Some(model_name) => self.models.sample(model_name)?,
            None => Value::Null,
        };

        debug!(
            "Transforming {} through {} ({})",
            model_name.unwrap_or("<stand-in>"),
            name,
            if collection { "collection" } else { "item" }
        );

        let transformed = transformer.transform(&model);
        let envelope = if collection {
            wrap_collection(transformed)
        } else {
            wrap_item(transformed)
        };

        Ok(CapturedResponse::captured(serde_json::to_string(&envelope)?))
    }

    /// Handler invocation fallback: resolve dependencies, call the handler,
    /// serialize its return value. Any invocation failure suppresses the
    /// response instead of failing the route.
    fn from_handler(&self, route: &Route) -> CapturedResponse {
        let Some(dependencies) = self.invoker.dependencies(&route.handler) else {
            warn!(
                "No invokable handler for route {}; response capture suppressed",
                route.identity()
            );
            return CapturedResponse::suppressed();
        };

        let args = resolve_arguments(&dependencies, self.resolver);

        match self.invoker.call(&route.handler, args) {
            Ok(value) => CapturedResponse::captured(value.to_string()),
            Err(e) => {
                warn!(
                    "Response capture failed for route {}: {}",
                    route.identity(),
                    e
                );
                CapturedResponse::suppressed()
            }
        }
    }
}
