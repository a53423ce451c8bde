use crate::error::{Error, Result};
use crate::route::HandlerRef;
use log::debug;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

/// Boundary to the external dependency-injection collaborator.
///
/// Given a dependency type identifier from a handler's declared dependency
/// list, produces a fresh instance or nothing when the type is not
/// resolvable. Unresolvable dependencies are not an error at this boundary;
/// the invocation layer substitutes an absent placeholder and continues.
pub trait DependencyResolver: Send + Sync {
    fn resolve(&self, type_id: &str) -> Option<Box<dyn Any>>;
}

/// Resolver that resolves nothing; the default when no container is wired in
#[derive(Debug, Default)]
pub struct NullResolver;

impl DependencyResolver for NullResolver {
    fn resolve(&self, _type_id: &str) -> Option<Box<dyn Any>> {
        None
    }
}

/// One argument passed to a handler invocation
pub enum ArgValue {
    /// A resolved collaborator instance
    Instance(Box<dyn Any>),
    /// Placeholder for a dependency the resolver could not supply
    Absent,
}

/// The resolved argument list for one handler call.
///
/// Arguments are positional, matching the handler's declared dependency
/// list. Handlers downcast instances to their concrete types.
#[derive(Default)]
pub struct CallArgs {
    values: Vec<ArgValue>,
}

impl CallArgs {
    /// Create an argument list from resolved values
    pub fn new(values: Vec<ArgValue>) -> Self {
        Self { values }
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the handler declared no dependencies
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Downcast the argument at `index` to a concrete type.
    ///
    /// Returns `None` when the index is out of range, the argument is
    /// absent, or the type does not match.
    pub fn instance_of<T: 'static>(&self, index: usize) -> Option<&T> {
        match self.values.get(index)? {
            ArgValue::Instance(instance) => instance.downcast_ref::<T>(),
            ArgValue::Absent => None,
        }
    }

    /// True when the argument at `index` is an absent placeholder
    pub fn is_absent(&self, index: usize) -> bool {
        matches!(self.values.get(index), Some(ArgValue::Absent))
    }
}

/// Boxed handler body: takes the resolved arguments, returns the value the
/// route would respond with
pub type HandlerFn = Box<dyn Fn(&CallArgs) -> anyhow::Result<Value> + Send + Sync>;

/// A registered handler: its declared dependency type identifiers plus the
/// callable body
pub struct HandlerEntry {
    dependencies: Vec<String>,
    func: HandlerFn,
}

/// Boundary through which handlers are invoked.
///
/// The pipeline never inspects handler internals; it asks for the declared
/// dependency list, resolves arguments, and calls through this interface.
pub trait HandlerInvoker: Send + Sync {
    /// Declared dependency type identifiers, if the handler is known
    fn dependencies(&self, handler: &HandlerRef) -> Option<Vec<String>>;

    /// Invoke the handler with resolved arguments and capture its return
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandler`] for an unregistered reference and
    /// [`Error::HandlerInvocation`] when the handler returns an error or
    /// panics.
    fn call(&self, handler: &HandlerRef, args: CallArgs) -> Result<Value>;
}

/// Registry of invokable handlers, keyed by handler reference.
///
/// In the original runtime the framework dispatches to arbitrary reflected
/// code; here every handler is a registered closure with a known signature,
/// which keeps the invocation boundary narrow.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, HandlerEntry>,
}

impl HandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler body under a handler reference.
    ///
    /// `dependencies` lists the type identifiers the handler wants resolved
    /// before invocation, in argument order.
    pub fn register<F>(&mut self, handler: HandlerRef, dependencies: Vec<String>, func: F)
    where
        F: Fn(&CallArgs) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.handlers.insert(
            handler.key(),
            HandlerEntry {
                dependencies,
                func: Box::new(func),
            },
        );
    }

    /// Register a handler with no declared dependencies
    pub fn register_simple<F>(&mut self, handler: HandlerRef, func: F)
    where
        F: Fn(&CallArgs) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.register(handler, Vec::new(), func);
    }

    fn entry(&self, handler: &HandlerRef) -> Option<&HandlerEntry> {
        self.handlers.get(&handler.key())
    }
}

impl HandlerInvoker for HandlerRegistry {
    fn dependencies(&self, handler: &HandlerRef) -> Option<Vec<String>> {
        self.entry(handler).map(|entry| entry.dependencies.clone())
    }

    fn call(&self, handler: &HandlerRef, args: CallArgs) -> Result<Value> {
        let entry = self
            .entry(handler)
            .ok_or_else(|| Error::UnknownHandler(handler.key()))?;

        debug!("Invoking handler {} with {} args", handler.key(), args.len());

        // Handlers are arbitrary user code; a panic must not take the
        // documentation run down with it
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (entry.func)(&args)));

        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(Error::HandlerInvocation {
                handler: handler.key(),
                message: e.to_string(),
            }),
            Err(payload) => Err(Error::HandlerInvocation {
                handler: handler.key(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

/// Best-effort text of a panic payload
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// Resolves a handler's declared dependencies into positional call
/// arguments.
///
/// Each unresolvable dependency becomes an absent placeholder so the
/// invocation can still proceed; the substitution is logged.
pub fn resolve_arguments(
    dependencies: &[String],
    resolver: &dyn DependencyResolver,
) -> CallArgs {
    let values = dependencies
        .iter()
        .map(|type_id| match resolver.resolve(type_id) {
            Some(instance) => ArgValue::Instance(instance),
            None => {
                debug!(
                    "Substituting absent placeholder: {}",
                    Error::UnresolvedDependency(type_id.clone())
                );
                ArgValue::Absent
            }
        })
        .collect();

    CallArgs::new(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Clock {
        now: u64,
    }

    struct FixedResolver;

    impl DependencyResolver for FixedResolver {
        fn resolve(&self, type_id: &str) -> Option<Box<dyn Any>> {
            match type_id {
                "Clock" => Some(Box::new(Clock { now: 42 })),
                _ => None,
            }
        }
    }

    fn registry_with(handler: HandlerRef, deps: Vec<String>, func: HandlerFn) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        registry.register(handler, deps, func);
        registry
    }

    #[test]
    fn test_call_captures_return_value() {
        let handler = HandlerRef::closure("fruit");
        let registry = registry_with(
            handler.clone(),
            Vec::new(),
            Box::new(|_| Ok(json!({"name": "banana"}))),
        );

        let value = registry.call(&handler, CallArgs::default()).unwrap();
        assert_eq!(value, json!({"name": "banana"}));
    }

    #[test]
    fn test_unknown_handler() {
        let registry = HandlerRegistry::new();
        let err = registry
            .call(&HandlerRef::closure("nope"), CallArgs::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownHandler(_)));
    }

    #[test]
    fn test_handler_error_is_invocation_failure() {
        let handler = HandlerRef::closure("failing");
        let registry = registry_with(
            handler.clone(),
            Vec::new(),
            Box::new(|_| Err(anyhow::anyhow!("database offline"))),
        );

        let err = registry.call(&handler, CallArgs::default()).unwrap_err();
        match err {
            Error::HandlerInvocation { message, .. } => {
                assert!(message.contains("database offline"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_handler_panic_is_caught() {
        let handler = HandlerRef::closure("panicking");
        let registry = registry_with(
            handler.clone(),
            Vec::new(),
            Box::new(|_| panic!("boom")),
        );

        let err = registry.call(&handler, CallArgs::default()).unwrap_err();
        match err {
            Error::HandlerInvocation { message, .. } => assert_eq!(message, "boom"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_arguments_mixes_instances_and_placeholders() {
        let deps = vec!["Clock".to_string(), "Mailer".to_string()];
        let args = resolve_arguments(&deps, &FixedResolver);

        assert_eq!(args.len(), 2);
        assert_eq!(args.instance_of::<Clock>(0).unwrap().now, 42);
        assert!(args.is_absent(1));
        assert!(args.instance_of::<Clock>(1).is_none());
    }

    #[test]
    fn test_handler_uses_resolved_dependency() {
        let handler = HandlerRef::method("StatusController", "uptime");
        let registry = registry_with(
            handler.clone(),
            vec!["Clock".to_string()],
            Box::new(|args| {
                let clock = args
                    .instance_of::<Clock>(0)
                    .ok_or_else(|| anyhow::anyhow!("clock missing"))?;
                Ok(json!({"uptime": clock.now}))
            }),
        );

        let deps = registry.dependencies(&handler).unwrap();
        let args = resolve_arguments(&deps, &FixedResolver);
        let value = registry.call(&handler, args).unwrap();

        assert_eq!(value, json!({"uptime": 42}));
    }
}
