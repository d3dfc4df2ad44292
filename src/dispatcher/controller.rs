use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use super::handler::{BoundArgs, Signature};
use crate::error::HandlerResult;

/// A controller exposing named actions.
///
/// A fresh instance is built for every request that targets one of its
/// actions, so implementations may keep per-request state in `self`.
///
/// # Example
///
/// ```rust
/// use switchyard::dispatcher::{BoundArgs, Controller, Param, Signature};
/// use switchyard::{HandlerResult, Response, RouterError};
///
/// #[derive(Default)]
/// struct UserController;
///
/// impl Controller for UserController {
///     fn signature(&self, action: &str) -> Option<Signature> {
///         match action {
///             "show" => Some(Signature::new().param(Param::value("id"))),
///             _ => None,
///         }
///     }
///
///     fn invoke(&mut self, action: &str, args: BoundArgs<'_>) -> HandlerResult {
///         match action {
///             "show" => Ok(Response::json(200, serde_json::json!({ "id": args.value("id") }))),
///             other => Err(RouterError::HandlerNotFound {
///                 controller: "UserController".into(),
///                 action: other.into(),
///             }),
///         }
///     }
/// }
/// ```
pub trait Controller: Send {
    /// Declared parameters of `action`, or `None` if the action does not exist.
    fn signature(&self, action: &str) -> Option<Signature>;

    /// Run `action` with arguments bound from its signature.
    fn invoke(&mut self, action: &str, args: BoundArgs<'_>) -> HandlerResult;
}

type ControllerFactory = dyn Fn() -> Box<dyn Controller> + Send + Sync;

/// Maps controller identifiers to no-argument constructors.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, Arc<ControllerFactory>>,
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("ControllerRegistry")
            .field("controllers", &names)
            .finish()
    }
}

impl ControllerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `C` under `name`, constructed through `C::default()`.
    pub fn register<C>(&mut self, name: &str)
    where
        C: Controller + Default + 'static,
    {
        self.register_with(name, || Box::new(C::default()));
    }

    /// Register a custom factory under `name`.
    ///
    /// Replaces any controller already registered under the same name.
    pub fn register_with<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Controller> + Send + Sync + 'static,
    {
        if self.factories.insert(name.to_string(), Arc::new(factory)).is_some() {
            warn!(controller = %name, "Replaced existing controller registration");
        } else {
            info!(
                controller = %name,
                total_controllers = self.factories.len(),
                "Controller registered"
            );
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build a fresh controller instance.
    #[must_use]
    pub fn instantiate(&self, name: &str) -> Option<Box<dyn Controller>> {
        self.factories.get(name).map(|factory| factory())
    }
}
