use std::time::Instant;

use tracing::{debug, error, info};

use super::controller::ControllerRegistry;
use super::handler::{Argument, BoundArgs, ControllerAction, Handler, ParamKind, Signature};
use crate::error::{HandlerResult, RouterError};
use crate::request::Request;
use crate::response::Response;
use crate::route::ParamVec;

/// Turns a matched route's [`Handler`] into an invocation.
///
/// Owns the controller registry. Failures raised by the handler itself are
/// returned untouched.
#[derive(Debug, Clone, Default)]
pub struct HandlerResolver {
    controllers: ControllerRegistry,
}

impl HandlerResolver {
    #[must_use]
    pub fn new(controllers: ControllerRegistry) -> Self {
        Self { controllers }
    }

    #[must_use]
    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut ControllerRegistry {
        &mut self.controllers
    }

    /// Invoke `handler` with `params` bound into its declared parameters.
    ///
    /// # Errors
    ///
    /// - [`RouterError::HandlerNotFound`] if a controller or action is unknown
    /// - [`RouterError::UnresolvedParameter`] if a declared parameter cannot be bound
    /// - whatever the handler itself returns
    pub fn resolve(
        &self,
        handler: &Handler,
        params: &ParamVec,
        request: &Request,
        response: Response,
    ) -> HandlerResult {
        let start = Instant::now();
        let result = match handler {
            Handler::Callable(callable) => {
                let args = match &callable.signature {
                    Some(signature) => bind(handler, signature, params, request, response)?,
                    None => bind_positional(params, request, response),
                };
                callable.call(args)
            }
            Handler::Action(action) => self.invoke_action(handler, action, params, request, response),
        };

        info!(
            request_id = %request.request_id,
            handler = %handler.describe(),
            ok = result.is_ok(),
            execution_time_us = start.elapsed().as_micros() as u64,
            "Handler execution complete"
        );
        result
    }

    /// Check that an action handler points at a registered controller action.
    ///
    /// Callable handlers always pass.
    ///
    /// # Errors
    ///
    /// [`RouterError::HandlerNotFound`] when the controller or action is missing.
    pub fn verify(&self, handler: &Handler) -> Result<(), RouterError> {
        match handler {
            Handler::Callable(_) => Ok(()),
            Handler::Action(action) => self
                .controllers
                .instantiate(&action.controller)
                .and_then(|controller| controller.signature(&action.action))
                .map(|_| ())
                .ok_or_else(|| not_found(action)),
        }
    }

    fn invoke_action(
        &self,
        handler: &Handler,
        action: &ControllerAction,
        params: &ParamVec,
        request: &Request,
        response: Response,
    ) -> HandlerResult {
        let Some(mut controller) = self.controllers.instantiate(&action.controller) else {
            error!(
                request_id = %request.request_id,
                controller = %action.controller,
                "Controller not registered - CRITICAL"
            );
            return Err(not_found(action));
        };
        let Some(signature) = controller.signature(&action.action) else {
            error!(
                request_id = %request.request_id,
                handler = %action,
                "Handler not found - CRITICAL"
            );
            return Err(not_found(action));
        };

        let args = bind(handler, &signature, params, request, response)?;
        debug!(
            request_id = %request.request_id,
            handler = %action,
            arguments = ?args.arguments(),
            "Invoking controller action"
        );
        controller.invoke(&action.action, args)
    }
}

fn not_found(action: &ControllerAction) -> RouterError {
    RouterError::HandlerNotFound {
        controller: action.controller.clone(),
        action: action.action.clone(),
    }
}

/// Bind declared parameters: framework types first, then path params by
/// name, then declared defaults.
fn bind<'a>(
    handler: &Handler,
    signature: &Signature,
    params: &ParamVec,
    request: &'a Request,
    response: Response,
) -> Result<BoundArgs<'a>, RouterError> {
    let mut arguments = Vec::with_capacity(signature.params().len());
    for param in signature.params() {
        let argument = match param.kind {
            ParamKind::Request => Argument::Request,
            ParamKind::Response => Argument::Response,
            ParamKind::Value => {
                let bound = params
                    .iter()
                    .find(|(name, _)| name.as_ref() == param.name)
                    .map(|(_, value)| value.clone())
                    .or_else(|| param.default.clone());
                match bound {
                    Some(value) => Argument::Value {
                        name: param.name.clone(),
                        value,
                    },
                    None => {
                        error!(
                            request_id = %request.request_id,
                            handler = %handler.describe(),
                            param = %param.name,
                            "Unresolved handler parameter"
                        );
                        return Err(RouterError::UnresolvedParameter {
                            handler: handler.describe(),
                            param: param.name.clone(),
                        });
                    }
                }
            }
        };
        arguments.push(argument);
    }
    Ok(BoundArgs::new(request, response, arguments))
}

/// Request, response, then every path parameter in template order.
fn bind_positional<'a>(params: &ParamVec, request: &'a Request, response: Response) -> BoundArgs<'a> {
    let mut arguments = Vec::with_capacity(params.len() + 2);
    arguments.push(Argument::Request);
    arguments.push(Argument::Response);
    arguments.extend(params.iter().map(|(name, value)| Argument::Value {
        name: name.to_string(),
        value: value.clone(),
    }));
    BoundArgs::new(request, response, arguments)
}
