//! Typed action references.
//!
//! An [`ActionRef`] names a method on a [`Controller`] type and carries the
//! arguments written at the call site. Constant arguments are paired with the
//! method's declared parameter names to build the route values; anything that
//! is not a constant is recorded as a placeholder and rejected when a single
//! URL has to be produced from it.

use fluentsitemap_shared::{
    ActionDescriptor, ControllerDescriptor, Result, RouteValue, RouteValues, SitemapError,
};

/// A route-handler type known at compile time.
pub trait Controller {
    /// Type name and methods of this controller.
    fn descriptor() -> ControllerDescriptor;
}

/// One call-site argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionArg {
    /// A literal value.
    Constant(RouteValue),
    /// Any other expression, kept as source text for error messages.
    Placeholder(String),
}

/// `{controller, method, arguments}` descriptor for a typed action call.
#[derive(Debug, Clone)]
pub struct ActionRef {
    controller: ControllerDescriptor,
    method: String,
    args: Vec<ActionArg>,
}

impl ActionRef {
    /// Reference `method` on controller type `C`.
    pub fn of<C: Controller>(method: impl Into<String>) -> Self {
        Self::new(C::descriptor(), method)
    }

    pub fn new(controller: ControllerDescriptor, method: impl Into<String>) -> Self {
        Self {
            controller,
            method: method.into(),
            args: Vec::new(),
        }
    }

    /// Append a constant argument.
    pub fn arg(mut self, value: impl Into<RouteValue>) -> Self {
        self.args.push(ActionArg::Constant(value.into()));
        self
    }

    /// Append a non-constant argument such as a variable or matcher.
    pub fn placeholder(mut self, expression: impl Into<String>) -> Self {
        self.args.push(ActionArg::Placeholder(expression.into()));
        self
    }

    pub fn args(&self) -> &[ActionArg] {
        &self.args
    }

    /// Logical controller name (`Controller` suffix stripped).
    pub fn controller_name(&self) -> &str {
        self.controller.logical_name()
    }

    fn method(&self) -> Result<&ActionDescriptor> {
        self.controller.find_method(&self.method).ok_or_else(|| {
            SitemapError::unresolved(format!(
                "{} has no method {}",
                self.controller.name, self.method
            ))
        })
    }

    /// Logical action name, honouring a rename on the method.
    pub fn action_name(&self) -> Result<&str> {
        Ok(self.method()?.action_name())
    }

    /// Pair declared parameter names with the constant arguments.
    pub fn parameters(&self) -> Result<RouteValues> {
        let method = self.method()?;

        if method.parameters.len() != self.args.len() {
            return Err(SitemapError::unsupported(format!(
                "{}.{} declares {} parameter(s) but {} argument(s) were supplied",
                self.controller.name,
                self.method,
                method.parameters.len(),
                self.args.len()
            )));
        }

        let mut values = RouteValues::new();
        for (name, arg) in method.parameters.iter().zip(&self.args) {
            match arg {
                ActionArg::Constant(value) => values.insert(name.clone(), value.clone()),
                ActionArg::Placeholder(expr) => {
                    return Err(SitemapError::unsupported(format!(
                        "argument {name} of {}.{} is not a constant: {expr}",
                        self.controller.name, self.method
                    )));
                }
            }
        }

        Ok(values)
    }
}
