//==================================================
// File: registry.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Registration contract between host functions and the interpreter
// Objective: Describe host functions and dispatch script calls to them
//==================================================

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::binding::ArgumentBinding;
use crate::completion::{self, CallError, Completion, PendingCall};
use crate::value::Value;

/// Host implementation signature. The implementation must hand exactly one
/// value to the completion, now or later.
pub type Implementation = Arc<dyn Fn(ArgumentBinding, Completion) + Send + Sync>;

//==================================================
// Section 1.0 - Descriptors
//==================================================

#[derive(Clone)]
pub struct FunctionDescriptor {
    pub name: String,
    pub documentation: String,
    /// Declared order defines the positional-to-named mapping at call sites.
    pub argument_names: Vec<String>,
    pub has_return_value: bool,
    /// Accepts positional arguments beyond the declared ones.
    pub variadic: bool,
    implementation: Implementation,
}

impl FunctionDescriptor {
    pub fn new<F>(
        name: &str,
        documentation: &str,
        argument_names: &[&str],
        has_return_value: bool,
        implementation: F,
    ) -> Self
    where
        F: Fn(ArgumentBinding, Completion) + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            documentation: documentation.to_string(),
            argument_names: argument_names.iter().map(|arg| arg.to_string()).collect(),
            has_return_value,
            variadic: false,
            implementation: Arc::new(implementation),
        }
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn invoke(&self, arguments: ArgumentBinding, completion: Completion) {
        (self.implementation)(arguments, completion);
    }

    /// Name bound to the `index`-th surplus positional argument (0-based).
    fn surplus_name(&self, index: usize) -> String {
        let stem = self
            .argument_names
            .last()
            .map(String::as_str)
            .unwrap_or("arg");
        format!("{stem}{}", index + 2)
    }

    fn accepts_name(&self, name: &str) -> bool {
        if self.argument_names.iter().any(|declared| declared == name) {
            return true;
        }
        if !self.variadic {
            return false;
        }
        let stem = self
            .argument_names
            .last()
            .map(String::as_str)
            .unwrap_or("arg");
        name.strip_prefix(stem)
            .map(|suffix| !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    }
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("name", &self.name)
            .field("argument_names", &self.argument_names)
            .field("has_return_value", &self.has_return_value)
            .field("variadic", &self.variadic)
            .finish_non_exhaustive()
    }
}

/// Anything that accepts host function registrations, typically the
/// interpreter's dispatcher.
pub trait FunctionRegistry {
    fn register(&mut self, descriptor: FunctionDescriptor);
}

//==================================================
// Section 2.0 - Reference dispatcher
//==================================================

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown host function '{name}'")]
    UnknownFunction { name: String },
    #[error("'{function}' takes {expected} argument(s) but {supplied} were supplied")]
    TooManyArguments {
        function: String,
        expected: usize,
        supplied: usize,
    },
    #[error("'{function}' has no argument named '{argument}'")]
    UnknownArgument { function: String, argument: String },
    #[error(transparent)]
    Call(#[from] CallError),
}

/// In-process registry that binds arguments and dispatches calls.
#[derive(Debug, Default)]
pub struct HostRegistry {
    functions: HashMap<String, FunctionDescriptor>,
}

impl FunctionRegistry for HostRegistry {
    fn register(&mut self, descriptor: FunctionDescriptor) {
        let name = descriptor.name.clone();
        if self.functions.insert(name.clone(), descriptor).is_some() {
            warn!(function = %name, "host function re-registered; previous implementation replaced");
        } else {
            debug!(function = %name, "host function registered");
        }
    }
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptor(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Calls `name` with positional arguments.
    pub fn call(&self, name: &str, arguments: Vec<Value>) -> Result<PendingCall, RegistryError> {
        let descriptor = self.lookup(name)?;
        let declared = descriptor.argument_names.len();
        if arguments.len() > declared && !descriptor.variadic {
            return Err(RegistryError::TooManyArguments {
                function: name.to_string(),
                expected: declared,
                supplied: arguments.len(),
            });
        }

        let mut binding = ArgumentBinding::new();
        for (index, value) in arguments.into_iter().enumerate() {
            match descriptor.argument_names.get(index) {
                Some(declared_name) => binding.insert(declared_name.clone(), value),
                None => binding.insert(descriptor.surplus_name(index - declared), value),
            }
        }
        Ok(dispatch(descriptor, binding))
    }

    /// Calls `name` with named arguments, kept in the order given.
    pub fn call_named(
        &self,
        name: &str,
        arguments: Vec<(String, Value)>,
    ) -> Result<PendingCall, RegistryError> {
        let descriptor = self.lookup(name)?;
        let mut binding = ArgumentBinding::new();
        for (argument, value) in arguments {
            if !descriptor.accepts_name(&argument) {
                return Err(RegistryError::UnknownArgument {
                    function: name.to_string(),
                    argument,
                });
            }
            binding.insert(argument, value);
        }
        Ok(dispatch(descriptor, binding))
    }

    /// Positional call that waits for the result on the current thread.
    pub fn call_blocking(&self, name: &str, arguments: Vec<Value>) -> Result<Value, RegistryError> {
        let mut pending = self.call(name, arguments)?;
        match pending.try_result() {
            Some(result) => Ok(result?),
            None => Ok(pending.wait()?),
        }
    }

    fn lookup(&self, name: &str) -> Result<&FunctionDescriptor, RegistryError> {
        self.functions
            .get(name)
            .ok_or_else(|| RegistryError::UnknownFunction {
                name: name.to_string(),
            })
    }
}

fn dispatch(descriptor: &FunctionDescriptor, binding: ArgumentBinding) -> PendingCall {
    let (completion, pending) = completion::channel(&descriptor.name);
    descriptor.invoke(binding, completion);
    pending
}
