//==================================================
// File: builtins/mod.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Host-implemented builtins exposed to Cub scripts
// Objective: Register the builtin set against any function registry
//==================================================

use tracing::{debug, info};

use crate::binding::ArgumentBinding;
use crate::capabilities::{Capabilities, FormatCapability, RandomCapability};
use crate::registry::{FunctionDescriptor, FunctionRegistry};
use crate::value::Value;

pub mod date;
pub mod format;
pub mod pattern;
pub mod random;
pub mod types;

pub use date::Calendar;

//==================================================
// Section 1.0 - Options
//==================================================

#[derive(Debug, Clone, Default)]
pub struct BuiltinOptions {
    pub calendar: Calendar,
    pub capabilities: Capabilities,
}

impl BuiltinOptions {
    pub fn new(calendar: Calendar, capabilities: Capabilities) -> Self {
        Self {
            calendar,
            capabilities,
        }
    }
}

/// Every builtin name, in registration order.
pub const BUILTIN_NAMES: &[&str] = &[
    "isNumber",
    "isString",
    "isBool",
    "isArray",
    "isStruct",
    "dateByAdding",
    "currentDate",
    "dateFromFormat",
    "formattedDate",
    "randomNumber",
    "format",
];

//==================================================
// Section 2.0 - Registration
//==================================================

/// Wraps a synchronous body so it completes its call before returning.
fn describe<F>(name: &str, documentation: &str, argument_names: &[&str], body: F) -> FunctionDescriptor
where
    F: Fn(&ArgumentBinding) -> Value + Send + Sync + 'static,
{
    FunctionDescriptor::new(name, documentation, argument_names, true, move |arguments, completion| {
        completion.complete(body(&arguments))
    })
}

/// Registers the builtin set. Capability-gated builtins are left out entirely
/// when their capability is unavailable.
pub fn register_builtins<R>(registry: &mut R, options: &BuiltinOptions) -> usize
where
    R: FunctionRegistry + ?Sized,
{
    let mut registered = 0usize;
    let mut add = |descriptor: FunctionDescriptor| {
        debug!(builtin = %descriptor.name, "registering builtin");
        registry.register(descriptor);
        registered += 1;
    };

    for (name, documentation, predicate) in types::PREDICATES {
        let predicate = *predicate;
        add(describe(name, documentation, &["value"], move |args| {
            types::check(predicate, args)
        }));
    }

    let calendar = options.calendar;
    add(describe(
        "dateByAdding",
        date::DATE_BY_ADDING_DOC,
        &["value", "unit", "date"],
        move |args| date::date_by_adding(calendar, args),
    ));
    add(describe("currentDate", date::CURRENT_DATE_DOC, &[], |_| {
        date::current_date()
    }));
    add(describe(
        "dateFromFormat",
        date::DATE_FROM_FORMAT_DOC,
        &["dateString", "format"],
        move |args| date::date_from_format(calendar, args),
    ));
    add(describe(
        "formattedDate",
        date::FORMATTED_DATE_DOC,
        &["date", "format"],
        move |args| date::formatted_date(calendar, args),
    ));

    match &options.capabilities.random {
        RandomCapability::Available(source) => {
            let source = source.clone();
            add(describe(
                "randomNumber",
                random::RANDOM_NUMBER_DOC,
                &["min", "max"],
                move |args| random::random_number(&source, args),
            ));
        }
        RandomCapability::Unavailable => info!("uniform random source unavailable; randomNumber not registered"),
    }

    match options.capabilities.format {
        FormatCapability::Available => {
            add(describe("format", format::FORMAT_DOC, &["input", "arg"], format::format).variadic())
        }
        FormatCapability::Unavailable => info!("template formatting unavailable; format not registered"),
    }

    registered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HostRegistry;

    #[test]
    fn registers_every_builtin_with_native_capabilities() {
        let mut registry = HostRegistry::new();
        let count = register_builtins(&mut registry, &BuiltinOptions::default());
        if cfg!(all(feature = "random", feature = "format")) {
            assert_eq!(count, BUILTIN_NAMES.len());
        }
        assert_eq!(registry.len(), count);
        for name in &BUILTIN_NAMES[..9] {
            assert!(registry.contains(name), "{name} missing");
        }
    }

    #[test]
    fn gated_builtins_are_absent_without_capabilities() {
        let mut registry = HostRegistry::new();
        let options = BuiltinOptions::new(Calendar::Utc, Capabilities::none());
        assert_eq!(register_builtins(&mut registry, &options), 9);
        assert!(!registry.contains("randomNumber"));
        assert!(!registry.contains("format"));
    }

    #[test]
    fn descriptors_declare_argument_order_and_returns() {
        let mut registry = HostRegistry::new();
        register_builtins(&mut registry, &BuiltinOptions::default());
        let descriptor = registry.descriptor("dateByAdding").expect("dateByAdding");
        assert_eq!(descriptor.argument_names, vec!["value", "unit", "date"]);
        assert!(descriptor.has_return_value);
        assert!(descriptor.documentation.contains("dateByAdding(1, \"day\", myDate)"));
        let current = registry.descriptor("currentDate").expect("currentDate");
        assert!(current.argument_names.is_empty());
    }
}
