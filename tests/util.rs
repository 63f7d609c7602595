//==============================================
// File: tests/util.rs
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Shared helpers for cub_stdlib integration tests
//==============================================

#![allow(dead_code)]

use cub_stdlib::{
    BuiltinOptions, Calendar, Capabilities, HostRegistry, Value, register_builtins,
};

/// Registry with every builtin, UTC calendar and a seeded random source.
pub fn utc_registry() -> HostRegistry {
    let mut registry = HostRegistry::new();
    let options = BuiltinOptions::new(Calendar::Utc, Capabilities::native().with_random_seed(11));
    register_builtins(&mut registry, &options);
    registry
}

/// Positional call that panics on registry errors.
pub fn call(registry: &HostRegistry, name: &str, args: Vec<Value>) -> Value {
    registry
        .call_blocking(name, args)
        .unwrap_or_else(|err| panic!("{name} failed: {err}"))
}

pub fn number(value: Value) -> f64 {
    match value {
        Value::Number(n) => n,
        other => panic!("expected number, got {other:?}"),
    }
}
