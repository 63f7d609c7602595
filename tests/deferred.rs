//==============================================
// File: tests/deferred.rs
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Host functions that complete after the call returns
//==============================================

use std::time::Duration;

use cub_stdlib::{
    CallError, FunctionDescriptor, FunctionRegistry, HostRegistry, RegistryError, Value,
};

fn deferred_registry() -> HostRegistry {
    let mut registry = HostRegistry::new();
    registry.register(FunctionDescriptor::new(
        "later",
        "Doubles `n` on another thread.",
        &["n"],
        true,
        |arguments, completion| {
            let n = arguments.get("n").and_then(Value::as_number).unwrap_or(0.0);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(20));
                completion.complete(Value::Number(n * 2.0));
            });
        },
    ));
    registry.register(FunctionDescriptor::new(
        "forgetful",
        "Never completes.",
        &[],
        false,
        |_arguments, _completion| {},
    ));
    registry
}

#[tokio::test]
async fn awaiting_a_deferred_result() {
    let registry = deferred_registry();
    let pending = registry.call("later", vec![Value::Number(21.0)]).expect("call");
    assert_eq!(pending.await.expect("result"), Value::Number(42.0));
}

#[test]
fn blocking_on_a_deferred_result() {
    let registry = deferred_registry();
    let result = registry.call_blocking("later", vec![Value::Number(1.5)]);
    assert_eq!(result.expect("result"), Value::Number(3.0));
}

#[test]
fn dropped_completion_is_reported() {
    let registry = deferred_registry();
    let err = registry.call_blocking("forgetful", vec![]).expect_err("abandoned");
    assert!(
        matches!(err, RegistryError::Call(CallError::Abandoned { ref function }) if function == "forgetful"),
        "{err:?}"
    );
}

#[test]
fn unknown_and_surplus_arguments_are_rejected() {
    let registry = deferred_registry();
    assert!(matches!(
        registry.call("missing", vec![]),
        Err(RegistryError::UnknownFunction { .. })
    ));
    assert!(matches!(
        registry.call("later", vec![Value::Number(1.0), Value::Number(2.0)]),
        Err(RegistryError::TooManyArguments { expected: 1, supplied: 2, .. })
    ));
}

//==============================================
// End of file
//==============================================
