//==================================================
// File: builtins/types.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Type predicate builtins
//==================================================

use crate::binding::ArgumentBinding;
use crate::value::Value;

pub type Predicate = fn(&Value) -> bool;

/// `(name, documentation, predicate)` for each type check.
pub const PREDICATES: &[(&str, &str, Predicate)] = &[
    (
        "isNumber",
        "Checks if the value is a number.\n- Parameter value: the value to check the type of.\n- Returns: true if the value is a number, false otherwise.",
        Value::is_number,
    ),
    (
        "isString",
        "Checks if the value is a string.\n- Parameter value: the value to check the type of.\n- Returns: true if the value is a string, false otherwise.",
        Value::is_string,
    ),
    (
        "isBool",
        "Checks if the value is a boolean.\n- Parameter value: the value to check the type of.\n- Returns: true if the value is a boolean, false otherwise.",
        Value::is_bool,
    ),
    (
        "isArray",
        "Checks if the value is an array.\n- Parameter value: the value to check the type of.\n- Returns: true if the value is an array, false otherwise.",
        Value::is_array,
    ),
    (
        "isStruct",
        "Checks if the value is a struct.\n- Parameter value: the value to check the type of.\n- Returns: true if the value is a struct, false otherwise.",
        Value::is_struct,
    ),
];

/// A missing `value` is `false`, never an error.
pub fn check(predicate: Predicate, args: &ArgumentBinding) -> Value {
    Value::Bool(args.get("value").is_some_and(predicate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample(name: &str) -> Value {
        match name {
            "isNumber" => Value::Number(4.0),
            "isString" => Value::from("four"),
            "isBool" => Value::Bool(false),
            "isArray" => Value::Array(vec![Value::Number(4.0)]),
            "isStruct" => Value::Struct(HashMap::from([("n".to_string(), Value::Number(4.0))])),
            other => panic!("no sample for {other}"),
        }
    }

    #[test]
    fn each_predicate_accepts_only_its_variant() {
        for (name, _, predicate) in PREDICATES {
            for (other, _, _) in PREDICATES {
                let binding: ArgumentBinding = [("value", sample(other))].into_iter().collect();
                assert_eq!(
                    check(*predicate, &binding),
                    Value::Bool(name == other),
                    "{name} applied to {other} sample"
                );
            }
        }
    }

    #[test]
    fn missing_value_is_false() {
        for (name, _, predicate) in PREDICATES {
            assert_eq!(
                check(*predicate, &ArgumentBinding::new()),
                Value::Bool(false),
                "{name}"
            );
        }
    }
}
