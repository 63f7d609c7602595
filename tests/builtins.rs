//==============================================
// File: tests/builtins.rs
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Exercise the builtin set through the host registry
// Objective: Check script-visible results and fallbacks end to end
//==============================================

mod util;

use std::collections::HashMap;

use cub_stdlib::Value;
use util::{call, number, utc_registry};

#[test]
fn predicates_match_only_their_variant() {
    let registry = utc_registry();
    let samples = [
        ("isNumber", Value::Number(1.0)),
        ("isString", Value::from("s")),
        ("isBool", Value::Bool(true)),
        ("isArray", Value::Array(vec![])),
        ("isStruct", Value::Struct(HashMap::new())),
    ];
    for (predicate, _) in &samples {
        for (owner, sample) in &samples {
            assert_eq!(
                call(&registry, predicate, vec![sample.clone()]),
                Value::Bool(predicate == owner),
                "{predicate}({sample:?})"
            );
        }
        assert_eq!(call(&registry, predicate, vec![]), Value::Bool(false));
    }
}

#[test]
fn current_date_never_goes_backwards() {
    let registry = utc_registry();
    let first = number(call(&registry, "currentDate", vec![]));
    let second = number(call(&registry, "currentDate", vec![]));
    assert!(second >= first, "{second} < {first}");
}

#[test]
fn parse_then_format_round_trips() {
    let registry = utc_registry();
    let cases = [
        ("2020-01-02", "yyyy-MM-dd"),
        ("02/01/2020 13:45", "dd/MM/yyyy HH:mm"),
        ("Thursday, January 2, 2020", "EEEE, MMMM d, yyyy"),
    ];
    for (text, pattern) in cases {
        let date = call(&registry, "dateFromFormat", vec![text.into(), pattern.into()]);
        assert_ne!(date, Value::Number(0.0), "{text} did not parse with {pattern}");
        let formatted = call(&registry, "formattedDate", vec![date, pattern.into()]);
        assert_eq!(formatted, Value::from(text), "pattern {pattern}");
    }
}

#[test]
fn adding_days_and_zero() {
    let registry = utc_registry();
    let t = number(call(
        &registry,
        "dateFromFormat",
        vec!["2020-02-28".into(), "yyyy-MM-dd".into()],
    ));
    let next = call(&registry, "dateByAdding", vec![1.0.into(), "day".into(), t.into()]);
    let shown = call(&registry, "formattedDate", vec![next, "yyyy-MM-dd".into()]);
    assert_eq!(shown, Value::from("2020-02-29"));

    for unit in ["second", "minute", "hour", "day", "month", "year"] {
        assert_eq!(
            call(&registry, "dateByAdding", vec![0.0.into(), unit.into(), t.into()]),
            Value::Number(t),
            "zero {unit}"
        );
    }
    assert_eq!(
        call(&registry, "dateByAdding", vec![5.0.into(), "bogus-unit".into(), t.into()]),
        Value::Number(0.0)
    );
}

#[test]
fn formatted_date_with_bad_input_returns_number_zero() {
    let registry = utc_registry();
    assert_eq!(
        call(&registry, "formattedDate", vec!["now".into(), "yyyy".into()]),
        Value::Number(0.0)
    );
}

#[test]
fn random_numbers_respect_bounds() {
    let registry = utc_registry();
    if !registry.contains("randomNumber") {
        return;
    }
    for _ in 0..200 {
        let roll = number(call(&registry, "randomNumber", vec![(-3.0).into(), 3.0.into()]));
        assert!((-3.0..=3.0).contains(&roll), "roll {roll}");
        assert_eq!(roll.fract(), 0.0);
    }
    let degenerate = number(call(&registry, "randomNumber", vec![10.0.into()]));
    assert!((0.0..1.0).contains(&degenerate));
}

#[test]
fn format_substitutes_scalars_in_call_order() {
    let registry = utc_registry();
    if !registry.contains("format") {
        return;
    }
    assert_eq!(
        call(&registry, "format", vec!["%@ items".into(), 3.0.into()]),
        Value::from("3 items")
    );
    assert_eq!(
        call(
            &registry,
            "format",
            vec![
                "%@: %.1f".into(),
                Value::Bool(true),
                "total".into(),
                Value::Array(vec![]),
                2.26.into(),
            ],
        ),
        Value::from("total: 2.3")
    );
    assert_eq!(call(&registry, "format", vec![]), Value::from(""));
}

#[test]
fn partial_date_patterns_round_trip() {
    let registry = utc_registry();
    for (text, pattern) in [("2020", "yyyy"), ("2020-03", "yyyy-MM"), ("5 PM", "h a")] {
        let date = call(&registry, "dateFromFormat", vec![text.into(), pattern.into()]);
        assert_ne!(date, Value::Number(0.0), "{text} did not parse with {pattern}");
        let formatted = call(&registry, "formattedDate", vec![date, pattern.into()]);
        assert_eq!(formatted, Value::from(text), "pattern {pattern}");
    }
    let lower = call(&registry, "dateFromFormat", vec!["5 pm".into(), "h a".into()]);
    let upper = call(&registry, "dateFromFormat", vec!["5 PM".into(), "h a".into()]);
    assert_eq!(lower, upper);
}

#[test]
fn one_based_hours_and_short_fractions_format() {
    let registry = utc_registry();
    assert_eq!(
        call(&registry, "formattedDate", vec![0.0.into(), "kk:mm".into()]),
        Value::from("24:00")
    );
    assert_eq!(
        call(
            &registry,
            "formattedDate",
            vec![0.5.into(), "yyyy-MM-dd'T'HH:mm:ss.SS".into()]
        ),
        Value::from("1970-01-01T00:00:00.50")
    );
}

#[test]
fn format_survives_oversized_fields() {
    let registry = utc_registry();
    if !registry.contains("format") {
        return;
    }
    let wide = call(&registry, "format", vec!["%*d".into(), 1e18.into(), 1.0.into()]);
    assert!(matches!(&wide, Value::String(s) if s.ends_with(" 1")), "{wide:?}");

    let precise = call(&registry, "format", vec!["%.100000f".into(), 1.0.into()]);
    assert!(matches!(&precise, Value::String(s) if s.starts_with("1.0")), "{precise:?}");
}

//==============================================
// End of file
//==============================================
