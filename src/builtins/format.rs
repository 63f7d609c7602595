//==================================================
// File: builtins/format.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: format builtin
// Objective: printf-style templating over Number and String arguments
//==================================================

use crate::binding::ArgumentBinding;
use crate::value::{Value, describe_number};

pub const FORMAT_DOC: &str = "\
Get a formatted string with an argument.

Example:
formattedNumber = format(\"%.f\", 1.0) // \"1\"

- Parameter input: a string template.
- Parameter arg: the argument to insert in the template.
- Returns: a formatted string.";

/// Substitution value. Bools, arrays and structs never become one.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArg {
    Number(f64),
    Text(String),
}

pub fn format(args: &ArgumentBinding) -> Value {
    let mut args = args.clone();
    let Some(Value::String(template)) = args.remove("input") else {
        return Value::String(String::new());
    };
    let substitutions: Vec<FormatArg> = args
        .values()
        .filter_map(|value| match value {
            Value::Number(n) => Some(FormatArg::Number(*n)),
            Value::String(s) => Some(FormatArg::Text(s.clone())),
            Value::Bool(_) | Value::Array(_) | Value::Struct(_) => None,
        })
        .collect();
    Value::String(render(&template, &substitutions))
}

//==================================================
// Section 1.0 - Template engine
//==================================================

#[derive(Debug, Default)]
struct Spec {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alternate: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Renders `template`, consuming `args` in order unless a specifier names a
/// position with `%n$`. Missing arguments render as nothing.
pub fn render(template: &str, args: &[FormatArg]) -> String {
    let chars: Vec<char> = template.chars().collect();
    let mut out = String::with_capacity(template.len());
    let mut next_arg = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        if chars[i] != '%' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let start = i;
        i += 1;
        let mut spec = Spec::default();

        let mut position = None;
        let digits = count_digits(&chars, i);
        if digits > 0 && chars.get(i + digits) == Some(&'$') {
            position = parse_number(&chars[i..i + digits]).map(|n| n.saturating_sub(1));
            i += digits + 1;
        }

        while let Some(flag) = chars.get(i) {
            match flag {
                '-' => spec.left = true,
                '+' => spec.plus = true,
                ' ' => spec.space = true,
                '0' => spec.zero = true,
                '#' => spec.alternate = true,
                '\'' => {}
                _ => break,
            }
            i += 1;
        }

        if chars.get(i) == Some(&'*') {
            if let Some(width) = take(args, &mut next_arg).map(as_integer) {
                spec.left |= width < 0;
                spec.width = Some(clamp_field(width.unsigned_abs()));
            }
            i += 1;
        } else {
            let digits = count_digits(&chars, i);
            spec.width = parse_number(&chars[i..i + digits]);
            i += digits;
        }

        if chars.get(i) == Some(&'.') {
            i += 1;
            if chars.get(i) == Some(&'*') {
                // A negative precision counts as none at all.
                spec.precision = take(args, &mut next_arg)
                    .map(as_integer)
                    .and_then(|precision| u64::try_from(precision).ok())
                    .map(clamp_field);
                i += 1;
            } else {
                let digits = count_digits(&chars, i);
                spec.precision = Some(parse_number(&chars[i..i + digits]).unwrap_or(0));
                i += digits;
            }
        }

        while matches!(chars.get(i), Some('h' | 'l' | 'q' | 'L' | 'z' | 'j' | 't')) {
            i += 1;
        }

        let Some(&conversion) = chars.get(i) else {
            out.extend(&chars[start..]);
            break;
        };
        i += 1;

        if conversion == '%' {
            out.push('%');
            continue;
        }
        if !is_conversion(conversion) {
            out.extend(&chars[start..i]);
            continue;
        }

        let arg = match position {
            Some(index) => args.get(index),
            None => take(args, &mut next_arg),
        };
        out.push_str(&convert(conversion, &spec, arg));
    }
    out
}

fn is_conversion(c: char) -> bool {
    matches!(
        c,
        '@' | 's' | 'd' | 'i' | 'u' | 'f' | 'F' | 'e' | 'E' | 'g' | 'G' | 'x' | 'X' | 'o' | 'c'
    )
}

fn count_digits(chars: &[char], from: usize) -> usize {
    chars
        .get(from..)
        .map(|rest| rest.iter().take_while(|c| c.is_ascii_digit()).count())
        .unwrap_or(0)
}

/// Largest width or precision honoured; Rust formatting rejects anything above.
pub const MAX_FIELD: usize = u16::MAX as usize;

fn clamp_field(n: u64) -> usize {
    usize::try_from(n).map_or(MAX_FIELD, |n| n.min(MAX_FIELD))
}

/// Digit runs too long for `u64` saturate to [`MAX_FIELD`] like any other
/// oversized field.
fn parse_number(digits: &[char]) -> Option<usize> {
    if digits.is_empty() {
        return None;
    }
    let text: String = digits.iter().collect();
    Some(text.parse::<u64>().map_or(MAX_FIELD, clamp_field))
}

fn take<'a>(args: &'a [FormatArg], next: &mut usize) -> Option<&'a FormatArg> {
    let arg = args.get(*next);
    *next += 1;
    arg
}

fn as_float(arg: &FormatArg) -> f64 {
    match arg {
        FormatArg::Number(n) => *n,
        FormatArg::Text(s) => s.trim().parse().unwrap_or(0.0),
    }
}

fn as_integer(arg: &FormatArg) -> i64 {
    let n = as_float(arg);
    if n.is_nan() { 0 } else { n.trunc() as i64 }
}

fn as_text(arg: &FormatArg) -> String {
    match arg {
        FormatArg::Number(n) => describe_number(*n),
        FormatArg::Text(s) => s.clone(),
    }
}

fn convert(conversion: char, spec: &Spec, arg: Option<&FormatArg>) -> String {
    let Some(arg) = arg else {
        return pad(String::new(), "", spec, false);
    };
    match conversion {
        '@' | 's' => {
            let mut text = as_text(arg);
            if let Some(limit) = spec.precision {
                text = text.chars().take(limit).collect();
            }
            pad(text, "", spec, false)
        }
        'c' => {
            let c = match arg {
                FormatArg::Number(n) => char::from_u32(*n as u32).unwrap_or('\u{FFFD}'),
                FormatArg::Text(s) => s.chars().next().unwrap_or('\u{FFFD}'),
            };
            pad(c.to_string(), "", spec, false)
        }
        'd' | 'i' => {
            let n = as_integer(arg);
            let digits = min_digits(n.unsigned_abs().to_string(), spec.precision);
            pad(digits, sign(n < 0, spec), spec, spec.precision.is_none())
        }
        'u' | 'x' | 'X' | 'o' => {
            let n = as_integer(arg) as u64;
            let (body, prefix) = match conversion {
                'x' => (format!("{n:x}"), "0x"),
                'X' => (format!("{n:X}"), "0X"),
                'o' => (format!("{n:o}"), "0"),
                _ => (n.to_string(), ""),
            };
            let body = min_digits(body, spec.precision);
            let prefix = if spec.alternate && n != 0 { prefix } else { "" };
            pad(body, prefix, spec, spec.precision.is_none())
        }
        _ => {
            let n = as_float(arg);
            let upper = conversion.is_ascii_uppercase();
            if !n.is_finite() {
                let word = if n.is_nan() { "nan" } else { "inf" };
                let word = if upper { word.to_uppercase() } else { word.to_string() };
                return pad(word, sign(n.is_sign_negative() && !n.is_nan(), spec), spec, false);
            }
            let precision = spec.precision.unwrap_or(6);
            let body = match conversion.to_ascii_lowercase() {
                'f' => format!("{:.*}", precision, n.abs()),
                'e' => exponent_form(n.abs(), precision),
                _ => general_form(n.abs(), precision, spec.alternate),
            };
            let body = if upper { body.to_uppercase() } else { body };
            pad(body, sign(n.is_sign_negative() && n != 0.0, spec), spec, true)
        }
    }
}

fn sign(negative: bool, spec: &Spec) -> &'static str {
    if negative {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    }
}

fn min_digits(digits: String, precision: Option<usize>) -> String {
    match precision {
        Some(0) if digits == "0" => String::new(),
        Some(width) if digits.len() < width => format!("{}{digits}", "0".repeat(width - digits.len())),
        _ => digits,
    }
}

/// C-style `d.ddde±XX`.
fn exponent_form(n: f64, precision: usize) -> String {
    let rust = format!("{:.*e}", precision, n);
    let (mantissa, exponent) = rust.split_once('e').unwrap_or((rust.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

/// C-style `%g`: shortest of fixed or exponent form, trailing zeros trimmed.
fn general_form(n: f64, precision: usize, keep_zeros: bool) -> String {
    let precision = precision.max(1);
    let exponent = if n == 0.0 {
        0
    } else {
        let probe = format!("{:.*e}", precision - 1, n);
        probe
            .split_once('e')
            .and_then(|(_, exp)| exp.parse::<i32>().ok())
            .unwrap_or(0)
    };
    let body = if exponent < -4 || exponent >= precision as i32 {
        exponent_form(n, precision - 1)
    } else {
        let decimals = ((precision as i32 - 1 - exponent).max(0) as usize).min(MAX_FIELD);
        format!("{:.*}", decimals, n)
    };
    if keep_zeros {
        return body;
    }
    trim_fraction(&body)
}

fn trim_fraction(body: &str) -> String {
    let (mantissa, exponent) = match body.find('e') {
        Some(at) => body.split_at(at),
        None => (body, ""),
    };
    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    format!("{mantissa}{exponent}")
}

/// Applies width. `zero_ok` allows `0` padding between sign and digits.
fn pad(body: String, prefix: &str, spec: &Spec, zero_ok: bool) -> String {
    let len = prefix.chars().count() + body.chars().count();
    let width = spec.width.unwrap_or(0);
    if len >= width {
        return format!("{prefix}{body}");
    }
    let fill = width - len;
    if spec.left {
        format!("{prefix}{body}{}", " ".repeat(fill))
    } else if spec.zero && zero_ok {
        format!("{prefix}{}{body}", "0".repeat(fill))
    } else {
        format!("{}{prefix}{body}", " ".repeat(fill))
    }
}
