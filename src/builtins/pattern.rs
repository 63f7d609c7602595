//==================================================
// File: builtins/pattern.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Unicode date patterns for the date builtins
// Objective: Translate `yyyy-MM-dd`-style patterns into chrono format items,
//            handling the fields chrono has no specifier for
//==================================================

use std::fmt;

use chrono::format::{self, Item, Parsed, StrftimeItems};
use chrono::{DateTime, Timelike, TimeZone};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unsupported date pattern field '{}'", letter.to_string().repeat(*count))]
    Unsupported { letter: char, count: usize },
    #[error("unterminated quoted literal in date pattern")]
    UnterminatedQuote,
}

//==================================================
// Section 1.0 - Compilation
//==================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Run of fields and literals chrono formats and parses directly.
    Strftime(String),
    /// `k`/`kk`: hour of day counted 1 through 24.
    HourFromOne { padded: bool },
    /// `S…`: fraction of a second truncated to `digits` places.
    Fraction { digits: usize },
}

enum Field {
    Strftime(&'static str),
    Custom(Segment),
}

/// A compiled date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    segments: Vec<Segment>,
    has_offset: bool,
}

impl DatePattern {
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut segments = Vec::new();
        let mut current = String::with_capacity(pattern.len() * 2);
        let mut has_offset = false;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c == '\'' {
                i = quoted_literal(&chars, i, &mut current)?;
                continue;
            }
            if c.is_ascii_alphabetic() {
                let count = chars[i..].iter().take_while(|next| **next == c).count();
                match field(c, count).ok_or(PatternError::Unsupported { letter: c, count })? {
                    Field::Strftime(spec) => current.push_str(spec),
                    Field::Custom(segment) => {
                        flush(&mut segments, &mut current)?;
                        segments.push(segment);
                    }
                }
                has_offset |= matches!(c, 'Z' | 'X' | 'x');
                i += count;
                continue;
            }
            push_literal(&mut current, c);
            i += 1;
        }
        flush(&mut segments, &mut current)?;

        Ok(Self {
            segments,
            has_offset,
        })
    }

    /// The chrono format string, when the whole pattern maps onto one.
    pub fn strftime(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [] => Some(""),
            [Segment::Strftime(spec)] => Some(spec),
            _ => None,
        }
    }

    /// Whether parsed text carries its own UTC offset.
    pub fn has_offset(&self) -> bool {
        self.has_offset
    }

    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Strftime(spec) => out.push_str(&datetime.format(spec).to_string()),
                Segment::HourFromOne { padded } => {
                    let hour = match datetime.hour() {
                        0 => 24,
                        hour => hour,
                    };
                    if *padded {
                        out.push_str(&format!("{hour:02}"));
                    } else {
                        out.push_str(&hour.to_string());
                    }
                }
                Segment::Fraction { digits } => {
                    let nanos = datetime.nanosecond() % 1_000_000_000;
                    let mut fraction = format!("{nanos:09}");
                    if *digits <= fraction.len() {
                        fraction.truncate(*digits);
                    } else {
                        fraction.push_str(&"0".repeat(*digits - fraction.len()));
                    }
                    out.push_str(&fraction);
                }
            }
        }
        out
    }

    /// Parses `text` into chrono fields. Fields the pattern lacks stay unset.
    pub fn parse(&self, text: &str) -> Option<Parsed> {
        let mut parsed = Parsed::new();
        let mut rest = text;
        for segment in &self.segments {
            rest = match segment {
                Segment::Strftime(spec) => {
                    format::parse_and_remainder(&mut parsed, rest, StrftimeItems::new(spec)).ok()?
                }
                Segment::HourFromOne { padded } => {
                    let width = if *padded { 2 } else { leading_digits(rest).min(2) };
                    let (hour, rest) = take_digits(rest, width)?;
                    if !(1..=24).contains(&hour) {
                        return None;
                    }
                    parsed.set_hour(i64::from(hour % 24)).ok()?;
                    rest
                }
                Segment::Fraction { digits } => {
                    let (fraction, rest) = split_digits(rest, *digits)?;
                    let kept = &fraction[..fraction.len().min(9)];
                    let scale = 10u32.pow(9 - kept.len() as u32);
                    let nanos: u32 = kept.parse().ok()?;
                    parsed.set_nanosecond(i64::from(nanos * scale)).ok()?;
                    rest
                }
            };
        }
        rest.is_empty().then_some(parsed)
    }
}

fn flush(segments: &mut Vec<Segment>, current: &mut String) -> Result<(), PatternError> {
    if current.is_empty() {
        return Ok(());
    }
    if StrftimeItems::new(current).any(|item| matches!(item, Item::Error)) {
        // Every emitted specifier is known to chrono; reaching this means
        // the field table is out of sync with it.
        return Err(PatternError::Unsupported {
            letter: '%',
            count: 1,
        });
    }
    segments.push(Segment::Strftime(std::mem::take(current)));
    Ok(())
}

/// Consumes a `'...'` literal starting at `start`, returning the next index.
fn quoted_literal(chars: &[char], start: usize, out: &mut String) -> Result<usize, PatternError> {
    if chars.get(start + 1) == Some(&'\'') {
        out.push('\'');
        return Ok(start + 2);
    }
    let mut i = start + 1;
    loop {
        match chars.get(i) {
            None => return Err(PatternError::UnterminatedQuote),
            Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                out.push('\'');
                i += 2;
            }
            Some('\'') => return Ok(i + 1),
            Some(c) => {
                push_literal(out, *c);
                i += 1;
            }
        }
    }
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

fn field(letter: char, count: usize) -> Option<Field> {
    let spec = match (letter, count) {
        ('y', 2) => "%y",
        ('y', _) => "%Y",
        ('M' | 'L', 1) => "%-m",
        ('M' | 'L', 2) => "%m",
        ('M' | 'L', 3) => "%b",
        ('M' | 'L', _) => "%B",
        ('d', 1) => "%-d",
        ('d', 2) => "%d",
        ('D', 1) => "%-j",
        ('D', 2 | 3) => "%j",
        ('E', 1..=3) => "%a",
        ('E', 4) => "%A",
        ('a', 1..=3) => "%p",
        ('H', 1) => "%-H",
        ('H', 2) => "%H",
        ('h', 1) => "%-I",
        ('h', 2) => "%I",
        ('k', 1 | 2) => return Some(Field::Custom(Segment::HourFromOne { padded: count == 2 })),
        ('m', 1) => "%-M",
        ('m', 2) => "%M",
        ('s', 1) => "%-S",
        ('s', 2) => "%S",
        ('S', digits) => return Some(Field::Custom(Segment::Fraction { digits })),
        ('Z', 1..=3) => "%z",
        ('Z', 5) => "%:z",
        ('X' | 'x', 2 | 4) => "%z",
        ('X' | 'x', 3 | 5) => "%:z",
        _ => return None,
    };
    Some(Field::Strftime(spec))
}

//==================================================
// Section 2.0 - Digit scanning
//==================================================

fn leading_digits(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}

/// Splits off exactly `width` ASCII digits.
fn split_digits(text: &str, width: usize) -> Option<(&str, &str)> {
    if width == 0 || leading_digits(text) < width {
        return None;
    }
    Some(text.split_at(width))
}

fn take_digits(text: &str, width: usize) -> Option<(u32, &str)> {
    let (digits, rest) = split_digits(text, width)?;
    Some((digits.parse().ok()?, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn at(hour: u32, nanos: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2020, 1, 2)
            .and_then(|date| date.and_hms_nano_opt(hour, 5, 6, nanos))
            .expect("valid date")
            .and_utc()
    }

    #[test]
    fn translates_common_patterns() {
        let cases = [
            ("yyyy-MM-dd", "%Y-%m-%d"),
            ("dd/MM/yy HH:mm:ss", "%d/%m/%y %H:%M:%S"),
            ("EEEE, MMMM d", "%A, %B %-d"),
            ("h:mm a", "%-I:%M %p"),
            ("yyyy-MM-dd'T'HH:mm:ssZ", "%Y-%m-%dT%H:%M:%S%z"),
        ];
        for (pattern, expected) in cases {
            let compiled = DatePattern::compile(pattern).expect(pattern);
            assert_eq!(compiled.strftime(), Some(expected), "pattern {pattern}");
        }
    }

    #[test]
    fn one_based_hours_and_fractions_of_any_width() {
        let midnight = DatePattern::compile("kk:mm").expect("compile");
        assert_eq!(midnight.strftime(), None);
        assert_eq!(midnight.format(&at(0, 0)), "24:05");
        assert_eq!(DatePattern::compile("k").expect("compile").format(&at(7, 0)), "7");

        let fraction = |pattern: &str| DatePattern::compile(pattern).expect(pattern);
        let sample = at(13, 987_654_321);
        assert_eq!(fraction("ss.S").format(&sample), "06.9");
        assert_eq!(fraction("ss.SS").format(&sample), "06.98");
        assert_eq!(fraction("ss.SSS").format(&sample), "06.987");
        assert_eq!(fraction("ss.SSSSSSSSSSS").format(&sample), "06.98765432100");
        assert_eq!(
            fraction("yyyy-MM-dd'T'HH:mm:ss.SS").format(&sample),
            "2020-01-02T13:05:06.98"
        );
    }

    #[test]
    fn parses_one_based_hours_and_short_fractions() {
        let pattern = DatePattern::compile("kk:mm:ss.SS").expect("compile");
        let parsed = pattern.parse("24:30:15.25").expect("parse");
        assert_eq!(parsed.hour_div_12(), Some(0));
        assert_eq!(parsed.hour_mod_12(), Some(0));
        assert_eq!(parsed.minute(), Some(30));
        assert_eq!(parsed.nanosecond(), Some(250_000_000));

        let parsed = DatePattern::compile("k").expect("compile").parse("9").expect("parse");
        assert_eq!(parsed.hour_mod_12(), Some(9));

        assert!(pattern.parse("25:30:15.25").is_none());
        assert!(pattern.parse("24:30:15.2").is_none());
        assert!(pattern.parse("24:30:15.25 trailing").is_none());
    }

    #[test]
    fn quotes_and_percent_signs_are_literal() {
        let compiled = DatePattern::compile("'Day' d 'o''clock' 100%").expect("compile");
        assert_eq!(compiled.strftime(), Some("Day %-d o'clock 100%%"));
        assert_eq!(DatePattern::compile("''").expect("compile").strftime(), Some("'"));
    }

    #[test]
    fn offset_fields_are_tracked() {
        assert!(DatePattern::compile("yyyy-MM-dd HH:mm xxx").expect("compile").has_offset());
        assert!(!DatePattern::compile("yyyy-MM-dd").expect("compile").has_offset());
    }

    #[test]
    fn rejects_unknown_fields_and_open_quotes() {
        assert_eq!(
            DatePattern::compile("yyyy-QQ"),
            Err(PatternError::Unsupported {
                letter: 'Q',
                count: 2
            })
        );
        assert_eq!(DatePattern::compile("'open"), Err(PatternError::UnterminatedQuote));
        assert!(DatePattern::compile("ddd").is_err());
        assert!(DatePattern::compile("kkk").is_err());
    }
}
