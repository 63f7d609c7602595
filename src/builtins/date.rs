//==================================================
// File: builtins/date.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Date builtins for Cub scripts
// Objective: Calendar arithmetic, clock access, and pattern parsing/formatting
//            over epoch-second numbers
//==================================================

use std::fmt;

use chrono::format::{ParseResult, Parsed};
use chrono::{
    DateTime, Days, FixedOffset, Local, Months, NaiveDateTime, TimeDelta, TimeZone, Utc,
};

use super::pattern::DatePattern;
use crate::binding::ArgumentBinding;
use crate::value::Value;

pub const DATE_BY_ADDING_DOC: &str = "\
Add a specific amount of a date unit to a given date.

Example:
myDate = currentDate()
tomorrowThisTime = dateByAdding(1, \"day\", myDate)

- Parameter value: the number that you want to add to the given date, in the given unit.
- Parameter unit: a string that represents a date unit. One of the following values: \"second\", \"minute\", \"hour\", \"day\", \"month\", \"year\"
- Parameter date: a number that represents a date.
- Returns: a number representing the given date, having added the value in the specified unit.";

pub const CURRENT_DATE_DOC: &str = "\
Get the current date and time, represented as a number.
- Returns: a number representing the current date and time.";

pub const DATE_FROM_FORMAT_DOC: &str = "\
Get a date (represented as a number), from a string in a specified format.

Example:
myDate = dateFromFormat(\"2012-02-20\", \"yyyy-MM-dd\")

- Parameter dateString: a date in a string format.
- Parameter format: the format that the given date string is in.
- Returns: a date.";

pub const FORMATTED_DATE_DOC: &str = "\
Get a formatted date (a string) from a date (represented as a number) in a specified format.

Example:
myDate = currentDate()
myDateString = formattedDate(myDate, \"yyyy-MM-dd\")

- Parameter date: a number representing a date.
- Parameter format: the format to get the date in.
- Returns: a string of the given date, formatted.";

/// Supplies the date fields a pattern leaves out.
const TIME_ONLY_DAY: (i32, u32, u32) = (2000, 1, 1);

//==================================================
// Section 1.0 - Calendar
//==================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateUnit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl DateUnit {
    pub fn from_name(name: &str) -> Option<Self> {
        let unit = match name {
            "second" => DateUnit::Second,
            "minute" => DateUnit::Minute,
            "hour" => DateUnit::Hour,
            "day" => DateUnit::Day,
            "month" => DateUnit::Month,
            "year" => DateUnit::Year,
            _ => return None,
        };
        Some(unit)
    }
}

/// Time zone whose wall-clock rules govern calendar arithmetic, parsing and
/// formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Calendar {
    Utc,
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl Calendar {
    /// Fixed offset in seconds east of UTC; `None` if out of range.
    pub fn fixed(seconds_east: i32) -> Option<Self> {
        FixedOffset::east_opt(seconds_east).map(Calendar::Fixed)
    }

    /// Adds `amount` units to `date` (epoch seconds).
    pub fn add(&self, date: f64, amount: i64, unit: DateUnit) -> Option<f64> {
        let instant = instant(date)?;
        let delta = match self {
            Calendar::Utc => shift_in(&Utc, instant, amount, unit)?,
            Calendar::Local => shift_in(&Local, instant, amount, unit)?,
            Calendar::Fixed(offset) => shift_in(offset, instant, amount, unit)?,
        };
        Some(date + delta_seconds(delta))
    }

    pub fn parse(&self, text: &str, pattern: &DatePattern) -> Option<f64> {
        let parsed = parse_fields(text, pattern)?;
        if pattern.has_offset() {
            let parsed = parsed.to_datetime().ok()?;
            return Some(epoch_seconds(parsed.with_timezone(&Utc)));
        }
        let naive = parsed
            .to_naive_date()
            .ok()?
            .and_time(parsed.to_naive_time().ok()?);
        let resolved = match self {
            Calendar::Utc => resolve_local(&Utc, &naive)?,
            Calendar::Local => resolve_local(&Local, &naive)?,
            Calendar::Fixed(offset) => resolve_local(offset, &naive)?,
        };
        Some(epoch_seconds(resolved))
    }

    pub fn format(&self, date: f64, pattern: &DatePattern) -> Option<String> {
        let instant = instant(date)?;
        let text = match self {
            Calendar::Utc => format_in(&Utc, instant, pattern),
            Calendar::Local => format_in(&Local, instant, pattern),
            Calendar::Fixed(offset) => format_in(offset, instant, pattern),
        };
        Some(text)
    }
}

fn instant(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let mut whole = seconds.floor();
    let mut nanos = ((seconds - whole) * 1e9).round();
    if nanos >= 1e9 {
        whole += 1.0;
        nanos = 0.0;
    }
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(whole as i64, nanos as u32)
}

fn epoch_seconds(instant: DateTime<Utc>) -> f64 {
    instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) / 1e9
}

fn delta_seconds(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9
}

/// Wall-clock shift in `tz`; returns the elapsed time between the instants.
fn shift_in<Tz: TimeZone>(
    tz: &Tz,
    instant: DateTime<Utc>,
    amount: i64,
    unit: DateUnit,
) -> Option<TimeDelta> {
    let local = instant.with_timezone(tz);
    let shifted = match unit {
        DateUnit::Second => local.checked_add_signed(TimeDelta::try_seconds(amount)?)?,
        DateUnit::Minute => local.checked_add_signed(TimeDelta::try_minutes(amount)?)?,
        DateUnit::Hour => local.checked_add_signed(TimeDelta::try_hours(amount)?)?,
        DateUnit::Day => {
            let wall = local.naive_local();
            let days = Days::new(amount.unsigned_abs());
            let moved = if amount >= 0 {
                wall.checked_add_days(days)?
            } else {
                wall.checked_sub_days(days)?
            };
            resolve_in(tz, &moved)?
        }
        DateUnit::Month => shift_months(tz, &local, amount)?,
        DateUnit::Year => shift_months(tz, &local, amount.checked_mul(12)?)?,
    };
    Some(shifted.with_timezone(&Utc) - instant)
}

/// Month arithmetic clamps the day to the end of shorter months.
fn shift_months<Tz: TimeZone>(tz: &Tz, local: &DateTime<Tz>, amount: i64) -> Option<DateTime<Tz>> {
    let wall = local.naive_local();
    let months = Months::new(u32::try_from(amount.unsigned_abs()).ok()?);
    let moved = if amount >= 0 {
        wall.checked_add_months(months)?
    } else {
        wall.checked_sub_months(months)?
    };
    resolve_in(tz, &moved)
}

/// Maps a wall-clock time to an instant, taking the earlier reading when the
/// wall time repeats. Skipped wall times have no instant.
fn resolve_in<Tz: TimeZone>(tz: &Tz, wall: &NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(wall).earliest()
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, wall: &NaiveDateTime) -> Option<DateTime<Utc>> {
    resolve_in(tz, wall).map(|dt| dt.with_timezone(&Utc))
}

/// Parses `text` and fills the fields the pattern left out: no year means
/// the reference year, then the first month and day, then midnight.
fn parse_fields(text: &str, pattern: &DatePattern) -> Option<Parsed> {
    let mut parsed = pattern.parse(text)?;
    fill_missing_fields(&mut parsed).ok()?;
    Some(parsed)
}

fn fill_missing_fields(parsed: &mut Parsed) -> ParseResult<()> {
    let (year, month, day) = TIME_ONLY_DAY;
    let has_year = parsed.year().is_some()
        || parsed.year_div_100().is_some()
        || parsed.year_mod_100().is_some();
    if !has_year {
        parsed.set_year(i64::from(year))?;
    }
    if parsed.ordinal().is_none() {
        if parsed.month().is_none() {
            parsed.set_month(i64::from(month))?;
        }
        if parsed.day().is_none() {
            parsed.set_day(i64::from(day))?;
        }
    }

    match (parsed.hour_div_12(), parsed.hour_mod_12()) {
        (None, None) => parsed.set_hour(0)?,
        // `h` without `a` reads as morning.
        (None, Some(_)) => parsed.set_ampm(false)?,
        (Some(_), None) => parsed.set_hour12(12)?,
        (Some(_), Some(_)) => {}
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    if parsed.second().is_none() {
        parsed.set_second(0)?;
    }
    Ok(())
}

fn format_in<Tz: TimeZone>(tz: &Tz, instant: DateTime<Utc>, pattern: &DatePattern) -> String
where
    Tz::Offset: fmt::Display,
{
    pattern.format(&instant.with_timezone(tz))
}

//==================================================
// Section 2.0 - Builtins
//==================================================

pub fn date_by_adding(calendar: Calendar, args: &ArgumentBinding) -> Value {
    let (Some(Value::Number(value)), Some(Value::String(unit)), Some(Value::Number(date))) =
        (args.get("value"), args.get("unit"), args.get("date"))
    else {
        return Value::Number(0.0);
    };
    let Some(unit) = DateUnit::from_name(unit) else {
        return Value::Number(0.0);
    };
    if !value.is_finite() {
        return Value::Number(0.0);
    }
    let amount = value.trunc() as i64;
    Value::Number(calendar.add(*date, amount, unit).unwrap_or(0.0))
}

pub fn current_date() -> Value {
    Value::Number(epoch_seconds(Utc::now()))
}

pub fn date_from_format(calendar: Calendar, args: &ArgumentBinding) -> Value {
    let (Some(Value::String(text)), Some(Value::String(format))) =
        (args.get("dateString"), args.get("format"))
    else {
        return Value::Number(0.0);
    };
    let parsed = DatePattern::compile(format)
        .ok()
        .and_then(|pattern| calendar.parse(text, &pattern));
    Value::Number(parsed.unwrap_or(0.0))
}

/// Bad input yields `Number(0)`, not an empty string.
pub fn formatted_date(calendar: Calendar, args: &ArgumentBinding) -> Value {
    let (Some(Value::Number(date)), Some(Value::String(format))) =
        (args.get("date"), args.get("format"))
    else {
        return Value::Number(0.0);
    };
    DatePattern::compile(format)
        .ok()
        .and_then(|pattern| calendar.format(*date, &pattern))
        .map(Value::String)
        .unwrap_or(Value::Number(0.0))
}
