use std::{
    fmt::Display,
    sync::atomic::{AtomicBool, Ordering},
};

use fxd4_model::OrderOptions;
use nu_ansi_term::Color;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{CliError, CliResult};

pub static COLOR: AtomicBool = AtomicBool::new(true);

pub fn set_color(enabled: bool) {
    COLOR.store(enabled, Ordering::Relaxed);
}

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if COLOR.load(Ordering::Relaxed) {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

/// Reads a command line value as JSON when it is valid JSON, so `7`, `true`
/// and `null` keep their type. Anything else is a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Splits `column=value`.
pub fn parse_assignment(raw: &str) -> CliResult<(String, String)> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::invalid_argument(raw, "expected column=value"))?;

    let column = column.trim();
    if column.is_empty() {
        return Err(CliError::invalid_argument(raw, "column name is empty"));
    }

    Ok((column.to_string(), value.to_string()))
}

/// Parses `column` or `column:asc|desc`.
pub fn parse_order(raw: &str, nulls_first: bool) -> CliResult<(String, OrderOptions)> {
    let (column, direction) = match raw.split_once(':') {
        Some((column, direction)) => (column, Some(direction)),
        None => (raw, None),
    };

    if column.is_empty() {
        return Err(CliError::invalid_argument(raw, "column name is empty"));
    }

    let options = match direction.map(str::to_ascii_lowercase).as_deref() {
        None | Some("asc") => OrderOptions::asc(),
        Some("desc") => OrderOptions::desc(),
        Some(_) => {
            return Err(CliError::invalid_argument(
                raw,
                "direction must be 'asc' or 'desc'",
            ))
        }
    };

    let options = if nulls_first {
        options.nulls_first(true)
    } else {
        options
    };
    Ok((column.to_string(), options))
}

/// Parses a JSON object given on the command line.
pub fn parse_payload(raw: &str) -> CliResult<Map<String, Value>> {
    serde_json::from_str(raw).map_err(CliError::InvalidPayload)
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(CliError::Output)
}
