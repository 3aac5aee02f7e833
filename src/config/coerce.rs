// BSD 3-Clause License
// Copyright (c) 2025, NØNOS - NOXTERM
//
//! Text to value coercion for environment variables
//!
//! Each parser returns a plain reason string; the loader attaches the
//! variable name and raw value.

use std::collections::HashMap;
use std::time::Duration;

pub fn parse_integer(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>().map_err(|e| e.to_string())
}

/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err("expected one of 1, t, true, 0, f, false".to_string()),
    }
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(1_000_000_000),
        "m" => Some(60 * 1_000_000_000),
        "h" => Some(3_600 * 1_000_000_000),
        _ => None,
    }
}

/// Parses compound durations such as `300s`, `1h30m` or `1.5ms`.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let mut rest = raw.strip_prefix('+').unwrap_or(raw);
    if rest.starts_with('-') {
        return Err("negative durations are not supported".to_string());
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err("empty duration".to_string());
    }

    let overflow = || "duration out of range".to_string();
    let mut total: u128 = 0;

    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, after) = rest.split_at(int_len);
        let (frac_part, after) = match after.strip_prefix('.') {
            Some(tail) => tail.split_at(tail.bytes().take_while(u8::is_ascii_digit).count()),
            None => ("", after),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(format!("expected a number at '{}'", rest));
        }

        let unit_len = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, next) = after.split_at(unit_len);
        let scale = match unit_nanos(unit) {
            Some(scale) => scale,
            None if unit.is_empty() => {
                return Err("missing unit (ns, us, ms, s, m, h)".to_string())
            }
            None => return Err(format!("unknown unit '{}'", unit)),
        };

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| overflow())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(overflow)?;

        if !frac_part.is_empty() {
            // Digits past nanosecond precision of an hour cannot matter.
            let digits = &frac_part[..frac_part.len().min(18)];
            let frac: u128 = digits.parse().map_err(|_| overflow())?;
            nanos = nanos
                .checked_add(frac * scale / 10u128.pow(digits.len() as u32))
                .ok_or_else(overflow)?;
        }

        total = total.checked_add(nanos).ok_or_else(overflow)?;
        if total > u128::from(u64::MAX) {
            return Err(overflow());
        }
        rest = next;
    }

    Ok(Duration::from_nanos(total as u64))
}

/// Renders a duration in the largest unit that divides it exactly.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    for (unit, scale) in [
        ("h", 3_600 * 1_000_000_000u128),
        ("m", 60 * 1_000_000_000),
        ("s", 1_000_000_000),
        ("ms", 1_000_000),
        ("us", 1_000),
    ] {
        if nanos % scale == 0 {
            return format!("{}{}", nanos / scale, unit);
        }
    }
    format!("{}ns", nanos)
}

/// Parses `key=value,key=value`. A backslash escapes the next character, so
/// `\,`, `\=` and `\\` may appear in keys and values. Only the first unescaped
/// `=` of an entry separates key from value.
pub fn parse_map(raw: &str) -> Result<HashMap<String, String>, String> {
    let mut map = HashMap::new();
    if raw.is_empty() {
        return Ok(map);
    }

    let mut entries: Vec<(String, Option<String>)> = Vec::new();
    let mut key = String::new();
    let mut value: Option<String> = None;
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        let literal = match c {
            '\\' => chars
                .next()
                .ok_or_else(|| "dangling '\\' at end of input".to_string())?,
            ',' => {
                entries.push((std::mem::take(&mut key), value.take()));
                continue;
            }
            '=' if value.is_none() => {
                value = Some(String::new());
                continue;
            }
            c => c,
        };
        match value.as_mut() {
            Some(v) => v.push(literal),
            None => key.push(literal),
        }
    }
    entries.push((key, value));

    for (index, (key, value)) in entries.into_iter().enumerate() {
        let value = match value {
            Some(value) => value,
            None if key.is_empty() => return Err(format!("entry {} is empty", index + 1)),
            None => return Err(format!("entry '{}' is missing '='", key)),
        };
        if key.is_empty() {
            return Err(format!("entry {} has an empty key", index + 1));
        }
        if map.contains_key(&key) {
            return Err(format!("duplicate key '{}'", key));
        }
        map.insert(key, value);
    }

    Ok(map)
}
