//! Exact-count post-filter
//!
//! The upstream service applies bedroom/bathroom equality loosely, so the
//! returned page is filtered again here.

use serde_json::Value;

/// Leading integer of a request parameter (`"3"` → 3, `"3.5"` → 3)
pub fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let digits_start = usize::from(s.starts_with(['-', '+']));
    let end = s[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |i| i + digits_start);
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

/// Whether a record field holds exactly `expected`. `None` never matches.
fn count_equals(value: Option<&Value>, expected: Option<i64>) -> bool {
    let Some(expected) = expected else {
        return false;
    };
    match value {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => i == expected,
            None => n
                .as_f64()
                .is_some_and(|f| f.fract() == 0.0 && f == expected as f64),
        },
        Some(Value::String(s)) => s.trim().parse::<i64>().ok() == Some(expected),
        _ => false,
    }
}

/// Keep records whose `field` equals `expected`. Order is preserved.
pub fn retain_exact(records: &mut Vec<Value>, field: &str, expected: Option<i64>) {
    records.retain(|record| count_equals(record.get(field), expected));
}

/// Apply exact-match filters to the `value` array of an OData body.
/// A `None` count (unparseable or out of range) removes every record.
/// Bodies without a `value` array are left untouched.
pub fn apply(body: &mut Value, constraints: &[(&str, Option<i64>)]) {
    if constraints.is_empty() {
        return;
    }
    let Some(records) = body.get_mut("value").and_then(Value::as_array_mut) else {
        return;
    };
    for (field, expected) in constraints {
        retain_exact(records, field, *expected);
    }
}
