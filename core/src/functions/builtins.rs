//! Functions available to every expression.

use hashbrown::HashSet;

use super::function::Function;
use super::registry::FunctionScope;

/// `s` contains `sub`.
pub fn contains(s: String, sub: String) -> bool {
    s.contains(&sub)
}

pub fn starts_with(s: String, prefix: String) -> bool {
    s.starts_with(&prefix)
}

pub fn ends_with(s: String, suffix: String) -> bool {
    s.ends_with(&suffix)
}

/// Length in bytes.
pub fn length(s: String) -> i64 {
    i64::try_from(s.len()).unwrap_or(i64::MAX)
}

pub fn to_lower(s: String) -> String {
    s.to_lowercase()
}

pub fn to_upper(s: String) -> String {
    s.to_uppercase()
}

pub fn trim(s: String) -> String {
    s.trim().to_string()
}

pub fn concat(a: String, b: String) -> String {
    a + &b
}

fn csv_items(s: &str) -> HashSet<&str> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Whether two comma-separated lists share an item. Items are trimmed and
/// empty items ignored.
pub fn has_intersection(superset: String, set: String) -> bool {
    let superset = csv_items(&superset);
    csv_items(&set).iter().any(|item| superset.contains(item))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let mut parts = s.split(',');
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("invalid point `{s}`, expected 'x, y'"));
    };
    let coordinate = |part: &str, axis: &str| {
        let part = part.trim();
        part.parse::<f64>()
            .map_err(|e| format!("invalid point {axis} value `{part}`: {e}"))
    };
    Ok(Point {
        x: coordinate(x, "x")?,
        y: coordinate(y, "y")?,
    })
}

/// Whether `point` lies in the axis-aligned box spanned by `bottom_left` and
/// `top_right`, borders included. Points are written `"x, y"`.
pub fn geo_within_2d(point: String, bottom_left: String, top_right: String) -> Result<bool, String> {
    let p = parse_point(&point)?;
    let bl = parse_point(&bottom_left)?;
    let tr = parse_point(&top_right)?;
    Ok(bl.x <= p.x && p.x <= tr.x && bl.y <= p.y && p.y <= tr.y)
}

/// Unix time `seconds` ago.
pub fn timestamp_before(seconds: i64) -> i64 {
    chrono::Utc::now().timestamp().saturating_sub(seconds)
}

/// Current local time, RFC 3339 with the local UTC offset.
pub fn now() -> String {
    chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// A scope holding every built-in function.
pub fn builtin_scope() -> FunctionScope {
    let mut scope = FunctionScope::new();
    let functions = [
        ("contains", Function::from_fn(contains)),
        ("startsWith", Function::from_fn(starts_with)),
        ("endsWith", Function::from_fn(ends_with)),
        ("length", Function::from_fn(length)),
        ("toLower", Function::from_fn(to_lower)),
        ("toUpper", Function::from_fn(to_upper)),
        ("trim", Function::from_fn(trim)),
        ("concat", Function::from_fn(concat)),
        ("hasIntersection", Function::from_fn(has_intersection)),
        ("geoWithin2d", Function::from_fn(geo_within_2d)),
        ("timestampBefore", Function::from_fn(timestamp_before)),
        ("now", Function::from_fn(now)),
    ];
    for (name, function) in functions {
        if let Err(e) = scope.insert(name, function) {
            tracing::error!(name, error = %e, "Failed to register built-in function");
        }
    }
    scope
}
