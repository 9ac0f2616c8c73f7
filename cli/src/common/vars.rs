//! `--var NAME=VALUE` handling.

use verdict::{BindingError, Bindings};

/// A variable assignment from the command line, value still untyped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarAssignment {
    pub name: String,
    pub value: String,
}

/// clap value parser for `NAME=VALUE`.
pub fn parse_assignment(arg: &str) -> Result<VarAssignment, String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, found `{arg}`"))?;
    let name = name.trim().trim_start_matches('$');
    if name.is_empty() {
        return Err(format!("missing variable name in `{arg}`"));
    }
    Ok(VarAssignment {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// A value typed the way it would be read in an expression: `true`/`false`,
/// an integer, a float, or a string. Quoting with `'` forces a string.
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

pub fn infer(raw: &str) -> VarValue {
    if let Some(quoted) = raw
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return VarValue::Str(quoted.to_string());
    }
    match raw {
        "true" => return VarValue::Bool(true),
        "false" => return VarValue::Bool(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return VarValue::Int(i);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => VarValue::Float(f),
        _ => VarValue::Str(raw.to_string()),
    }
}

pub fn build_bindings(vars: &[VarAssignment]) -> Result<Bindings, BindingError> {
    let mut bindings = Bindings::new();
    for var in vars {
        let name = var.name.as_str();
        match infer(&var.value) {
            VarValue::Bool(b) => bindings.insert(name, b)?,
            VarValue::Int(i) => bindings.insert(name, i)?,
            VarValue::Float(f) => bindings.insert(name, f)?,
            VarValue::Str(s) => bindings.insert(name, s)?,
        };
        tracing::debug!(name, value = %var.value, "Bound variable");
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use verdict::Value;

    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("speed=87"),
            Ok(VarAssignment {
                name: "speed".to_string(),
                value: "87".to_string()
            })
        );
        assert_eq!(
            parse_assignment("$note=a=b").map(|v| (v.name, v.value)),
            Ok(("note".to_string(), "a=b".to_string()))
        );
        assert!(parse_assignment("speed").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn test_infer() {
        assert_eq!(infer("true"), VarValue::Bool(true));
        assert_eq!(infer("-3"), VarValue::Int(-3));
        assert_eq!(infer("2.5"), VarValue::Float(2.5));
        assert_eq!(infer("byd"), VarValue::Str("byd".to_string()));
        assert_eq!(infer("'42'"), VarValue::Str("42".to_string()));
        assert_eq!(infer("inf"), VarValue::Str("inf".to_string()));
        assert_eq!(infer(""), VarValue::Str(String::new()));
    }

    #[test]
    fn test_later_assignment_wins() {
        let vars = [
            parse_assignment("x=1").unwrap(),
            parse_assignment("x='one'").unwrap(),
        ];
        let bindings = build_bindings(&vars).unwrap();
        assert_eq!(bindings.get("x"), Some(&Value::Str("one".to_string())));
    }
}
