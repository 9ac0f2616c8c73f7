//! Decoding of single-quoted string literals.

/// Strips the surrounding quotes from a string literal and resolves escapes.
///
/// Only `\'` and `\\` are escapes. A backslash before any other character is
/// kept as is, so `'a\nb'` decodes to the four characters `a`, `\`, `n`, `b`.
pub fn unescape(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped @ ('\'' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Some(out)
}
