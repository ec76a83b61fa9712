//! Escaping and unescaping of character references.
//!
//! [XML 1.0 § 4.1 Character and Entity References](https://www.w3.org/TR/xml/#sec-references)
//!
//! Resolution is forgiving: a reference that cannot be resolved is copied to
//! the output unchanged, delimiters included.

use std::borrow::Cow;

use super::EntityNamespace;

/// The outcome of reading an entity body as a numeric character reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericEntity {
    /// The body does not start with `#`; it may still be a named entity.
    NotNumeric,
    /// The body starts with `#` but is not a valid code point.
    Invalid,
    /// The referenced character.
    Char(char),
}

/// Read an entity body (the text between `&` and `;`) as a numeric reference.
///
/// "CharRef ::= '&#' [0-9]+ ';' | '&#x' [0-9a-fA-F]+ ';'"
///
/// Signs, empty digit strings, surrogates and values above U+10FFFF are all
/// [`NumericEntity::Invalid`].
#[must_use]
pub fn parse_numeric_entity(body: &str) -> NumericEntity {
    let Some(number) = body.strip_prefix('#') else {
        return NumericEntity::NotNumeric;
    };
    let (digits, radix) = match number.strip_prefix(['x', 'X']) {
        Some(hex) => (hex, 16),
        None => (number, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return NumericEntity::Invalid;
    }
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)
        .map_or(NumericEntity::Invalid, NumericEntity::Char)
}

/// Resolve an entity body against `entities`.
///
/// Numeric references decode to their character. A malformed numeric
/// reference is unresolved even if `entities` happens to define its body as
/// a name. Anything else is looked up by name.
#[must_use]
pub fn resolve_entity(body: &str, entities: &EntityNamespace) -> Option<String> {
    lookup(body, entities).map(Cow::into_owned)
}

fn lookup<'n>(body: &str, entities: &'n EntityNamespace) -> Option<Cow<'n, str>> {
    match parse_numeric_entity(body) {
        NumericEntity::Char(c) => Some(Cow::Owned(c.to_string())),
        NumericEntity::Invalid => None,
        NumericEntity::NotNumeric => entities.get_entity(body).map(Cow::Borrowed),
    }
}

/// Replace every resolvable `&...;` reference in `text`.
///
/// A reference body runs from `&` to the next `;` and never contains another
/// `&`. Unresolved references, and `&` without such a body, are kept
/// verbatim. Text without any `&` is returned borrowed.
///
/// Runs in time linear in the length of `text`.
#[must_use]
pub fn unescape<'a>(text: &'a str, entities: &EntityNamespace) -> Cow<'a, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let resolved = after
            .find([';', '&'])
            .filter(|&end| after[end..].starts_with(';'))
            .and_then(|semi| lookup(&after[..semi], entities).map(|value| (value, semi)));

        match resolved {
            Some((value, semi)) => {
                out.push_str(&value);
                rest = &after[semi + 1..];
            }
            None => {
                // Resume right after the `&` so a later reference inside the
                // rejected span is still found.
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Escape `&`, `<` and `>` for use in character data.
#[must_use]
pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape_with(text, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    })
}

/// Escape `&`, `<`, `>`, `"` and `'` for use inside a quoted attribute value.
#[must_use]
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape_with(value, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&apos;"),
        _ => None,
    })
}

fn escape_with(text: &str, replacement: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    let Some(first) = text.find(|c: char| replacement(c).is_some()) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len() + 8);
    out.push_str(&text[..first]);
    for c in text[first..].chars() {
        match replacement(c) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}
