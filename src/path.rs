//! Character-level readers for access chains and destructuring patterns.
//!
//! # Access chains
//!
//! After an alias occurrence, the chain that follows is read one character at
//! a time:
//!
//! ```text
//! user.address.city          → [address, city]
//! user?.address["zip-code"]  → [address, zip-code]
//! user.friends[0].name       → [friends, name]
//! user.name.trim()           → [name]
//! ```
//!
//! # Destructuring patterns
//!
//! ```text
//! item                       → Binding(item)
//! {a, b: renamed, c = 1}     → Object[a → a, b → renamed, c → c]
//! {author: {name}, ...rest}  → Object[author → Object[name], Rest(rest)]
//! [first, second]            → Array[first, second]
//! ```

/// Characters allowed in template-side identifiers
pub fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if is_ident_char(c) && !c.is_ascii_digit())
        && chars.all(is_ident_char)
}

/// The field chain read after an alias occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPath {
    /// Field names, outermost first
    pub segments: Vec<String>,

    /// Byte offset just past the consumed chain
    pub end: usize,
}

/// Reads the access chain starting at byte offset `start` of `text`.
///
/// At bracket depth 0, identifier characters and `.` extend the path; `?`
/// is skipped when it starts an optional chain; anything else ends the scan.
/// Inside brackets, quoted keys become segments and everything else (indices,
/// computed expressions) is skipped.
///
/// With `drop_method_calls`, a chain ending in `(` loses its last segment,
/// since that segment names a method of the value rather than a field.
pub fn scan_access(text: &str, start: usize, drop_method_calls: bool) -> AccessPath {
    let mut path = String::new();
    let mut depth = 0usize;
    let mut end = text.len();
    let mut called = false;
    let mut chars = text[start..].char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '[' => depth += 1,
            ']' if depth > 0 => depth -= 1,
            '"' | '\'' | '`' if depth > 0 => {
                path.push('.');
                for (_, key_ch) in chars.by_ref() {
                    if key_ch == ch {
                        break;
                    }
                    path.push(key_ch);
                }
            }
            _ if depth > 0 => {}
            '.' => path.push('.'),
            '?' if matches!(chars.peek(), Some((_, '.' | '['))) => {}
            c if is_ident_char(c) => path.push(c),
            c => {
                called = c == '(';
                end = start + offset;
                break;
            }
        }
    }

    let mut segments: Vec<String> = path
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    if called && drop_method_calls {
        segments.pop();
    }

    AccessPath { segments, end }
}

/// Finds the next whole-identifier occurrence of `name` at or after `from`.
///
/// An occurrence preceded by `.` is a property of something else and does not
/// count.
pub fn find_identifier(text: &str, name: &str, from: usize) -> Option<usize> {
    if name.is_empty() {
        return None;
    }

    let mut cursor = from;
    while let Some(found) = text[cursor..].find(name) {
        let at = cursor + found;
        let after = at + name.len();

        let before_ok = text[..at]
            .chars()
            .next_back()
            .is_none_or(|c| !is_ident_char(c) && c != '.');
        let after_ok = text[after..].chars().next().is_none_or(|c| !is_ident_char(c));

        if before_ok && after_ok {
            return Some(at);
        }
        cursor = at + name.chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Splits on `separator` where it is not nested in brackets or quotes.
///
/// Pieces are trimmed; empty pieces (trailing separators) are dropped.
pub fn split_top_level(text: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut current = String::new();

    for ch in text.chars() {
        match (ch, quote) {
            (q, Some(open)) if q == open => quote = None,
            (_, Some(_)) => {}
            ('"' | '\'' | '`', None) => quote = Some(ch),
            ('{' | '[' | '(', None) => depth += 1,
            ('}' | ']' | ')', None) => depth -= 1,
            (c, None) if c == separator && depth == 0 => {
                let part = current.trim();
                if !part.is_empty() {
                    parts.push(part.to_string());
                }
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }

    let part = current.trim();
    if !part.is_empty() {
        parts.push(part.to_string());
    }
    parts
}

/// Byte offset of `keyword` as a whitespace-delimited word outside any nesting
pub fn find_keyword(text: &str, keyword: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;

    for (at, ch) in text.char_indices() {
        match (ch, quote) {
            (q, Some(open)) if q == open => quote = None,
            (_, Some(_)) => {}
            ('"' | '\'' | '`', None) => quote = Some(ch),
            ('{' | '[' | '(', None) => depth += 1,
            ('}' | ']' | ')', None) => depth -= 1,
            (c, None) if c.is_whitespace() && depth == 0 => {
                let word_start = at + c.len_utf8();
                let rest = &text[word_start..];
                if rest.starts_with(keyword)
                    && rest[keyword.len()..]
                        .chars()
                        .next()
                        .is_some_and(char::is_whitespace)
                {
                    return Some(word_start);
                }
            }
            _ => {}
        }
    }
    None
}

/// A loop-variable pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// A plain name bound to the whole value
    Binding(String),

    /// `{ ... }` - each entry reads one field of the value
    Object(Vec<ObjectEntry>),

    /// `[ ... ]` - each element is an element of the (list) value
    Array(Vec<Pattern>),

    /// `...name` inside an array pattern
    Rest(String),

    /// Anything the grammar does not cover
    Unsupported(String),
}

/// One entry of an object pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectEntry {
    /// `key`, `key: pattern` or either with a `= default`
    Field { key: String, value: Pattern },

    /// `...name`, the remaining fields of the same value
    Rest(String),

    Unsupported(String),
}

impl Pattern {
    pub fn parse(text: &str) -> Pattern {
        let text = strip_default(text.trim());

        if let Some(inner) = text.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
            return Pattern::Object(
                split_top_level(inner, ',')
                    .iter()
                    .map(|entry| ObjectEntry::parse(entry))
                    .collect(),
            );
        }

        if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            return Pattern::Array(
                split_top_level(inner, ',')
                    .iter()
                    .map(|element| match element.strip_prefix("...") {
                        Some(name) if is_identifier(name.trim()) => {
                            Pattern::Rest(name.trim().to_string())
                        }
                        _ => Pattern::parse(element),
                    })
                    .collect(),
            );
        }

        if is_identifier(text) {
            Pattern::Binding(text.to_string())
        } else {
            Pattern::Unsupported(text.to_string())
        }
    }
}

impl ObjectEntry {
    pub fn parse(text: &str) -> ObjectEntry {
        let text = text.trim();

        if let Some(name) = text.strip_prefix("...") {
            let name = name.trim();
            return if is_identifier(name) {
                ObjectEntry::Rest(name.to_string())
            } else {
                ObjectEntry::Unsupported(text.to_string())
            };
        }

        let (key, value) = match split_top_level(text, ':').as_slice() {
            [key] => {
                let key = strip_default(key);
                (key.to_string(), Pattern::Binding(key.to_string()))
            }
            [key, value] => (unquote(key).to_string(), Pattern::parse(value)),
            _ => return ObjectEntry::Unsupported(text.to_string()),
        };

        if key.is_empty() || key.contains(char::is_whitespace) {
            return ObjectEntry::Unsupported(text.to_string());
        }
        if let Pattern::Binding(name) = &value {
            if !is_identifier(name) {
                return ObjectEntry::Unsupported(text.to_string());
            }
        }

        ObjectEntry::Field { key, value }
    }
}

/// Drops a top-level `= default` suffix
fn strip_default(text: &str) -> &str {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut previous = ' ';

    for (at, ch) in text.char_indices() {
        match (ch, quote) {
            (q, Some(open)) if q == open => quote = None,
            (_, Some(_)) => {}
            ('"' | '\'' | '`', None) => quote = Some(ch),
            ('{' | '[' | '(', None) => depth += 1,
            ('}' | ']' | ')', None) => depth -= 1,
            ('=', None) if depth == 0 && !matches!(previous, '=' | '!' | '<' | '>') => {
                let next = text[at + 1..].chars().next();
                if !matches!(next, Some('=' | '>')) {
                    return text[..at].trim_end();
                }
            }
            _ => {}
        }
        previous = ch;
    }
    text
}

fn unquote(text: &str) -> &str {
    let text = text.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = text.strip_prefix(quote).and_then(|t| t.strip_suffix(quote)) {
            return inner;
        }
    }
    text
}
