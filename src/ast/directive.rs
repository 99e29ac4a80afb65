use crate::path::{find_keyword, split_top_level};

/// Block-level productions recognized in an expression token.
///
/// Classification splits the token on whitespace and inspects the first word.
/// Arity mismatches are classified rather than rejected so the parser can stay
/// lenient and still report them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `#await <expr>` or `#await <expr> then <name>`
    AwaitOpen {
        source: String,
        bound_name: Option<String>,
    },

    /// `#await` with any other word count, or a 4-word form without `then`
    MalformedAwait { arity: usize },

    /// `:then <name>`
    ThenBind(String),

    /// `:then` with any word count other than 2
    MalformedThen { arity: usize },

    /// `:catch`, with or without an error binding
    CatchMark,

    /// `/await`
    AwaitClose,

    /// Any other expression
    Content,
}

impl Directive {
    pub fn classify(text: &str) -> Directive {
        let words: Vec<&str> = text.split_whitespace().collect();

        match words.first().copied() {
            Some("#await") => match words.as_slice() {
                [_, source] => Directive::AwaitOpen {
                    source: (*source).to_string(),
                    bound_name: None,
                },
                [_, source, "then", name] => Directive::AwaitOpen {
                    source: (*source).to_string(),
                    bound_name: Some((*name).to_string()),
                },
                _ => Directive::MalformedAwait { arity: words.len() },
            },
            Some(":then") => match words.as_slice() {
                [_, name] => Directive::ThenBind((*name).to_string()),
                _ => Directive::MalformedThen { arity: words.len() },
            },
            Some(":catch") => Directive::CatchMark,
            Some("/await") => Directive::AwaitClose,
            _ => Directive::Content,
        }
    }
}

/// An iteration directive inside a resolved branch.
///
/// # Examples
/// ```text
/// #each user.friends as friend
/// #each order.lines as {product, quantity}, i (product.id)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EachBinding {
    /// The iterated expression, e.g. `user.friends`
    pub source: String,

    /// The loop-variable pattern, e.g. `friend` or `{product, quantity}`
    pub pattern: String,

    /// Optional index binding after the pattern
    pub index: Option<String>,

    /// Optional key expression, without its parentheses
    pub key: Option<String>,
}

impl EachBinding {
    /// Whether the token's first word is the iteration keyword
    pub fn is_iteration(text: &str, keyword: &str) -> bool {
        text.split_whitespace().next() == Some(keyword)
    }

    /// Parses an iteration directive, returning `None` when it is malformed
    pub fn parse(text: &str, keyword: &str) -> Option<EachBinding> {
        let rest = text.trim_start().strip_prefix(keyword)?;
        let at = find_keyword(rest, "as")?;

        let source = rest[..at].trim();
        let mut binding = rest[at + "as".len()..].trim();

        // keyed form: `as item (item.id)`
        let mut key = None;
        if binding.ends_with(')') {
            if let Some(open) = matching_open_paren(binding) {
                key = Some(binding[open + 1..binding.len() - 1].trim().to_string());
                binding = binding[..open].trim_end();
            }
        }

        let mut parts = split_top_level(binding, ',').into_iter();
        let pattern = parts.next().unwrap_or_default();
        let index = parts.next().filter(|name| !name.is_empty());

        if source.is_empty() || pattern.is_empty() {
            return None;
        }

        Some(EachBinding {
            source: source.to_string(),
            pattern,
            index,
            key: key.filter(|key| !key.is_empty()),
        })
    }
}

/// Byte offset of the `(` that pairs with the trailing `)` of `text`
fn matching_open_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (at, ch) in text.char_indices().rev() {
        match ch {
            ')' => depth += 1,
            '(' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(at);
                }
            }
            _ => {}
        }
    }
    None
}
