//! Filtering of non-markup regions before lexing.
//!
//! Script and style blocks are full of braces that are not template
//! expressions, so they are cut out before the lexer runs.

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("script/style pattern is valid")
});

/// Removes every `<script>` and `<style>` element, tags included.
///
/// # Examples
///
/// ```
/// use await_fields::markup::strip_script_blocks;
///
/// let text = "<script lang=\"ts\">let q = {};</script><p>{user.name}</p>";
/// assert_eq!(strip_script_blocks(text), "<p>{user.name}</p>");
/// ```
pub fn strip_script_blocks(text: &str) -> Cow<'_, str> {
    SCRIPT_OR_STYLE.replace_all(text, "")
}
