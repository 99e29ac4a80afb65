/// A run of template text.
///
/// Tokens are produced in document order and never change after lexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Markup between expressions, trimmed of surrounding whitespace
    ///
    /// # Examples
    /// ```text
    /// <h1>
    /// </p>
    /// ```
    Literal(String),

    /// Text strictly between an opening brace and its matching closing brace
    ///
    /// Nested braces and quoted braces are kept verbatim.
    ///
    /// # Examples
    /// ```text
    /// {user.name}          → user.name
    /// {#await q then r}    → #await q then r
    /// {fmt({a: "}"})}      → fmt({a: "}"})
    /// ```
    Expression(String),
}

impl Token {
    pub fn text(&self) -> &str {
        match self {
            Token::Literal(text) | Token::Expression(text) => text,
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Token::Expression(_))
    }

    /// Returns the expression body, or `None` for literal markup
    pub fn into_expression(self) -> Option<String> {
        match self {
            Token::Expression(text) => Some(text),
            Token::Literal(_) => None,
        }
    }
}
