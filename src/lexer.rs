use crate::ast::Token;

/// Quote state while scanning an expression body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Double,
    Single,
}

/// Splits template text into literal and expression [`Token`]s.
///
/// The lexer is iterative: each call to [`Lexer::next_token`] consumes at most
/// one literal run and one brace group, so nesting depth never grows the call
/// stack.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    pending: Option<String>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            pending: None,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.input[start..end].iter().collect()
    }

    /// Index of the next opening brace not preceded by a backslash
    fn find_open_brace(&self) -> Option<usize> {
        (self.position..self.input.len()).find(|&i| {
            self.input[i] == '{' && (i == 0 || self.input[i - 1] != '\\')
        })
    }

    /// Reads a brace group body. The cursor sits just past the opening brace.
    ///
    /// Braces inside single or double quotes do not count towards nesting. A
    /// group left open at end of input yields everything after the brace.
    fn read_expression(&mut self) -> String {
        let start = self.position;
        let mut depth = 1usize;
        let mut quote = Quote::None;

        while let Some(ch) = self.current_char() {
            match (ch, quote) {
                ('"', Quote::None) => quote = Quote::Double,
                ('"', Quote::Double) => quote = Quote::None,
                ('\'', Quote::None) => quote = Quote::Single,
                ('\'', Quote::Single) => quote = Quote::None,
                ('{', Quote::None) => depth += 1,
                ('}', Quote::None) => {
                    depth -= 1;
                    if depth == 0 {
                        let body = self.slice(start, self.position);
                        self.advance(); // consume closing brace
                        return body;
                    }
                }
                _ => {}
            }
            self.advance();
        }

        tracing::debug!(offset = start, "unbalanced braces, expression runs to end of input");
        self.slice(start, self.input.len())
    }

    pub fn next_token(&mut self) -> Option<Token> {
        if let Some(body) = self.pending.take() {
            return Some(Token::Expression(body));
        }

        if self.position >= self.input.len() {
            return None;
        }
        let start = self.position;

        let Some(open) = self.find_open_brace() else {
            self.position = self.input.len();
            let literal = self.slice(start, self.input.len());
            let literal = literal.trim();
            return (!literal.is_empty()).then(|| Token::Literal(literal.to_string()));
        };

        let literal = self.slice(start, open);
        self.position = open + 1;
        let body = self.read_expression();
        tracing::trace!(expression = %body, "lexed expression");

        let literal = literal.trim();
        if literal.is_empty() {
            return Some(Token::Expression(body));
        }
        self.pending = Some(body);
        Some(Token::Literal(literal.to_string()))
    }

    /// Lexes the whole input
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

#[test]
fn test_literal_and_expression() {
    let mut lexer = Lexer::new("<h1>{user.name}</h1>");
    assert_eq!(lexer.next_token(), Some(Token::Literal("<h1>".to_string())));
    assert_eq!(lexer.next_token(), Some(Token::Expression("user.name".to_string())));
    assert_eq!(lexer.next_token(), Some(Token::Literal("</h1>".to_string())));
    assert_eq!(lexer.next_token(), None);
}

#[test]
fn test_quoted_braces() {
    let mut lexer = Lexer::new("{a {\"x}\"} b}");
    assert_eq!(lexer.next_token(), Some(Token::Expression("a {\"x}\"} b".to_string())));
    assert_eq!(lexer.next_token(), None);
}

#[test]
fn test_iterator_collect() {
    let tokens: Vec<Token> = Lexer::new("<p>{a.b}</p>{c}").collect();
    assert_eq!(
        tokens,
        vec![
            Token::Literal("<p>".to_string()),
            Token::Expression("a.b".to_string()),
            Token::Literal("</p>".to_string()),
            Token::Expression("c".to_string()),
        ]
    );
}
