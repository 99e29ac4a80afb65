use crate::{
    ast::{AwaitBlock, Directive},
    diagnostic::{Diagnostic, report},
};

/// One level of await nesting.
#[derive(Debug)]
enum Frame {
    /// A block opened by a well-formed `#await`
    Open(AwaitBlock),

    /// Opened by a malformed `#await`. It swallows tokens until its matching
    /// `/await` so terminators stay balanced.
    Void,
}

/// Reconstructs [`AwaitBlock`]s from a sequence of expression tokens.
///
/// Nesting is tracked on an explicit stack. A nested `#await` pushes a new
/// frame, and the inner block collects the tokens up to its own `/await`
/// without sharing them with the enclosing block. Blocks are emitted when
/// they close, so inner blocks precede the blocks that contain them.
pub struct Parser {
    tokens: Vec<String>,
    position: usize,
    stack: Vec<Frame>,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Parser {
            tokens: tokens.into_iter().map(Into::into).collect(),
            position: 0,
            stack: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn current_token(&self) -> Option<&str> {
        self.tokens.get(self.position).map(String::as_str)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn innermost(&mut self) -> Option<&mut AwaitBlock> {
        match self.stack.last_mut() {
            Some(Frame::Open(block)) => Some(block),
            _ => None,
        }
    }

    /// Parse every block in the token stream
    pub fn parse_blocks(&mut self) -> Vec<AwaitBlock> {
        let mut blocks = Vec::new();

        while let Some(token) = self.current_token() {
            let token = token.to_string();
            match Directive::classify(&token) {
                Directive::AwaitOpen { source, bound_name } => {
                    tracing::trace!(%source, depth = self.stack.len(), "await-open");
                    self.stack.push(Frame::Open(AwaitBlock::new(source, bound_name)));
                }
                Directive::MalformedAwait { arity } => {
                    report(
                        &mut self.diagnostics,
                        Diagnostic::MalformedAwait { token, arity },
                    );
                    self.stack.push(Frame::Void);
                }
                Directive::ThenBind(name) => {
                    if let Some(block) = self.innermost() {
                        if block.bound_name.is_none() {
                            tracing::trace!(%name, "then-bind");
                            block.bound_name = Some(name);
                        }
                    }
                }
                Directive::MalformedThen { arity } => {
                    report(
                        &mut self.diagnostics,
                        Diagnostic::MalformedThen { token, arity },
                    );
                }
                Directive::CatchMark => {
                    if let Some(block) = self.innermost() {
                        block.has_error_branch = true;
                    }
                }
                Directive::AwaitClose => match self.stack.pop() {
                    Some(Frame::Open(block)) => {
                        tracing::debug!(
                            source = %block.source,
                            bound_name = ?block.bound_name,
                            body_tokens = block.body.len(),
                            "await block closed"
                        );
                        blocks.push(block);
                    }
                    Some(Frame::Void) => {}
                    None => report(&mut self.diagnostics, Diagnostic::UnmatchedClose),
                },
                Directive::Content => {
                    if let Some(block) = self.innermost() {
                        if block.accepts_body() {
                            block.body.push(token);
                        }
                    }
                }
            }
            self.advance();
        }

        for frame in std::mem::take(&mut self.stack) {
            if let Frame::Open(block) = frame {
                report(
                    &mut self.diagnostics,
                    Diagnostic::UnclosedBlock {
                        source: block.source,
                    },
                );
            }
        }

        blocks
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
