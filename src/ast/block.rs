/// One asynchronous-result binding scope.
///
/// Built by the [`Parser`](crate::parser::Parser) and handed straight to field
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwaitBlock {
    /// The awaited expression, e.g. `getUser(1)`
    pub source: String,

    /// Name the resolved value is bound to, from `then <name>` or `:then <name>`
    pub bound_name: Option<String>,

    /// Expression tokens of the resolved branch, in document order
    pub body: Vec<String>,

    /// Set once a `:catch` branch has been seen
    pub has_error_branch: bool,
}

impl AwaitBlock {
    pub fn new(source: impl Into<String>, bound_name: Option<String>) -> Self {
        AwaitBlock {
            source: source.into(),
            bound_name,
            body: Vec::new(),
            has_error_branch: false,
        }
    }

    /// Whether an expression token seen now belongs to the resolved branch
    pub fn accepts_body(&self) -> bool {
        self.bound_name.is_some() && !self.has_error_branch
    }
}
