pub mod ast;
pub mod cli;
pub mod diagnostic;
pub mod fields;
pub mod infer;
pub mod lexer;
pub mod markup;
pub mod merge;
pub mod output;
pub mod parser;
pub mod path;

pub use ast::{AwaitBlock, Directive, EachBinding, Token};
pub use diagnostic::Diagnostic;
pub use fields::{FieldTree, NodeId};
pub use infer::{Analysis, Analyzer, AnalyzerOptions};
pub use lexer::Lexer;
pub use merge::{MergeError, RenderCache, merge_fields};
pub use output::{to_selection, to_selection_pretty};
pub use parser::Parser;
