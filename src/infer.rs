use indexmap::IndexMap;

use crate::{
    ast::{AwaitBlock, EachBinding},
    diagnostic::{Diagnostic, report},
    fields::{FieldTree, NodeId},
    lexer::Lexer,
    markup::strip_script_blocks,
    output::to_selection,
    parser::Parser,
    path::{ObjectEntry, Pattern, find_identifier, scan_access},
};

/// Settings for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// First word of an iteration directive
    pub iteration_keyword: String,

    /// Remove `<script>` and `<style>` regions before lexing
    pub strip_script_blocks: bool,

    /// Treat a trailing `name(` in an access chain as a method call
    pub drop_method_calls: bool,

    /// Deepest field recorded below an awaited value; longer paths are cut
    pub max_field_depth: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        AnalyzerOptions {
            iteration_keyword: "#each".to_string(),
            strip_script_blocks: true,
            drop_method_calls: true,
            max_field_depth: 64,
        }
    }
}

/// Field usage inferred from one template.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Awaited source expression → fields read from its result, in the order
    /// blocks closed. A repeated source expression keeps its first position
    /// and the last block's fields.
    pub fields: IndexMap<String, FieldTree>,

    /// Constructs that were skipped
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    /// Source expression → rendered selection body
    pub fn selections(&self) -> IndexMap<String, String> {
        self.fields
            .iter()
            .map(|(source, tree)| (source.clone(), to_selection(tree)))
            .collect()
    }

    pub fn selection(&self, source: &str) -> Option<String> {
        self.fields.get(source).map(to_selection)
    }
}

/// Runs the whole pipeline: lexing, block extraction and field resolution.
///
/// # Examples
///
/// ```
/// use await_fields::Analyzer;
///
/// let analysis = Analyzer::new().analyze(
///     "{#await getUser(1) then user}<p>{user.name}</p>{/await}",
/// );
/// assert_eq!(analysis.selection("getUser(1)").as_deref(), Some("{ name }"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    options: AnalyzerOptions,
}

impl Analyzer {
    pub fn new() -> Self {
        Analyzer::default()
    }

    pub fn with_options(options: AnalyzerOptions) -> Self {
        Analyzer { options }
    }

    pub fn analyze(&self, text: &str) -> Analysis {
        let markup = if self.options.strip_script_blocks {
            strip_script_blocks(text)
        } else {
            text.into()
        };

        let expressions = Lexer::new(&markup).filter_map(|token| token.into_expression());
        let mut parser = Parser::new(expressions);
        let blocks = parser.parse_blocks();
        let mut analysis = Analysis {
            fields: IndexMap::new(),
            diagnostics: parser.into_diagnostics(),
        };

        for block in &blocks {
            if let Some(tree) = self.resolve_block(block, &mut analysis.diagnostics) {
                analysis.fields.insert(block.source.clone(), tree);
            }
        }

        analysis
    }

    /// Resolves the fields read inside one block.
    ///
    /// Returns `None` for blocks whose result is never bound to a name.
    pub fn resolve_block(
        &self,
        block: &AwaitBlock,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<FieldTree> {
        let bound_name = block.bound_name.as_ref()?;
        let mut resolver = BlockResolver::new(&self.options, diagnostics);
        let root = resolver.tree.root();
        resolver.aliases.insert(bound_name.clone(), root);

        for token in &block.body {
            resolver.resolve_token(token);
        }

        tracing::debug!(
            source = %block.source,
            aliases = resolver.aliases.len(),
            selection = %to_selection(&resolver.tree),
            "resolved await block"
        );
        Some(resolver.tree)
    }
}

/// Field tree and alias table for a single block.
struct BlockResolver<'a> {
    tree: FieldTree,
    /// Alias name → node it stands for. Iteration order breaks ties.
    aliases: IndexMap<String, NodeId>,
    options: &'a AnalyzerOptions,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> BlockResolver<'a> {
    fn new(options: &'a AnalyzerOptions, diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        BlockResolver {
            tree: FieldTree::new(),
            aliases: IndexMap::new(),
            options,
            diagnostics,
        }
    }

    fn resolve_token(&mut self, token: &str) {
        let options = self.options;
        let keyword = options.iteration_keyword.as_str();
        if EachBinding::is_iteration(token, keyword) {
            match EachBinding::parse(token, keyword) {
                Some(binding) => {
                    self.bind_each(&binding);
                    return;
                }
                None => report(
                    self.diagnostics,
                    Diagnostic::MalformedEach {
                        token: token.to_string(),
                    },
                ),
            }
        }
        self.record_accesses(token);
    }

    /// Earliest whole-identifier alias occurrence at or after `from`
    fn find_alias(&self, text: &str, from: usize) -> Option<(usize, usize, NodeId)> {
        let mut best: Option<(usize, usize, NodeId)> = None;
        for (name, &node) in &self.aliases {
            if let Some(at) = find_identifier(text, name, from) {
                if best.is_none_or(|(best_at, _, _)| at < best_at) {
                    best = Some((at, name.len(), node));
                }
            }
        }
        best
    }

    /// Records every alias access chain in `text`
    fn record_accesses(&mut self, text: &str) {
        let mut cursor = 0;
        while let Some((at, len, node)) = self.find_alias(text, cursor) {
            let access = scan_access(text, at + len, self.options.drop_method_calls);
            tracing::trace!(segments = ?access.segments, "field access");
            self.insert_access(node, &access.segments);
            cursor = access.end.max(at + len);
        }
    }

    /// Resolves the iterated field and binds the loop pattern to its elements.
    ///
    /// List elements share the list field's node: selections do not
    /// distinguish a list from its items.
    fn bind_each(&mut self, binding: &EachBinding) {
        let source = binding.source.as_str();
        let Some((at, len, node)) = self.find_alias(source, 0) else {
            tracing::trace!(%source, "iteration source reads no tracked alias");
            return;
        };

        let access = scan_access(source, at + len, self.options.drop_method_calls);
        let element = self.insert_access(node, &access.segments);

        // other aliases read inside the source expression, e.g. filter arguments
        self.record_accesses(&source[access.end..]);

        let pattern = Pattern::parse(&binding.pattern);
        self.bind_pattern(&pattern, element);

        if let Some(key) = &binding.key {
            self.record_accesses(key);
        }
    }

    /// Inserts `segments` below `node`, keeping at most `max_field_depth`
    /// levels below the root
    fn insert_access(&mut self, node: NodeId, segments: &[String]) -> NodeId {
        let limit = self.options.max_field_depth;
        let room = limit.saturating_sub(self.tree.depth(node));
        if segments.len() <= room {
            return self.tree.insert_path(node, segments);
        }

        report(
            self.diagnostics,
            Diagnostic::DepthLimit {
                path: segments.join("."),
                limit,
            },
        );
        self.tree.insert_path(node, &segments[..room])
    }

    fn bind_pattern(&mut self, pattern: &Pattern, node: NodeId) {
        match pattern {
            Pattern::Binding(name) | Pattern::Rest(name) => {
                self.aliases.insert(name.clone(), node);
            }
            Pattern::Object(entries) => {
                for entry in entries {
                    match entry {
                        ObjectEntry::Field { key, .. }
                            if self.tree.depth(node) >= self.options.max_field_depth =>
                        {
                            report(
                                self.diagnostics,
                                Diagnostic::DepthLimit {
                                    path: key.clone(),
                                    limit: self.options.max_field_depth,
                                },
                            );
                        }
                        ObjectEntry::Field { key, value } => {
                            let child = self.tree.child(node, key);
                            self.bind_pattern(value, child);
                        }
                        ObjectEntry::Rest(name) => {
                            self.aliases.insert(name.clone(), node);
                        }
                        ObjectEntry::Unsupported(element) => report(
                            self.diagnostics,
                            Diagnostic::UnsupportedPattern {
                                element: element.clone(),
                            },
                        ),
                    }
                }
            }
            Pattern::Array(elements) => {
                for element in elements {
                    self.bind_pattern(element, node);
                }
            }
            Pattern::Unsupported(element) => report(
                self.diagnostics,
                Diagnostic::UnsupportedPattern {
                    element: element.clone(),
                },
            ),
        }
    }
}
