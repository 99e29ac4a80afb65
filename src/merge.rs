//! Extending a parsed query with extra field paths.
//!
//! The first selection of the document's operation is its *endpoint* field.
//! Merging walks the endpoint's sub-selections one path segment at a time:
//!
//! - an existing field with the segment's name is reused (the first one, if
//!   several share the name)
//! - a missing field is appended after the existing selections
//!
//! Nothing is removed or reordered, and merging the same paths again changes
//! nothing.
//!
//! # Examples
//!
//! ```
//! use await_fields::merge::{merge_fields, parse_document};
//!
//! let document = parse_document("query { user(id: 1) { name } }").unwrap();
//! let merged = merge_fields(&document, &["age", "address.city"]).unwrap();
//!
//! let printed = merged.to_string();
//! let words: Vec<&str> = printed.split_whitespace().collect();
//! assert_eq!(
//!     words.join(" "),
//!     "query { user(id: 1) { name age address { city } } }"
//! );
//! ```

use std::{
    collections::{HashMap, hash_map::Entry},
    fmt,
};

use graphql_parser::{
    Pos,
    query::{
        Definition, Document, Field, OperationDefinition, ParseError, Selection, SelectionSet,
        parse_query,
    },
};

/// Errors raised when a document cannot be merged into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// The query text did not parse
    Parse(String),

    /// The document defines no operation, only fragments
    NoOperation,

    /// The operation's first selection is not a field
    NoEndpointField,
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::Parse(msg) => write!(f, "Invalid query: {}", msg),
            MergeError::NoOperation => write!(f, "Query document contains no operation"),
            MergeError::NoEndpointField => {
                write!(f, "The operation's first selection must be a field")
            }
        }
    }
}

impl std::error::Error for MergeError {}

impl From<ParseError> for MergeError {
    fn from(e: ParseError) -> Self {
        MergeError::Parse(e.to_string())
    }
}

/// Parses query text into a document with owned names
pub fn parse_document(source: &str) -> Result<Document<'_, String>, MergeError> {
    Ok(parse_query::<String>(source)?)
}

/// Returns a copy of `document` whose endpoint field selects every dotted path.
///
/// The input document is left untouched.
pub fn merge_fields<'a, S: AsRef<str>>(
    document: &Document<'a, String>,
    paths: &[S],
) -> Result<Document<'a, String>, MergeError> {
    let mut merged = document.clone();
    let endpoint = endpoint_mut(&mut merged)?;

    for path in paths {
        let segments: Vec<&str> = path
            .as_ref()
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect();
        merge_path(&mut endpoint.selection_set.items, &segments);
    }

    Ok(merged)
}

/// Parses, merges and prints in one step
pub fn merge_query_text<S: AsRef<str>>(source: &str, paths: &[S]) -> Result<String, MergeError> {
    let document = parse_document(source)?;
    Ok(merge_fields(&document, paths)?.to_string())
}

fn endpoint_mut<'d, 'a>(
    document: &'d mut Document<'a, String>,
) -> Result<&'d mut Field<'a, String>, MergeError> {
    let operation = document
        .definitions
        .iter_mut()
        .find_map(|definition| match definition {
            Definition::Operation(operation) => Some(operation),
            Definition::Fragment(_) => None,
        })
        .ok_or(MergeError::NoOperation)?;

    let selection_set = match operation {
        OperationDefinition::SelectionSet(selection_set) => selection_set,
        OperationDefinition::Query(query) => &mut query.selection_set,
        OperationDefinition::Mutation(mutation) => &mut mutation.selection_set,
        OperationDefinition::Subscription(subscription) => &mut subscription.selection_set,
    };

    match selection_set.items.first_mut() {
        Some(Selection::Field(field)) => Ok(field),
        _ => Err(MergeError::NoEndpointField),
    }
}

fn merge_path<'a>(items: &mut Vec<Selection<'a, String>>, segments: &[&str]) {
    let mut level = items;

    for (depth, segment) in segments.iter().enumerate() {
        let existing = level
            .iter()
            .position(|selection| matches!(selection, Selection::Field(field) if field.name == *segment));

        let index = match existing {
            Some(index) => index,
            None => {
                tracing::trace!(%segment, depth, "appending field");
                level.push(Selection::Field(new_field(segment)));
                level.len() - 1
            }
        };

        if depth + 1 == segments.len() {
            break;
        }

        // a leaf descended into simply gains its first child
        let current = level;
        match &mut current[index] {
            Selection::Field(field) => level = &mut field.selection_set.items,
            _ => return,
        }
    }
}

fn new_field<'a>(name: &str) -> Field<'a, String> {
    let position = Pos { line: 0, column: 0 };
    Field {
        position,
        alias: None,
        name: name.to_string(),
        arguments: Vec::new(),
        directives: Vec::new(),
        selection_set: SelectionSet {
            span: (position, position),
            items: Vec::new(),
        },
    }
}

/// Memoized printed documents for one compilation run.
///
/// Entries are keyed by the caller's identity for the document (typically its
/// source text or operation name) together with the merged paths. The cache is
/// owned by the run that creates it and is never shared.
#[derive(Debug, Default)]
pub struct RenderCache {
    rendered: HashMap<(String, Vec<String>), String>,
    hits: usize,
}

impl RenderCache {
    pub fn new() -> Self {
        RenderCache::default()
    }

    /// Returns the printed merge of `paths` into `document`, computing it once
    pub fn render<S: AsRef<str>>(
        &mut self,
        key: &str,
        document: &Document<'_, String>,
        paths: &[S],
    ) -> Result<&str, MergeError> {
        let cache_key = (
            key.to_string(),
            paths.iter().map(|p| p.as_ref().to_string()).collect(),
        );

        match self.rendered.entry(cache_key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                tracing::trace!(%key, "render cache hit");
                Ok(entry.into_mut().as_str())
            }
            Entry::Vacant(entry) => {
                let text = merge_fields(document, paths)?.to_string();
                Ok(entry.insert(text).as_str())
            }
        }
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }

    pub fn clear(&mut self) {
        self.rendered.clear();
        self.hits = 0;
    }
}
