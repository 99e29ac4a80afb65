// tests/merge_tests.rs

use await_fields::merge::{
    MergeError, RenderCache, merge_fields, merge_query_text, parse_document,
};

/// Collapses printer whitespace so expectations can be written on one line
fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn merge(query: &str, paths: &[&str]) -> String {
    squash(&merge_query_text(query, paths).unwrap())
}

// ============================================================================
// Appending
// ============================================================================

#[test]
fn test_append_after_existing() {
    assert_eq!(merge("query { user { name } }", &["age"]), "query { user { name age } }");
}

#[test]
fn test_existing_field_untouched() {
    assert_eq!(merge("query { user { name age } }", &["name"]), "query { user { name age } }");
}

#[test]
fn test_nested_path() {
    assert_eq!(
        merge("{ user { profile { id } } }", &["profile.email"]),
        "{ user { profile { id email } } }"
    );
}

#[test]
fn test_new_chain() {
    assert_eq!(
        merge("query { user { id } }", &["address.geo.lat", "address.geo.lng", "address.city"]),
        "query { user { id address { geo { lat lng } city } } }"
    );
}

#[test]
fn test_leaf_gains_selection() {
    assert_eq!(
        merge("query { user { profile } }", &["profile.email"]),
        "query { user { profile { email } } }"
    );
}

#[test]
fn test_endpoint_without_selection() {
    assert_eq!(merge("query { viewer }", &["id", "login"]), "query { viewer { id login } }");
}

#[test]
fn test_paths_applied_in_order() {
    assert_eq!(merge("query { user { id } }", &["b", "a", "c"]), "query { user { id b a c } }");
}

#[test]
fn test_empty_segments_ignored() {
    assert_eq!(merge("query { user { id } }", &["", "a..b", "."]), "query { user { id a { b } } }");
}

// ============================================================================
// Preservation
// ============================================================================

#[test]
fn test_arguments_variables_and_name_preserved() {
    assert_eq!(
        merge(
            "query GetUser($id: ID!) { user(id: $id) { name } }",
            &["name", "email"]
        ),
        "query GetUser($id: ID!) { user(id: $id) { name email } }"
    );
}

#[test]
fn test_match_is_by_field_name_not_alias() {
    assert_eq!(
        merge("query { user { displayName: name } }", &["name"]),
        "query { user { displayName: name } }"
    );
}

#[test]
fn test_first_duplicate_sibling_wins() {
    assert_eq!(
        merge(
            "query { user { friends(first: 1) { id } friends(first: 2) { id } } }",
            &["friends.name"]
        ),
        "query { user { friends(first: 1) { id name } friends(first: 2) { id } } }"
    );
}

#[test]
fn test_only_endpoint_is_extended() {
    assert_eq!(
        merge("query { user { id } settings { theme } }", &["theme"]),
        "query { user { id theme } settings { theme } }"
    );
}

#[test]
fn test_mutation() {
    assert_eq!(
        merge("mutation { createUser(name: \"ada\") { id } }", &["createdAt"]),
        "mutation { createUser(name: \"ada\") { id createdAt } }"
    );
}

#[test]
fn test_input_document_is_not_modified() {
    let document = parse_document("query { user { name } }").unwrap();
    let before = document.to_string();

    let merged = merge_fields(&document, &["age"]).unwrap();

    assert_eq!(document.to_string(), before);
    assert_ne!(merged.to_string(), before);
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_merge_twice_is_byte_identical() {
    let document = parse_document("query { user { id } }").unwrap();

    let once = merge_fields(&document, &["profile.email"]).unwrap();
    let twice = merge_fields(&once, &["profile.email"]).unwrap();

    assert_eq!(once.to_string(), twice.to_string());
    assert_eq!(once, twice);
}

#[test]
fn test_merge_existing_paths_is_noop() {
    let document = parse_document("query { user { id profile { email } } }").unwrap();
    let merged = merge_fields(&document, &["id", "profile", "profile.email"]).unwrap();
    assert_eq!(merged, document);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_no_operation() {
    let document = parse_document("fragment F on User { id }").unwrap();
    assert_eq!(merge_fields(&document, &["name"]).unwrap_err(), MergeError::NoOperation);
}

#[test]
fn test_no_endpoint_field() {
    let document = parse_document("query { ...F } fragment F on Query { id }").unwrap();
    assert_eq!(
        merge_fields(&document, &["name"]).unwrap_err(),
        MergeError::NoEndpointField
    );
}

#[test]
fn test_parse_error() {
    let err = merge_query_text("query {", &["name"]).unwrap_err();
    assert!(matches!(err, MergeError::Parse(_)));
    assert!(err.to_string().starts_with("Invalid query: "));
}

// ============================================================================
// Render Cache
// ============================================================================

#[test]
fn test_render_cache_memoizes() {
    let document = parse_document("query { user { id } }").unwrap();
    let mut cache = RenderCache::new();

    let first = cache.render("GetUser", &document, &["name"]).unwrap().to_string();
    let second = cache.render("GetUser", &document, &["name"]).unwrap().to_string();

    assert_eq!(first, second);
    assert_eq!(squash(&first), "query { user { id name } }");
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.hits(), 1);
}

#[test]
fn test_render_cache_keys_on_paths() {
    let document = parse_document("query { user { id } }").unwrap();
    let mut cache = RenderCache::new();

    cache.render("GetUser", &document, &["name"]).unwrap();
    let other = cache.render("GetUser", &document, &["email"]).unwrap().to_string();

    assert_eq!(squash(&other), "query { user { id email } }");
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.hits(), 0);
}

#[test]
fn test_render_cache_clear() {
    let document = parse_document("query { user { id } }").unwrap();
    let mut cache = RenderCache::new();

    cache.render("GetUser", &document, &["name"]).unwrap();
    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.hits(), 0);
}

#[test]
fn test_render_cache_does_not_store_errors() {
    let document = parse_document("fragment F on User { id }").unwrap();
    let mut cache = RenderCache::new();

    assert!(cache.render("F", &document, &["name"]).is_err());
    assert!(cache.is_empty());
}
