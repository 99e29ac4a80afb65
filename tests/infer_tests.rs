// tests/infer_tests.rs

use await_fields::diagnostic::Diagnostic;
use await_fields::{Analysis, Analyzer, AnalyzerOptions};

fn analyze(template: &str) -> Analysis {
    Analyzer::new().analyze(template)
}

/// Wraps `body` in a `getUser()` block bound to `user` and returns its selection
fn user_selection(body: &str) -> String {
    let template = format!("{{#await getUser() then user}}{}{{/await}}", body);
    analyze(&template)
        .selection("getUser()")
        .expect("block should resolve")
}

// ============================================================================
// Basic Resolution
// ============================================================================

#[test]
fn test_nested_field_paths() {
    let analysis = analyze(
        "{#await getUser(1) then user}\
           <h1>{user.name}</h1>\
           <p>{user.address.city}</p>\
         {/await}",
    );

    let tree = &analysis.fields["getUser(1)"];
    let name = tree.lookup("name").unwrap();
    let address = tree.lookup("address").unwrap();
    let city = tree.lookup("address.city").unwrap();

    assert!(tree.is_leaf(name));
    assert!(!tree.is_leaf(address));
    assert!(tree.is_leaf(city));
    assert_eq!(tree.leaf_paths(), ["name", "address.city"]);
    assert_eq!(analysis.selection("getUser(1)").as_deref(), Some("{ name address { city } }"));
    assert!(analysis.diagnostics.is_empty());
}

#[test]
fn test_then_branch_form() {
    let analysis = analyze(
        "{#await getUser()}<p>loading</p>{:then data}{data.id}{:catch e}{e.message}{/await}",
    );
    assert_eq!(analysis.selection("getUser()").as_deref(), Some("{ id }"));
}

#[test]
fn test_repeated_access_is_idempotent() {
    assert_eq!(user_selection("{user.name}{user.name}<b>{user.name}</b>"), "{ name }");
}

#[test]
fn test_several_accesses_in_one_expression() {
    assert_eq!(
        user_selection("{user.first + ' ' + user.last}"),
        "{ first last }"
    );
    assert_eq!(
        user_selection("{user.a.x ?? user.b}{user.a.y}"),
        "{ a { x y } b }"
    );
}

#[test]
fn test_attribute_and_call_arguments() {
    assert_eq!(
        user_selection("<img src={user.avatar.url} alt={format(user.name, user.locale)}>"),
        "{ avatar { url } name locale }"
    );
}

#[test]
fn test_bare_alias_records_nothing() {
    let analysis = analyze("{#await getUser() then user}{JSON.stringify(user)}{/await}");

    let tree = &analysis.fields["getUser()"];
    assert!(tree.is_empty());
    assert_eq!(analysis.selection("getUser()").as_deref(), Some("{}"));
}

// ============================================================================
// Access Chain Forms
// ============================================================================

#[test]
fn test_optional_chaining() {
    assert_eq!(user_selection("{user?.profile?.bio}"), "{ profile { bio } }");
}

#[test]
fn test_computed_string_keys() {
    assert_eq!(
        user_selection("{user['first-name']}{user[\"meta\"].created}"),
        "{ first-name meta { created } }"
    );
}

#[test]
fn test_index_access_is_transparent() {
    assert_eq!(
        user_selection("{user.friends[0].name}{user.friends[i].id}"),
        "{ friends { name id } }"
    );
}

#[test]
fn test_method_calls_are_dropped() {
    assert_eq!(
        user_selection("{user.name.toUpperCase()}{user.tags.join(', ')}"),
        "{ name tags }"
    );
}

#[test]
fn test_method_calls_kept_when_configured() {
    let analyzer = Analyzer::with_options(AnalyzerOptions {
        drop_method_calls: false,
        ..AnalyzerOptions::default()
    });
    let analysis =
        analyzer.analyze("{#await getUser() then user}{user.name.toUpperCase()}{/await}");

    assert_eq!(
        analysis.selection("getUser()").as_deref(),
        Some("{ name { toUpperCase } }")
    );
}

#[test]
fn test_alias_must_be_a_whole_identifier() {
    assert_eq!(
        user_selection("{username.length}{other.user.name}{superuser.id}{$user}"),
        "{}"
    );
}

// ============================================================================
// Iteration and Destructuring
// ============================================================================

#[test]
fn test_each_with_plain_binding() {
    assert_eq!(
        user_selection("{#each user.friends as friend}<li>{friend.name}</li>{/each}"),
        "{ friends { name } }"
    );
}

#[test]
fn test_each_destructured_siblings() {
    let analysis = analyze(
        "{#await getOrder() then order}\
           {#each order.items as {a,b}}{a.x}{b.y}{/each}\
         {/await}",
    );

    let tree = &analysis.fields["getOrder()"];
    let items = tree.lookup("items").unwrap();
    let a = tree.lookup("items.a").unwrap();
    let b = tree.lookup("items.b").unwrap();

    assert_ne!(a, b);
    assert_eq!(tree.children(items).count(), 2);
    assert!(tree.lookup("items.a.x").is_some());
    assert!(tree.lookup("items.b.y").is_some());
    assert_eq!(
        analysis.selection("getOrder()").as_deref(),
        Some("{ items { a { x } b { y } } }")
    );
}

#[test]
fn test_each_nested_and_renamed_destructuring() {
    assert_eq!(
        user_selection(
            "{#each user.posts as {author: {name}, title: heading}}{name.first}{heading}{/each}"
        ),
        "{ posts { author { name { first } } title } }"
    );
}

#[test]
fn test_each_defaults_and_rest() {
    assert_eq!(
        user_selection("{#each user.items as {id, count = 0, ...rest}}{rest.price}{/each}"),
        "{ items { id count price } }"
    );
}

#[test]
fn test_each_array_pattern() {
    assert_eq!(
        user_selection("{#each user.matrix as [first, ...others]}{first.x}{others.y}{/each}"),
        "{ matrix { x y } }"
    );
}

#[test]
fn test_each_index_and_key() {
    assert_eq!(
        user_selection("{#each user.friends as friend, i (friend.id)}{i}: {friend.name}{/each}"),
        "{ friends { id name } }"
    );
}

#[test]
fn test_each_key_with_call() {
    assert_eq!(
        user_selection("{#each user.friends as friend, i (key(friend.id))}{friend.name}{/each}"),
        "{ friends { id name } }"
    );
}

#[test]
fn test_nested_each_loops() {
    assert_eq!(
        user_selection(
            "{#each user.groups as group}{group.title}\
               {#each group.members as {email}}{email}{/each}\
             {/each}"
        ),
        "{ groups { title members { email } } }"
    );
}

#[test]
fn test_each_source_with_call() {
    assert_eq!(
        user_selection("{#each sortBy(user.posts, user.order) as post}{post.title}{/each}"),
        "{ posts { title } order }"
    );
}

#[test]
fn test_aliases_share_nodes() {
    assert_eq!(
        user_selection(
            "{#each user.items as item}{item.a}{/each}\
             {#each user.items as other}{other.b}{/each}"
        ),
        "{ items { a b } }"
    );
}

#[test]
fn test_each_over_untracked_value() {
    let analysis = analyze(
        "{#await getUser() then user}{#each [1, 2, 3] as n}{n}{/each}{user.id}{/await}",
    );
    assert_eq!(analysis.selection("getUser()").as_deref(), Some("{ id }"));
    assert!(analysis.diagnostics.is_empty());
}

#[test]
fn test_malformed_each_still_records_source() {
    let analysis = analyze("{#await getUser() then user}{#each user.items}{/await}");

    assert_eq!(analysis.selection("getUser()").as_deref(), Some("{ items }"));
    assert_eq!(
        analysis.diagnostics,
        vec![Diagnostic::MalformedEach {
            token: "#each user.items".to_string()
        }]
    );
}

#[test]
fn test_unsupported_pattern_element() {
    let analysis = analyze(
        "{#await getUser() then user}{#each user.items as {a, 1bad}}{a.x}{/each}{/await}",
    );

    assert_eq!(analysis.selection("getUser()").as_deref(), Some("{ items { a { x } } }"));
    assert_eq!(
        analysis.diagnostics,
        vec![Diagnostic::UnsupportedPattern {
            element: "1bad".to_string()
        }]
    );
}

#[test]
fn test_custom_iteration_keyword() {
    let analyzer = Analyzer::with_options(AnalyzerOptions {
        iteration_keyword: "#for".to_string(),
        ..AnalyzerOptions::default()
    });
    let analysis = analyzer
        .analyze("{#await getUser() then user}{#for user.pets as pet}{pet.name}{/for}{/await}");

    assert_eq!(analysis.selection("getUser()").as_deref(), Some("{ pets { name } }"));
}

// ============================================================================
// Depth Limit
// ============================================================================

fn long_chain_template(length: usize) -> String {
    format!("{{#await q then u}}{{u{}}}{{/await}}", ".a".repeat(length))
}

#[test]
fn test_long_chain_is_cut_at_depth_limit() {
    let analysis = analyze(&long_chain_template(200_000));

    let selection = analysis.selection("q").unwrap();
    assert_eq!(selection.matches('{').count(), 64);
    assert_eq!(selection.matches('}').count(), 64);
    assert_eq!(
        analysis.diagnostics,
        vec![Diagnostic::DepthLimit {
            path: vec!["a"; 200_000].join("."),
            limit: 64
        }]
    );
}

#[test]
fn test_long_chain_without_limit() {
    let analyzer = Analyzer::with_options(AnalyzerOptions {
        max_field_depth: usize::MAX,
        ..AnalyzerOptions::default()
    });
    let analysis = analyzer.analyze(&long_chain_template(200_000));

    let selections = analysis.selections();
    let selection = &selections["q"];
    assert!(selection.starts_with("{ a { a { a {"));
    assert!(selection.ends_with(&format!("{{ a{}", " }".repeat(200_000))));
    assert_eq!(selection.matches('{').count(), 200_000);
    assert!(analysis.diagnostics.is_empty());
}

#[test]
fn test_depth_limit_on_access_chain() {
    let analyzer = Analyzer::with_options(AnalyzerOptions {
        max_field_depth: 2,
        ..AnalyzerOptions::default()
    });
    let analysis = analyzer.analyze("{#await q then u}{u.a.b.c}{u.d}{/await}");

    assert_eq!(analysis.selection("q").as_deref(), Some("{ a { b } d }"));
    assert_eq!(
        analysis.diagnostics,
        vec![Diagnostic::DepthLimit {
            path: "a.b.c".to_string(),
            limit: 2
        }]
    );
}

#[test]
fn test_depth_limit_through_aliases() {
    let analyzer = Analyzer::with_options(AnalyzerOptions {
        max_field_depth: 1,
        ..AnalyzerOptions::default()
    });
    let analysis = analyzer
        .analyze("{#await q then u}{#each u.items as {a}}{a.x}{/each}{#each u.tags as t}{t.id}{/each}{/await}");

    assert_eq!(analysis.selection("q").as_deref(), Some("{ items tags }"));
    assert_eq!(
        analysis.diagnostics,
        vec![
            Diagnostic::DepthLimit {
                path: "a".to_string(),
                limit: 1
            },
            Diagnostic::DepthLimit {
                path: "id".to_string(),
                limit: 1
            },
        ]
    );
}

// ============================================================================
// Blocks
// ============================================================================

#[test]
fn test_nested_blocks_do_not_leak() {
    let analysis = analyze(
        "{#await getUser() then user}{user.name}\
           {#await getPosts() then posts}{posts.title}{user.email}{/await}\
           {user.age}\
         {/await}",
    );

    let sources: Vec<&str> = analysis.fields.keys().map(String::as_str).collect();
    assert_eq!(sources, ["getPosts()", "getUser()"]);
    assert_eq!(analysis.selection("getPosts()").as_deref(), Some("{ title }"));
    assert_eq!(analysis.selection("getUser()").as_deref(), Some("{ name age }"));
}

#[test]
fn test_malformed_await_produces_no_entry() {
    let analysis = analyze("{#await a b c}{a.x}{/await}");

    assert!(analysis.fields.is_empty());
    assert_eq!(analysis.diagnostics.len(), 1);
}

#[test]
fn test_unnamed_block_produces_no_entry() {
    let analysis = analyze("{#await ping()}<p>waiting</p>{/await}");
    assert!(analysis.fields.is_empty());
}

#[test]
fn test_duplicate_source_last_write_wins() {
    let analysis = analyze("{#await q then a}{a.x}{/await}{#await q then b}{b.y}{/await}");

    assert_eq!(analysis.fields.len(), 1);
    assert_eq!(analysis.selection("q").as_deref(), Some("{ y }"));
}

#[test]
fn test_selections_in_emission_order() {
    let analysis = analyze(
        "{#await first() then a}{a.one}{/await}\
         {#await second() then b}{b.two}{/await}",
    );

    let selections: Vec<(String, String)> = analysis.selections().into_iter().collect();
    assert_eq!(
        selections,
        vec![
            ("first()".to_string(), "{ one }".to_string()),
            ("second()".to_string(), "{ two }".to_string()),
        ]
    );
}

// ============================================================================
// Script Regions
// ============================================================================

#[test]
fn test_script_and_style_regions_are_skipped() {
    let analysis = analyze(
        "<script lang=\"ts\">\n\
           const fake = '{#await nope then n}{n.secret}{/await}';\n\
           const opts = { a: { b: 1 } };\n\
         </script>\n\
         <style>p { color: red; }</style>\n\
         {#await getUser() then user}{user.name}{/await}",
    );

    let sources: Vec<&str> = analysis.fields.keys().map(String::as_str).collect();
    assert_eq!(sources, ["getUser()"]);
}

#[test]
fn test_script_regions_kept_when_configured() {
    let analyzer = Analyzer::with_options(AnalyzerOptions {
        strip_script_blocks: false,
        ..AnalyzerOptions::default()
    });
    let analysis = analyzer.analyze(
        "<script>const t = `{#await nope then n}{n.secret}{/await}`;</script>",
    );

    assert_eq!(analysis.selection("nope").as_deref(), Some("{ secret }"));
}
