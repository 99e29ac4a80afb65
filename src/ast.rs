//! # Template syntax consumed by the field inference engine
//!
//! The engine never parses the host template language in full. It only needs
//! enough structure to find awaited query results and the expressions that read
//! from them:
//!
//! - **[tokens]** - Literal runs and brace-delimited expression runs produced by the lexer
//! - **[directive]** - The directive productions recognized inside expressions
//! - **[block]** - Await blocks reconstructed by the parser
//!
//! ## Quick Start
//!
//! ```text
//! {#await getUser(1) then user}
//!   <h1>{user.name}</h1>
//!   {#each user.friends as {name, avatar}}
//!     <img alt={name} src={avatar.url} />
//!   {/each}
//! {:catch error}
//!   <p>{error.message}</p>
//! {/await}
//! ```
//!
//! ## Directive Vocabulary
//!
//! - **`#await <expr>`** / **`#await <expr> then <name>`** - open a block
//! - **`:then <name>`** - bind the resolved value when the open form had no name
//! - **`:catch`** - start the rejection branch; nothing after it is analyzed
//! - **`/await`** - close the innermost open block
//! - **`#each <expr> as <pattern>`** - iterate a field, binding the loop pattern
//!
//! Directive arity is counted in whitespace-separated words, so the source
//! expression of an `#await` must not contain whitespace.
pub mod block;
pub mod directive;
pub mod tokens;

pub use block::AwaitBlock;
pub use directive::{Directive, EachBinding};
pub use tokens::Token;
