pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod left_factoring;
pub mod left_recursion;
pub mod ll1_parsing_table;
pub mod parse;
pub mod pipeline;
pub mod pretty_print;
pub mod tokenize;
pub mod tokenized;
pub mod trie;
pub use grammar::Grammar;

pub const EPSILON: &str = "ε";
pub const END_MARK: &str = "$";
