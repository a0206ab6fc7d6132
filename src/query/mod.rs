//! Query Module
//!
//! Decides whether a document matches a query object.
//!
//! ## Query Shape
//! ```text
//! {
//!   "$or":  [ <query>, ... ],          at least one must match
//!   "$and": [ <query>, ... ],          all must match
//!   "<field>": <literal>,              implicit $eq
//!   "<field>": { "$gt": 18, ... }      every operator must hold
//! }
//! ```
//!
//! ## Operators
//! - `$eq`   - equality, numbers compared by value (1 == 1.0)
//! - `$gt`   - numeric greater-than, false for non-numbers
//! - `$lt`   - numeric less-than, false for non-numbers
//! - `$in`   - equal to any element of an array operand
//! - `$like` - SQL LIKE (`%` any run, `_` one char), anchored, case-insensitive
//!
//! Evaluation is fail-closed: unknown operators and malformed operands make
//! the condition false rather than raising an error.

mod evaluator;
mod operator;
mod pattern;

pub use evaluator::{matches, values_equal};
pub use operator::Operator;
pub use pattern::like_matches;

/// Reserved key: disjunction of sub-queries
pub const OR_KEY: &str = "$or";

/// Reserved key: conjunction of sub-queries
pub const AND_KEY: &str = "$and";
