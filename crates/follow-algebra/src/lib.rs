//! # follow-algebra
//!
//! A small expression language for describing groups of accounts on a
//! social graph by combining primitive sets with set algebra.
//!
//! This crate provides:
//! - **Lexer and parser**: turn expression text into a [`GroupExpr`] tree
//! - **Set algebra**: [`GroupSet`], closed over finite and complement sets
//! - **Evaluation**: [`GroupExpr::evaluate`] against pre-fetched data
//!
//! Fetching the data for each primitive is the job of
//! `follow-algebra-executor`.
//!
//! ## Usage
//!
//! ```rust
//! use follow_algebra::{parse, FetchResults, GroupSet};
//!
//! let expr = parse("alice.following & ~bob.followers").unwrap();
//!
//! let fetched: FetchResults = [
//!     ("alice.following", vec![1, 2, 3]),
//!     ("bob.followers", vec![2, 3, 4]),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(expr.evaluate(&fetched).unwrap(), GroupSet::finite([1]));
//! ```
//!
//! ## Syntax Quick Reference
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `h.followers` | Accounts following `h` | `alice.followers` |
//! | `h.following` | Accounts `h` follows | `alice.following` |
//! | `h/list` | Members of `h`'s list | `alice/close-friends` |
//! | `{a, b}` | Literal handles | `{carol, dave}` |
//! | `<path>` | Handles from a file, one per line | `<team.txt>` |
//! | `A & B` | Intersection | `a.followers & b.followers` |
//! | `A \| B` | Union | `a.followers \| b.followers` |
//! | `~A` | Complement | `~a.following` |
//! | `( A )` | Grouping | `a.followers & (b/x \| c/y)` |
//!
//! `&` and `|` have equal precedence and associate to the left.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod algebra;
mod ast;
mod error;
mod fetched;
mod lexer;
mod parser;

pub use algebra::GroupSet;
pub use ast::{DataRequest, GroupExpr, HandleSet};
pub use error::{ErrorKind, ExprError, ExprResult};
pub use fetched::FetchResults;
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{parse, MAX_NESTING};

/// Account identifier type (64-bit unsigned integer).
pub type UserId = u64;
