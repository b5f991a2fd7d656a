//! Abstract Syntax Tree types for group expressions.

use std::collections::BTreeSet;
use std::fmt;

use crate::algebra::GroupSet;
use crate::error::{ExprError, ExprResult};
use crate::fetched::FetchResults;

// =============================================================================
// Handle sets
// =============================================================================

/// A literal set of handles, normalized to lowercase and deduplicated.
///
/// Two literals with the same handles in any order or case are equal and
/// share a cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<String>", into = "Vec<String>"))]
pub struct HandleSet {
    handles: BTreeSet<String>,
}

impl HandleSet {
    /// Creates a handle set from raw handles.
    pub fn new<I, S>(handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            handles: handles
                .into_iter()
                .map(|h| h.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Iterates over the normalized handles in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.handles.iter().map(String::as_str)
    }

    /// Number of distinct handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns true if the set has no handles.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Cache key: `{a,b,c}` with sorted lowercase handles.
    pub fn cache_key(&self) -> String {
        let joined: Vec<&str> = self.iter().collect();
        format!("{{{}}}", joined.join(","))
    }
}

impl From<Vec<String>> for HandleSet {
    fn from(handles: Vec<String>) -> Self {
        HandleSet::new(handles)
    }
}

impl From<HandleSet> for Vec<String> {
    fn from(set: HandleSet) -> Self {
        set.handles.into_iter().collect()
    }
}

impl fmt::Display for HandleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{{{}}}", joined.join(", "))
    }
}

// =============================================================================
// Data requests
// =============================================================================

/// What a primitive node needs fetched from the social graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataRequest<'a> {
    /// Follower ids of an account.
    Followers(&'a str),
    /// Ids the account follows.
    Following(&'a str),
    /// Member ids of a named list owned by an account.
    ListMembers {
        /// Owner of the list.
        handle: &'a str,
        /// List name (slug).
        list: &'a str,
    },
    /// Ids of a literal set of handles.
    Handles(&'a HandleSet),
}

// =============================================================================
// Expression tree
// =============================================================================

/// A parsed group expression.
///
/// Primitive variants name a set fetched from the social graph; the
/// remaining variants combine their children with set algebra. Each node
/// exclusively owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupExpr {
    /// Followers of an account: `alice.followers`
    FollowersOf {
        /// Lowercased account handle.
        #[cfg_attr(feature = "serde", serde(deserialize_with = "lowercase"))]
        handle: String,
    },
    /// Accounts followed by an account: `alice.following`
    FollowingOf {
        /// Lowercased account handle.
        #[cfg_attr(feature = "serde", serde(deserialize_with = "lowercase"))]
        handle: String,
    },
    /// Members of a list: `alice/close-friends`
    ListMembers {
        /// Lowercased handle of the list owner.
        #[cfg_attr(feature = "serde", serde(deserialize_with = "lowercase"))]
        handle: String,
        /// List name as written.
        list: String,
    },
    /// Literal handles: `{alice, bob}` or the contents of `<file>`
    HandleSet(HandleSet),
    /// Intersection: `A & B`
    Intersection(Box<GroupExpr>, Box<GroupExpr>),
    /// Union: `A | B`
    Union(Box<GroupExpr>, Box<GroupExpr>),
    /// Complement: `~A`
    Complement(Box<GroupExpr>),
}

#[cfg(feature = "serde")]
fn lowercase<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    String::deserialize(deserializer).map(|handle| handle.to_lowercase())
}

impl GroupExpr {
    /// `handle.followers`
    pub fn followers_of(handle: &str) -> Self {
        GroupExpr::FollowersOf {
            handle: handle.to_lowercase(),
        }
    }

    /// `handle.following`
    pub fn following_of(handle: &str) -> Self {
        GroupExpr::FollowingOf {
            handle: handle.to_lowercase(),
        }
    }

    /// `handle/list`
    pub fn list_members(handle: &str, list: &str) -> Self {
        GroupExpr::ListMembers {
            handle: handle.to_lowercase(),
            list: list.to_string(),
        }
    }

    /// `{handles...}`
    pub fn handle_set<I, S>(handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        GroupExpr::HandleSet(HandleSet::new(handles))
    }

    /// `left & right`
    pub fn intersection(left: GroupExpr, right: GroupExpr) -> Self {
        GroupExpr::Intersection(Box::new(left), Box::new(right))
    }

    /// `left | right`
    pub fn union(left: GroupExpr, right: GroupExpr) -> Self {
        GroupExpr::Union(Box::new(left), Box::new(right))
    }

    /// `~inner`
    pub fn complement(inner: GroupExpr) -> Self {
        GroupExpr::Complement(Box::new(inner))
    }

    /// Returns true for variants that are fetched rather than combined.
    pub fn is_primitive(&self) -> bool {
        self.data_request().is_some()
    }

    /// Cache key identifying this primitive's data source.
    ///
    /// Returns `None` for combinators.
    pub fn cache_key(&self) -> Option<String> {
        match self {
            GroupExpr::FollowersOf { handle } => Some(format!("{handle}.followers")),
            GroupExpr::FollowingOf { handle } => Some(format!("{handle}.following")),
            GroupExpr::ListMembers { handle, list } => Some(format!("{handle}/{list}")),
            GroupExpr::HandleSet(set) => Some(set.cache_key()),
            _ => None,
        }
    }

    /// The fetch this primitive needs. Returns `None` for combinators.
    pub fn data_request(&self) -> Option<DataRequest<'_>> {
        match self {
            GroupExpr::FollowersOf { handle } => Some(DataRequest::Followers(handle)),
            GroupExpr::FollowingOf { handle } => Some(DataRequest::Following(handle)),
            GroupExpr::ListMembers { handle, list } => {
                Some(DataRequest::ListMembers { handle, list })
            }
            GroupExpr::HandleSet(set) => Some(DataRequest::Handles(set)),
            _ => None,
        }
    }

    /// Visits every primitive node, depth-first and left to right.
    ///
    /// Repeated primitives are visited once per occurrence.
    pub fn for_each_primitive<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a GroupExpr),
    {
        match self {
            GroupExpr::Intersection(left, right) | GroupExpr::Union(left, right) => {
                left.for_each_primitive(f);
                right.for_each_primitive(f);
            }
            GroupExpr::Complement(inner) => inner.for_each_primitive(f),
            primitive => f(primitive),
        }
    }

    /// All primitive occurrences in visit order.
    pub fn primitives(&self) -> Vec<&GroupExpr> {
        let mut out = Vec::new();
        self.for_each_primitive(&mut |node| out.push(node));
        out
    }

    /// Evaluates the tree against already-fetched data.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError::UnresolvedPrimitive`] if a primitive's cache key
    /// is missing from `fetched`.
    pub fn evaluate(&self, fetched: &FetchResults) -> ExprResult<GroupSet> {
        match self {
            GroupExpr::Intersection(left, right) => {
                Ok(left.evaluate(fetched)?.intersection(&right.evaluate(fetched)?))
            }
            GroupExpr::Union(left, right) => {
                Ok(left.evaluate(fetched)?.union(&right.evaluate(fetched)?))
            }
            GroupExpr::Complement(inner) => Ok(!inner.evaluate(fetched)?),
            primitive => {
                // Every non-combinator variant has a cache key.
                let cache_key = primitive.cache_key().unwrap_or_default();
                match fetched.get(&cache_key) {
                    Some(ids) => Ok(GroupSet::finite(ids.iter().copied())),
                    None => Err(ExprError::UnresolvedPrimitive { cache_key }),
                }
            }
        }
    }

    fn is_binary(&self) -> bool {
        matches!(self, GroupExpr::Intersection(..) | GroupExpr::Union(..))
    }
}

impl fmt::Display for GroupExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupExpr::FollowersOf { handle } => write!(f, "{handle}.followers"),
            GroupExpr::FollowingOf { handle } => write!(f, "{handle}.following"),
            GroupExpr::ListMembers { handle, list } => write!(f, "{handle}/{list}"),
            GroupExpr::HandleSet(set) => write!(f, "{set}"),
            GroupExpr::Intersection(left, right) => write_binary(f, left, "&", right),
            GroupExpr::Union(left, right) => write_binary(f, left, "|", right),
            GroupExpr::Complement(inner) if inner.is_binary() => write!(f, "~({inner})"),
            GroupExpr::Complement(inner) => write!(f, "~{inner}"),
        }
    }
}

// Operators are left-associative with equal precedence, so only a binary
// right operand needs parentheses.
fn write_binary(
    f: &mut fmt::Formatter<'_>,
    left: &GroupExpr,
    op: &str,
    right: &GroupExpr,
) -> fmt::Result {
    if right.is_binary() {
        write!(f, "{left} {op} ({right})")
    } else {
        write!(f, "{left} {op} {right}")
    }
}
