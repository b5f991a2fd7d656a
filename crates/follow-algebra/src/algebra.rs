//! Set algebra over finite and co-finite sets of account identifiers.
//!
//! A [`GroupSet`] is either a finite set of members or the complement of a
//! finite set (everybody except the excluded ids). The two representations
//! are closed under intersection, union and complement:
//!
//! | Left | Op | Right | Result |
//! |------|----|-------|--------|
//! | `Finite(a)` | `&` | `Finite(b)` | `Finite(a ∩ b)` |
//! | `Finite(a)` | `&` | `Complement(b)` | `Finite(a − b)` |
//! | `Complement(a)` | `&` | `Complement(b)` | `Complement(a ∪ b)` |
//! | `Finite(a)` | `\|` | `Finite(b)` | `Finite(a ∪ b)` |
//! | `Finite(a)` | `\|` | `Complement(b)` | `Complement(b − a)` |
//! | `Complement(a)` | `\|` | `Complement(b)` | `Complement(a ∩ b)` |
//!
//! `~Finite(a) = Complement(a)` and `~Complement(a) = Finite(a)`.

use std::collections::HashSet;
use std::ops::{BitAnd, BitOr, Not};

use crate::UserId;

/// A finite or co-finite set of account identifiers.
///
/// # Example
///
/// ```rust
/// use follow_algebra::GroupSet;
///
/// let following = GroupSet::finite([1, 2, 3]);
/// let followers = GroupSet::finite([2, 3, 4]);
///
/// assert_eq!(&following & &followers, GroupSet::finite([2, 3]));
/// assert_eq!(&following | &!&followers, GroupSet::excluding([4]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupSet {
    /// Exactly these identifiers.
    Finite(HashSet<UserId>),
    /// Every identifier except these.
    Complement(HashSet<UserId>),
}

impl GroupSet {
    /// Creates a finite set, dropping duplicates.
    pub fn finite(ids: impl IntoIterator<Item = UserId>) -> Self {
        GroupSet::Finite(ids.into_iter().collect())
    }

    /// Creates the complement of `ids`, dropping duplicates.
    pub fn excluding(ids: impl IntoIterator<Item = UserId>) -> Self {
        GroupSet::Complement(ids.into_iter().collect())
    }

    /// The empty set ("nobody").
    pub fn nobody() -> Self {
        GroupSet::Finite(HashSet::new())
    }

    /// The universe ("everybody").
    pub fn everybody() -> Self {
        GroupSet::Complement(HashSet::new())
    }

    /// Returns true for a co-finite set.
    pub fn is_complement(&self) -> bool {
        matches!(self, GroupSet::Complement(_))
    }

    /// The identifiers carried by this value: members of a finite set, or
    /// exclusions of a complement.
    pub fn ids(&self) -> &HashSet<UserId> {
        match self {
            GroupSet::Finite(ids) | GroupSet::Complement(ids) => ids,
        }
    }

    /// Carried identifiers in ascending order.
    pub fn to_sorted_vec(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.ids().iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns true if `id` is a member of the set this value denotes.
    pub fn contains(&self, id: UserId) -> bool {
        match self {
            GroupSet::Finite(ids) => ids.contains(&id),
            GroupSet::Complement(excluded) => !excluded.contains(&id),
        }
    }

    /// Returns true for the empty finite set.
    pub fn is_nobody(&self) -> bool {
        matches!(self, GroupSet::Finite(ids) if ids.is_empty())
    }

    /// Returns true for the complement of the empty set.
    pub fn is_everybody(&self) -> bool {
        matches!(self, GroupSet::Complement(ids) if ids.is_empty())
    }

    /// Set intersection.
    pub fn intersection(&self, other: &GroupSet) -> GroupSet {
        match (self, other) {
            (GroupSet::Finite(a), GroupSet::Finite(b)) => {
                GroupSet::Finite(a.intersection(b).copied().collect())
            }
            (GroupSet::Finite(a), GroupSet::Complement(b))
            | (GroupSet::Complement(b), GroupSet::Finite(a)) => {
                GroupSet::Finite(a.difference(b).copied().collect())
            }
            (GroupSet::Complement(a), GroupSet::Complement(b)) => {
                GroupSet::Complement(a.union(b).copied().collect())
            }
        }
    }

    /// Set union.
    pub fn union(&self, other: &GroupSet) -> GroupSet {
        match (self, other) {
            (GroupSet::Finite(a), GroupSet::Finite(b)) => {
                GroupSet::Finite(a.union(b).copied().collect())
            }
            (GroupSet::Finite(a), GroupSet::Complement(b))
            | (GroupSet::Complement(b), GroupSet::Finite(a)) => {
                GroupSet::Complement(b.difference(a).copied().collect())
            }
            (GroupSet::Complement(a), GroupSet::Complement(b)) => {
                GroupSet::Complement(a.intersection(b).copied().collect())
            }
        }
    }

    /// Set complement.
    pub fn complement(&self) -> GroupSet {
        match self {
            GroupSet::Finite(ids) => GroupSet::Complement(ids.clone()),
            GroupSet::Complement(ids) => GroupSet::Finite(ids.clone()),
        }
    }
}

impl BitAnd for &GroupSet {
    type Output = GroupSet;

    fn bitand(self, rhs: &GroupSet) -> GroupSet {
        self.intersection(rhs)
    }
}

impl BitOr for &GroupSet {
    type Output = GroupSet;

    fn bitor(self, rhs: &GroupSet) -> GroupSet {
        self.union(rhs)
    }
}

impl Not for &GroupSet {
    type Output = GroupSet;

    fn not(self) -> GroupSet {
        self.complement()
    }
}

impl Not for GroupSet {
    type Output = GroupSet;

    fn not(self) -> GroupSet {
        match self {
            GroupSet::Finite(ids) => GroupSet::Complement(ids),
            GroupSet::Complement(ids) => GroupSet::Finite(ids),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<GroupSet> {
        vec![
            GroupSet::nobody(),
            GroupSet::everybody(),
            GroupSet::finite([1, 2, 3]),
            GroupSet::finite([3, 4]),
            GroupSet::excluding([2, 3, 4]),
            GroupSet::excluding([1, 5]),
        ]
    }

    #[test]
    fn test_constructors_deduplicate() {
        assert_eq!(GroupSet::finite([1, 1, 2]).ids().len(), 2);
        assert_eq!(GroupSet::excluding([7, 7]).ids().len(), 1);
    }

    #[test]
    fn test_finite_finite() {
        let a = GroupSet::finite([1, 2, 3]);
        let b = GroupSet::finite([2, 3, 4]);
        assert_eq!(&a & &b, GroupSet::finite([2, 3]));
        assert_eq!(&a | &b, GroupSet::finite([1, 2, 3, 4]));
    }

    #[test]
    fn test_finite_complement() {
        let a = GroupSet::finite([1, 2, 3]);
        let b = GroupSet::excluding([2, 3, 4]);
        assert_eq!(&a & &b, GroupSet::finite([1]));
        assert_eq!(&a | &b, GroupSet::excluding([4]));
    }

    #[test]
    fn test_complement_complement() {
        let a = GroupSet::excluding([1, 2]);
        let b = GroupSet::excluding([2, 3]);
        assert_eq!(&a & &b, GroupSet::excluding([1, 2, 3]));
        assert_eq!(&a | &b, GroupSet::excluding([2]));
    }

    #[test]
    fn test_negation() {
        assert_eq!(!GroupSet::finite([1]), GroupSet::excluding([1]));
        assert_eq!(!&GroupSet::excluding([1]), GroupSet::finite([1]));
        assert_eq!(!GroupSet::nobody(), GroupSet::everybody());
    }

    #[test]
    fn test_operators_commute() {
        for a in samples() {
            for b in samples() {
                assert_eq!(&a & &b, &b & &a, "{a:?} & {b:?}");
                assert_eq!(&a | &b, &b | &a, "{a:?} | {b:?}");
            }
        }
    }

    #[test]
    fn test_double_complement_is_identity() {
        for a in samples() {
            assert_eq!(!!a.clone(), a);
        }
    }

    #[test]
    fn test_excluded_middle_and_contradiction() {
        for a in samples() {
            assert!((&a | &!&a).is_everybody(), "{a:?}");
            assert!((&a & &!&a).is_nobody(), "{a:?}");
        }
    }

    #[test]
    fn test_de_morgan() {
        for a in samples() {
            for b in samples() {
                assert_eq!(!(&a & &b), &!&a | &!&b);
                assert_eq!(!(&a | &b), &!&a & &!&b);
            }
        }
    }

    #[test]
    fn test_contains() {
        let finite = GroupSet::finite([1, 2]);
        assert!(finite.contains(1));
        assert!(!finite.contains(3));

        let complement = GroupSet::excluding([1]);
        assert!(!complement.contains(1));
        assert!(complement.contains(42));
    }

    #[test]
    fn test_to_sorted_vec() {
        assert_eq!(GroupSet::excluding([9, 3, 5]).to_sorted_vec(), vec![3, 5, 9]);
    }
}
