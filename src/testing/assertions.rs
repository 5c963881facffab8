//! Assertion functions for ranking outputs and bounded containers.

use crate::combiners::BoundedTopK;
use crate::scored::{Score, ScoredItem};
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// Assert that a ranked output equals the expected `(item, score)` list, in order.
///
/// # Panics
///
/// Panics if the outputs differ in length or at any position.
///
/// # Example
///
/// ```
/// use ironrank::ScoredItem;
/// use ironrank::testing::assert_ranked_equal;
///
/// let ranked = vec![ScoredItem::new("c", 8), ScoredItem::new("a", 5)];
/// assert_ranked_equal(&ranked, &[("c", 8), ("a", 5)]);
/// ```
pub fn assert_ranked_equal<I: Debug + PartialEq>(actual: &[ScoredItem<I>], expected: &[(I, Score)]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Ranking length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );

    for (i, (a, (ei, es))) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            a.item() == ei && a.score() == *es,
            "Ranking mismatch at position {i}:\n  Expected: ({ei:?}, {es})\n  Actual: ({:?}, {})\n  Full expected: {expected:?}\n  Full actual: {actual:?}",
            a.item(),
            a.score()
        );
    }
}

/// Assert that scores never increase along a ranked output.
///
/// # Panics
///
/// Panics at the first position whose score is higher than its predecessor's.
pub fn assert_descending<I: Debug>(ranked: &[ScoredItem<I>]) {
    for (i, w) in ranked.windows(2).enumerate() {
        assert!(
            w[0].score() >= w[1].score(),
            "Ranking not descending at position {}:\n  {:?} then {:?}",
            i + 1,
            w[0],
            w[1]
        );
    }
}

/// Assert the capacity invariant: at most `k` distinct score keys, kept in
/// strictly descending order with no empty groups.
///
/// # Panics
///
/// Panics if the container holds more than `k` groups, if group scores are
/// not strictly descending, or if any group is empty.
pub fn assert_capacity_invariant<I: Debug>(top: &BoundedTopK<I>) {
    let groups = top.groups();
    assert!(
        groups.len() <= top.capacity(),
        "Capacity exceeded: {} distinct scores held with k = {}\n  Groups: {groups:?}",
        groups.len(),
        top.capacity()
    );
    for w in groups.windows(2) {
        assert!(
            w[0].score() > w[1].score(),
            "Groups out of order: {} before {}\n  Groups: {groups:?}",
            w[0].score(),
            w[1].score()
        );
    }
    assert!(
        groups.iter().all(|g| !g.is_empty()),
        "Empty score group retained\n  Groups: {groups:?}"
    );
}

/// Assert that every item offered with score `score` is either fully present
/// in the container or fully absent, i.e. tied groups were never split.
///
/// # Panics
///
/// Panics if the group for `score` exists but is missing some of `offered`.
pub fn assert_groups_intact<I: Debug + Eq + Hash>(top: &BoundedTopK<I>, score: Score, offered: &[I]) {
    let Some(group) = top.groups().iter().find(|g| g.score() == score) else {
        return;
    };
    let held: HashSet<&I> = group.items().iter().collect();
    let want: HashSet<&I> = offered.iter().collect();
    assert_eq!(
        held, want,
        "Tied group for score {score} was split:\n  Offered: {offered:?}\n  Held: {:?}",
        group.items()
    );
}
