// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Confirmation phrase selection.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// A configured set of confirmation phrases.
pub trait PhrasePool: Send + Sync {
    /// Returns the confirmation phrases.
    fn confirmations(&self) -> &[String];
}

impl PhrasePool for Vec<String> {
    fn confirmations(&self) -> &[String] {
        self
    }
}

/// Source of the index used to pick a phrase.
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

/// Picks uniformly with the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Replays a fixed sequence of indices, wrapping around at the end.
///
/// Indices larger than the candidate list are reduced modulo its length.
///
/// # Examples
///
/// ```
/// use voxlight::reply::{FixedSequence, RandomSource};
///
/// let source = FixedSequence::new([2, 0]);
/// assert_eq!(source.pick(3), 2);
/// assert_eq!(source.pick(3), 0);
/// assert_eq!(source.pick(2), 0);
/// ```
#[derive(Debug, Default)]
pub struct FixedSequence {
    indices: Vec<usize>,
    cursor: AtomicUsize,
}

impl FixedSequence {
    /// Creates a source replaying `indices`. An empty sequence always picks 0.
    #[must_use]
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for FixedSequence {
    fn pick(&self, len: usize) -> usize {
        if self.indices.is_empty() || len == 0 {
            return 0;
        }
        let position = self.cursor.fetch_add(1, Ordering::Relaxed) % self.indices.len();
        self.indices[position] % len
    }
}

/// Picks a confirmation phrase.
///
/// Candidates are `extras` listed twice, so that they are favored,
/// followed by the pool. Returns `None` if there are no candidates.
#[must_use]
pub fn confirm(pool: &dyn PhrasePool, random: &dyn RandomSource, extras: &[&str]) -> Option<String> {
    let candidates: Vec<&str> = extras
        .iter()
        .chain(extras.iter())
        .copied()
        .chain(pool.confirmations().iter().map(String::as_str))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let index = random.pick(candidates.len()).min(candidates.len() - 1);
    Some(candidates[index].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<String> {
        vec!["done".into(), "okay".into()]
    }

    #[test]
    fn extras_are_weighted_twice() {
        let random = FixedSequence::new([0, 1, 2, 3]);
        let picks: Vec<String> = (0..4)
            .filter_map(|_| confirm(&pool(), &random, &["switched on"]))
            .collect();
        assert_eq!(picks, vec!["switched on", "switched on", "done", "okay"]);
    }

    #[test]
    fn empty_candidates() {
        let random = FixedSequence::new([0]);
        assert_eq!(confirm(&Vec::<String>::new(), &random, &[]), None);
    }

    #[test]
    fn thread_random_stays_in_range() {
        for len in 1..20 {
            assert!(ThreadRandom.pick(len) < len);
        }
    }

    #[test]
    fn fixed_sequence_wraps() {
        let random = FixedSequence::new([1]);
        assert_eq!(random.pick(5), 1);
        assert_eq!(random.pick(5), 1);
        assert_eq!(FixedSequence::default().pick(5), 0);
    }
}
