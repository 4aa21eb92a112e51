//! Top-K selection
//!
//! **Problem**: "best N buckets" reports only need the first K entries of a
//! ranking; sorting everything is O(N log N).
//!
//! **Solution**: Bounded binary heap holding the K best candidates, O(N log K).
//!
//! Ranking is stable: equal keys keep their input order, so a ranking over
//! key-ordered buckets breaks ties by bucket key.

use crate::Error;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Trait for Top-K selection over a slice
pub trait TopKSelection<T> {
    /// Select the K items with the smallest float key
    ///
    /// # Arguments
    /// * `k` - Number of items to select
    /// * `key` - Ranking key; compared with IEEE total ordering, so
    ///   infinity ranks last
    ///
    /// # Returns
    /// At most `k` items, smallest key first
    ///
    /// # Errors
    /// Returns error if `k` is zero
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bench_aggregate::topk::TopKSelection;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let stddevs = [0.4, 0.1, 0.3, f64::INFINITY, 0.2];
    /// let top3 = stddevs.top_k_by(3, |v| *v)?;
    /// assert_eq!(top3, vec![&0.1, &0.2, &0.3]);
    /// # Ok(())
    /// # }
    /// ```
    fn top_k_by<F>(&self, k: usize, key: F) -> crate::Result<Vec<&T>>
    where
        F: Fn(&T) -> f64;
}

impl<T> TopKSelection<T> for [T] {
    fn top_k_by<F>(&self, k: usize, key: F) -> crate::Result<Vec<&T>>
    where
        F: Fn(&T) -> f64,
    {
        if k == 0 {
            return Err(Error::InvalidInput("k must be greater than 0".to_string()));
        }

        // Worst retained candidate sits at the top of the heap.
        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k.min(self.len()) + 1);
        for (index, item) in self.iter().enumerate() {
            let candidate = Candidate {
                value: key(item),
                index,
            };
            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| &self[c.index])
            .collect())
    }
}

// Ordered by rank: Less means ranked earlier (better).
#[derive(Debug)]
struct Candidate {
    value: f64,
    index: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
