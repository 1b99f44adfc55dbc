//! An owning set of blobs with bulk evaluation, filtering and selection.
//!
//! This layer stays thin: every measurement goes through a
//! [`BlobOperator`], so collection-level queries are just iteration plus
//! the blobs' own memoization.

use std::cmp::Ordering;

use crate::blob::Blob;
use crate::ops::BlobOperator;

/// Whether a filter keeps or drops the blobs matching its criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    Include,
    Exclude,
}

/// Predicate on an evaluated property value. `Inside` bounds are
/// inclusive; `Outside` is its strict complement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterCriterion {
    Equal(f64),
    NotEqual(f64),
    Greater(f64),
    Less(f64),
    GreaterOrEqual(f64),
    LessOrEqual(f64),
    Inside(f64, f64),
    Outside(f64, f64),
}

impl FilterCriterion {
    fn matches(&self, value: f64) -> bool {
        match *self {
            FilterCriterion::Equal(limit) => value == limit,
            FilterCriterion::NotEqual(limit) => value != limit,
            FilterCriterion::Greater(limit) => value > limit,
            FilterCriterion::Less(limit) => value < limit,
            FilterCriterion::GreaterOrEqual(limit) => value >= limit,
            FilterCriterion::LessOrEqual(limit) => value <= limit,
            FilterCriterion::Inside(low, high) => value >= low && value <= high,
            FilterCriterion::Outside(low, high) => value < low || value > high,
        }
    }
}

/// Blobs extracted from one labeling run (or assembled by hand), in
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct BlobCollection {
    blobs: Vec<Blob>,
}

impl BlobCollection {
    pub fn new() -> Self {
        BlobCollection::default()
    }

    pub fn from_blobs(blobs: Vec<Blob>) -> Self {
        BlobCollection { blobs }
    }

    pub fn add(&mut self, blob: Blob) {
        self.blobs.push(blob);
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Blob> {
        self.blobs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Blob> {
        self.blobs.iter()
    }

    /// Appends clones of the other collection's blobs.
    pub fn append(&mut self, other: &BlobCollection) {
        self.blobs.extend(other.blobs.iter().cloned());
    }

    /// Evaluates one property across all blobs, in order.
    pub fn result(&self, op: &dyn BlobOperator) -> Vec<f64> {
        self.blobs.iter().map(|blob| op.value(blob)).collect()
    }

    /// Evaluates one property on the blob at `index`.
    pub fn number(&self, index: usize, op: &dyn BlobOperator) -> Option<f64> {
        self.blobs.get(index).map(|blob| op.value(blob))
    }

    /// A new collection holding the blobs the filter keeps.
    pub fn filter(
        &self,
        op: &dyn BlobOperator,
        action: FilterAction,
        criterion: FilterCriterion,
    ) -> BlobCollection {
        let blobs = self
            .blobs
            .iter()
            .filter(|blob| keeps(op, action, criterion, blob))
            .cloned()
            .collect();
        BlobCollection { blobs }
    }

    /// Filters this collection destructively.
    pub fn filter_in_place(
        &mut self,
        op: &dyn BlobOperator,
        action: FilterAction,
        criterion: FilterCriterion,
    ) {
        self.blobs
            .retain(|blob| keeps(op, action, criterion, blob));
    }

    /// The blob ranking `n`-th (0-based) by the property, descending.
    /// Ties keep insertion order.
    pub fn nth_blob(&self, op: &dyn BlobOperator, n: usize) -> Option<&Blob> {
        let mut ranked: Vec<(usize, f64)> = self
            .blobs
            .iter()
            .enumerate()
            .map(|(index, blob)| (index, op.value(blob)))
            .collect();
        // stable sort preserves insertion order among equal values
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked.get(n).and_then(|&(index, _)| self.blobs.get(index))
    }

    /// Drops one memoized property from every blob.
    pub fn remove_property(&self, name: &str) {
        for blob in &self.blobs {
            blob.remove_cached_property(name);
        }
    }
}

fn keeps(
    op: &dyn BlobOperator,
    action: FilterAction,
    criterion: FilterCriterion,
    blob: &Blob,
) -> bool {
    let matched = criterion.matches(op.value(blob));
    match action {
        FilterAction::Include => matched,
        FilterAction::Exclude => !matched,
    }
}

impl<'a> IntoIterator for &'a BlobCollection {
    type Item = &'a Blob;
    type IntoIter = std::slice::Iter<'a, Blob>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
