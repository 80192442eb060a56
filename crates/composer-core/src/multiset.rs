//! Type identifiers and multisets of types.
//!
//! A [`TypeMultiset`] stores per-type multiplicities and never keeps zero
//! entries, so structural equality coincides with multiset equality.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ComposeError, ErrorInfo};

/// Atomic type identifier drawn from a finite alphabet (`int`, `str`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Creates a type identifier from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name of the type.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the name is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Multiset of type identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<TypeName, usize>",
    into = "BTreeMap<TypeName, usize>"
)]
pub struct TypeMultiset {
    counts: BTreeMap<TypeName, usize>,
    total: usize,
}

impl TypeMultiset {
    /// Creates an empty multiset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a multiset from signed multiplicities, rejecting negative counts.
    pub fn from_counts<I>(counts: I) -> Result<Self, ComposeError>
    where
        I: IntoIterator<Item = (TypeName, i64)>,
    {
        let mut multiset = Self::new();
        for (ty, count) in counts {
            if count < 0 {
                return Err(ComposeError::InvalidSpecification(
                    ErrorInfo::new("negative-multiplicity", "type multiplicities must be >= 0")
                        .with_context("type", ty.to_string())
                        .with_context("count", count.to_string()),
                ));
            }
            multiset.insert_n(ty, count as usize);
        }
        Ok(multiset)
    }

    /// Adds one occurrence of `ty`.
    pub fn insert(&mut self, ty: TypeName) {
        self.insert_n(ty, 1);
    }

    /// Adds `count` occurrences of `ty`.
    pub fn insert_n(&mut self, ty: TypeName, count: usize) {
        if count == 0 {
            return;
        }
        *self.counts.entry(ty).or_insert(0) += count;
        self.total += count;
    }

    /// Removes one occurrence of `ty`, returning whether anything was removed.
    pub fn remove_one(&mut self, ty: &TypeName) -> bool {
        match self.counts.get_mut(ty) {
            Some(count) => {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(ty);
                }
                self.total -= 1;
                true
            }
            None => false,
        }
    }

    /// Returns the multiplicity of `ty`.
    pub fn count(&self, ty: &TypeName) -> usize {
        self.counts.get(ty).copied().unwrap_or(0)
    }

    /// Returns whether `ty` occurs at least once.
    pub fn contains(&self, ty: &TypeName) -> bool {
        self.counts.contains_key(ty)
    }

    /// Total number of elements, counting multiplicity.
    pub fn len(&self) -> usize {
        self.total
    }

    /// Returns `true` when the multiset holds no elements.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterates over the distinct types in ascending order.
    pub fn distinct(&self) -> impl Iterator<Item = &TypeName> + '_ {
        self.counts.keys()
    }

    /// Iterates over `(type, multiplicity)` pairs in ascending type order.
    pub fn iter(&self) -> impl Iterator<Item = (&TypeName, usize)> + '_ {
        self.counts.iter().map(|(ty, count)| (ty, *count))
    }

    /// Expands the multiset into a sorted list with repetitions.
    pub fn expand(&self) -> Vec<TypeName> {
        let mut out = Vec::with_capacity(self.total);
        for (ty, count) in &self.counts {
            out.extend(std::iter::repeat(ty.clone()).take(*count));
        }
        out
    }

    /// Size of the multiset intersection (sum of per-type minimum multiplicities).
    pub fn intersection_len(&self, other: &TypeMultiset) -> usize {
        let (small, large) = if self.counts.len() <= other.counts.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .counts
            .iter()
            .map(|(ty, count)| (*count).min(large.count(ty)))
            .sum()
    }

    /// Size of the multiset union (sum of per-type maximum multiplicities).
    pub fn union_len(&self, other: &TypeMultiset) -> usize {
        self.total + other.total - self.intersection_len(other)
    }

    /// Multiset intersection.
    pub fn intersection(&self, other: &TypeMultiset) -> TypeMultiset {
        let mut out = TypeMultiset::new();
        for (ty, count) in &self.counts {
            out.insert_n(ty.clone(), (*count).min(other.count(ty)));
        }
        out
    }

    /// Multiset union.
    pub fn union(&self, other: &TypeMultiset) -> TypeMultiset {
        let mut out = self.clone();
        for (ty, count) in &other.counts {
            let extra = count.saturating_sub(self.count(ty));
            out.insert_n(ty.clone(), extra);
        }
        out
    }

    /// Multiset difference `self - other`, saturating at zero per type.
    pub fn difference(&self, other: &TypeMultiset) -> TypeMultiset {
        let mut out = TypeMultiset::new();
        for (ty, count) in &self.counts {
            out.insert_n(ty.clone(), count.saturating_sub(other.count(ty)));
        }
        out
    }

    /// Returns whether every element of `self` is contained in `other`.
    pub fn is_subset(&self, other: &TypeMultiset) -> bool {
        self.counts
            .iter()
            .all(|(ty, count)| *count <= other.count(ty))
    }
}

impl From<BTreeMap<TypeName, usize>> for TypeMultiset {
    fn from(value: BTreeMap<TypeName, usize>) -> Self {
        let mut multiset = TypeMultiset::new();
        for (ty, count) in value {
            multiset.insert_n(ty, count);
        }
        multiset
    }
}

impl From<TypeMultiset> for BTreeMap<TypeName, usize> {
    fn from(value: TypeMultiset) -> Self {
        value.counts
    }
}

impl FromIterator<TypeName> for TypeMultiset {
    fn from_iter<T: IntoIterator<Item = TypeName>>(iter: T) -> Self {
        let mut multiset = TypeMultiset::new();
        multiset.extend(iter);
        multiset
    }
}

impl Extend<TypeName> for TypeMultiset {
    fn extend<T: IntoIterator<Item = TypeName>>(&mut self, iter: T) {
        for ty in iter {
            self.insert(ty);
        }
    }
}

impl fmt::Display for TypeMultiset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, ty) in self.expand().iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ty}")?;
        }
        write!(f, "}}")
    }
}

/// Multiset resemblance `|A ∩ B| / |A ∪ B|`.
///
/// Two empty multisets carry no signal and score 0.
pub fn resemblance(a: &TypeMultiset, b: &TypeMultiset) -> f64 {
    let union = a.union_len(b);
    if union == 0 {
        return 0.0;
    }
    a.intersection_len(b) as f64 / union as f64
}
