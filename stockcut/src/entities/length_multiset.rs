use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign, Sub, SubAssign};

use itertools::Itertools;
use ordered_float::NotNan;

use crate::{CutError, Result};

/// Bag of lengths: maps every distinct length to the number of pieces of that length.
///
/// Used for stock bars, demanded pieces and the pieces cut from a single bar alike.
/// Iteration is always in descending order of length.
/// Equality and hashing are structural, two multisets holding the same quantities compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LengthMultiset {
    qtys: BTreeMap<NotNan<f64>, usize>,
}

impl LengthMultiset {
    /// Creates an empty multiset.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single piece of the given length.
    pub fn from_scalar(length: f64) -> Result<Self> {
        Self::from_lengths([length])
    }

    /// Tallies a flat sequence of lengths.
    pub fn from_lengths<I>(lengths: I) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut multiset = Self::new();
        for length in lengths {
            *multiset.qtys.entry(length_key(length)?).or_insert(0) += 1;
        }
        Ok(multiset)
    }

    /// Builds a multiset from (length, quantity) pairs. Quantities of a repeated length are summed.
    pub fn from_counts<I>(counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (f64, usize)>,
    {
        let mut multiset = Self::new();
        for (length, qty) in counts {
            *multiset.qtys.entry(length_key(length)?).or_insert(0) += qty;
        }
        Ok(multiset)
    }

    /// Merges a list of single-entry mappings.
    /// Every entry must hold exactly one (length, quantity) pair.
    /// A later entry for an already present length replaces its quantity.
    pub fn from_entries<I, E>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: IntoIterator<Item = (f64, usize)>,
    {
        let mut multiset = Self::new();
        for (i, entry) in entries.into_iter().enumerate() {
            let pairs = entry.into_iter().collect_vec();
            match pairs.as_slice() {
                [(length, qty)] => {
                    multiset.qtys.insert(length_key(*length)?, *qty);
                }
                _ => {
                    return Err(CutError::InputShape(format!(
                        "entry {i} holds {} pairs, expected exactly one",
                        pairs.len()
                    )));
                }
            }
        }
        Ok(multiset)
    }

    /// Quantity of pieces with the given length, zero if absent.
    pub fn get(&self, length: f64) -> usize {
        NotNan::new(length)
            .ok()
            .and_then(|key| self.qtys.get(&key).copied())
            .unwrap_or(0)
    }

    /// Sets the quantity of pieces with the given length.
    pub fn set(&mut self, length: f64, qty: usize) -> Result<()> {
        self.qtys.insert(length_key(length)?, qty);
        Ok(())
    }

    /// Adds a single piece of the given length.
    pub fn increment(&mut self, length: f64) -> Result<()> {
        self.increment_key(length_key(length)?);
        Ok(())
    }

    /// All pieces as raw lengths: descending, each length repeated according to its quantity.
    /// The iterator is lazy and can be cloned to restart the sequence.
    pub fn lengths(&self) -> impl Iterator<Item = f64> + Clone + '_ {
        self.qtys
            .iter()
            .rev()
            .flat_map(|(length, qty)| std::iter::repeat_n(length.into_inner(), *qty))
    }

    /// (length, quantity) pairs in descending order of length, zero quantities included.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (f64, usize)> + Clone + '_ {
        self.qtys
            .iter()
            .rev()
            .map(|(length, qty)| (length.into_inner(), *qty))
    }

    /// Distinct lengths in descending order, zero quantities included.
    pub fn keys(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().map(|(length, _)| length)
    }

    /// Sums the quantities of `other` into `self`.
    pub fn add(&mut self, other: &LengthMultiset) -> &mut Self {
        for (key, qty) in &other.qtys {
            *self.qtys.entry(*key).or_insert(0) += qty;
        }
        self
    }

    /// Subtracts the quantities of `other`, clamping every result at zero.
    /// Lengths absent from `self` are ignored.
    pub fn subtract(&mut self, other: &LengthMultiset) -> &mut Self {
        for (key, qty) in &other.qtys {
            if let Some(own) = self.qtys.get_mut(key) {
                *own = own.saturating_sub(*qty);
            }
        }
        self
    }

    /// Drops all entries with a zero quantity or a length below `min_value`.
    pub fn clean(&mut self, min_value: f64) -> &mut Self {
        self.qtys
            .retain(|length, qty| *qty > 0 && length.into_inner() >= min_value);
        self
    }

    /// Longest length with a non-zero quantity.
    pub fn max_length(&self) -> Option<f64> {
        self.iter().find(|(_, qty)| *qty > 0).map(|(length, _)| length)
    }

    /// Shortest length with a non-zero quantity.
    pub fn min_length(&self) -> Option<f64> {
        self.iter()
            .rev()
            .find(|(_, qty)| *qty > 0)
            .map(|(length, _)| length)
    }

    /// Total number of pieces.
    pub fn cardinality(&self) -> usize {
        self.qtys.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cardinality() == 0
    }

    /// Number of stored lengths, zero quantities included.
    pub fn n_distinct(&self) -> usize {
        self.qtys.len()
    }

    /// Sum of all piece lengths.
    pub fn total_length(&self) -> f64 {
        self.iter().map(|(length, qty)| length * qty as f64).sum()
    }

    /// Copy with every length mapped through `scale`.
    /// Lengths collapsing onto the same value are merged.
    pub(crate) fn scaled(&self, scale: impl Fn(f64) -> f64) -> LengthMultiset {
        let mut scaled = LengthMultiset::new();
        for (length, qty) in self.iter() {
            if let Ok(key) = NotNan::new(scale(length)) {
                *scaled.qtys.entry(key).or_insert(0) += qty;
            }
        }
        scaled
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (NotNan<f64>, usize)> + '_ {
        self.qtys.iter().rev().map(|(length, qty)| (*length, *qty))
    }

    pub(crate) fn get_key(&self, key: NotNan<f64>) -> usize {
        self.qtys.get(&key).copied().unwrap_or(0)
    }

    pub(crate) fn increment_key(&mut self, key: NotNan<f64>) {
        *self.qtys.entry(key).or_insert(0) += 1;
    }

    /// Removes a single piece, never going below zero.
    pub(crate) fn decrement_key(&mut self, key: NotNan<f64>) {
        if let Some(qty) = self.qtys.get_mut(&key) {
            *qty = qty.saturating_sub(1);
        }
    }
}

/// Validates a length and converts it into a key of the multiset.
pub(crate) fn length_key(length: f64) -> Result<NotNan<f64>> {
    if !length.is_finite() || length < 0.0 {
        return Err(CutError::InputShape(format!(
            "lengths must be finite and non-negative, got {length}"
        )));
    }
    NotNan::new(length).map_err(|e| CutError::InputShape(e.to_string()))
}

impl Add<&LengthMultiset> for &LengthMultiset {
    type Output = LengthMultiset;

    fn add(self, rhs: &LengthMultiset) -> LengthMultiset {
        let mut sum = self.clone();
        LengthMultiset::add(&mut sum, rhs);
        sum
    }
}

impl AddAssign<&LengthMultiset> for LengthMultiset {
    fn add_assign(&mut self, rhs: &LengthMultiset) {
        LengthMultiset::add(self, rhs);
    }
}

impl Sub<&LengthMultiset> for &LengthMultiset {
    type Output = LengthMultiset;

    fn sub(self, rhs: &LengthMultiset) -> LengthMultiset {
        let mut diff = self.clone();
        diff.subtract(rhs);
        diff
    }
}

impl SubAssign<&LengthMultiset> for LengthMultiset {
    fn sub_assign(&mut self, rhs: &LengthMultiset) {
        self.subtract(rhs);
    }
}

impl Display for LengthMultiset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let entries = self
            .iter()
            .map(|(length, qty)| format!("{length}: {qty}"))
            .join(", ");
        write!(f, "{{{entries}}}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use test_case::test_case;

    use super::LengthMultiset;
    use crate::CutError;

    fn hash_of(m: &LengthMultiset) -> u64 {
        let mut hasher = DefaultHasher::new();
        m.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn named_constructors() {
        assert_eq!(LengthMultiset::from_scalar(1000.0).unwrap().to_string(), "{1000: 1}");

        let counts = LengthMultiset::from_counts([(3600.0, 2), (4200.0, 5)]).unwrap();
        assert_eq!(counts.to_string(), "{4200: 5, 3600: 2}");

        let tallied = LengthMultiset::from_lengths([
            3600.0, 4200.0, 3600.0, 3600.0, 3600.0, 4200.0, 1200.0, 1200.0, 0.0, 0.0,
        ])
        .unwrap();
        assert_eq!(tallied.to_string(), "{4200: 2, 3600: 4, 1200: 2, 0: 2}");

        let merged = LengthMultiset::from_entries([
            vec![(4200.0, 2)],
            vec![(3600.0, 4)],
            vec![(1200.0, 2)],
            vec![(0.0, 2)],
        ])
        .unwrap();
        assert_eq!(merged, tallied);
    }

    #[test_case(f64::NAN; "nan")]
    #[test_case(f64::INFINITY; "infinite")]
    #[test_case(-1.0; "negative")]
    fn invalid_lengths_are_rejected(length: f64) {
        assert!(matches!(
            LengthMultiset::from_lengths([1000.0, length]),
            Err(CutError::InputShape(_))
        ));
        assert!(matches!(
            LengthMultiset::from_scalar(length),
            Err(CutError::InputShape(_))
        ));
    }

    #[test]
    fn entries_must_hold_a_single_pair() {
        let result = LengthMultiset::from_entries([vec![(2400.0, 2), (4200.0, 8)]]);
        assert!(matches!(result, Err(CutError::InputShape(_))));
        let result = LengthMultiset::from_entries([Vec::<(f64, usize)>::new()]);
        assert!(matches!(result, Err(CutError::InputShape(_))));
    }

    #[test]
    fn later_entry_replaces_quantity() {
        let m = LengthMultiset::from_entries([vec![(2400.0, 2)], vec![(2400.0, 8)]]).unwrap();
        assert_eq!(m.get(2400.0), 8);
    }

    #[test]
    fn clone_is_independent() {
        let a = LengthMultiset::from_entries([vec![(2400.0, 2)], vec![(4200.0, 8)]]).unwrap();
        let mut b = a.clone();
        b.set(4200.0, 2).unwrap();
        b.increment(600.0).unwrap();
        assert_eq!(a.to_string(), "{4200: 8, 2400: 2}");
        assert_eq!(b.to_string(), "{4200: 2, 2400: 2, 600: 1}");
    }

    #[test]
    fn get_set_increment() {
        let mut m = LengthMultiset::from_counts([(3600.0, 2), (4200.0, 4)]).unwrap();
        assert_eq!(m.get(3600.0), 2);
        assert_eq!(m.get(1.0), 0);
        assert_eq!(m.get(f64::NAN), 0);
        m.increment(1200.0).unwrap();
        m.increment(1200.0).unwrap();
        m.set(4200.0, 1).unwrap();
        assert_eq!(m.to_string(), "{4200: 1, 3600: 2, 1200: 2}");
        assert!(m.set(-5.0, 1).is_err());
    }

    #[test]
    fn lengths_are_lazy_and_restartable() {
        let m = LengthMultiset::from_counts([(3600.0, 2), (4200.0, 4), (1200.0, 3)]).unwrap();
        let lengths = m.lengths();
        let first = lengths.clone().collect::<Vec<_>>();
        let second = lengths.collect::<Vec<_>>();
        assert_eq!(
            first,
            vec![4200.0, 4200.0, 4200.0, 4200.0, 3600.0, 3600.0, 1200.0, 1200.0, 1200.0]
        );
        assert_eq!(first, second);
        assert_eq!(m.lengths().take(2).count(), 2);
    }

    #[test]
    fn add_and_subtract() {
        let a = LengthMultiset::from_counts([(3600.0, 2), (4200.0, 4)]).unwrap();
        let b = LengthMultiset::from_counts([(3600.0, 1), (4200.0, 2), (1200.0, 2)]).unwrap();

        let sum = &a + &b;
        assert_eq!(sum.to_string(), "{4200: 6, 3600: 3, 1200: 2}");

        let mut c = a.clone();
        c += &b;
        assert_eq!(c, sum);

        let mut diff = &a - &b;
        assert_eq!(diff.to_string(), "{4200: 2, 3600: 1}");

        diff -= &LengthMultiset::from_counts([(4200.0, 10), (1000.0, 2)]).unwrap();
        assert_eq!(diff.to_string(), "{4200: 0, 3600: 1}");
        assert_eq!(diff.cardinality(), 1);
    }

    #[test]
    fn clean_prunes_zero_and_short_entries() {
        let mut a = LengthMultiset::from_counts([(2400.0, 2), (4200.0, 8)]).unwrap();
        a.clean(4000.0);
        assert_eq!(a.to_string(), "{4200: 8}");

        let mut b = LengthMultiset::from_counts([(2400.0, 2), (4200.0, 0)]).unwrap();
        assert_eq!(b.n_distinct(), 2);
        b.clean(0.0);
        assert_eq!(b.to_string(), "{2400: 2}");
        assert_eq!(b.n_distinct(), 1);
    }

    #[test]
    fn structural_equality_and_hash() {
        let a = LengthMultiset::from_counts([(3600.0, 2), (4200.0, 4)]).unwrap();
        let b = LengthMultiset::from_lengths([4200.0, 3600.0, 4200.0, 3600.0, 4200.0, 4200.0])
            .unwrap();
        let mut c = a.clone();
        c.increment(3600.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
        assert_ne!(hash_of(&a), hash_of(&c));
    }

    #[test]
    fn aggregates() {
        let m = LengthMultiset::from_counts([(3600.0, 2), (4200.0, 4), (100.0, 0)]).unwrap();
        assert_eq!(m.cardinality(), 6);
        assert_eq!(m.max_length(), Some(4200.0));
        assert_eq!(m.min_length(), Some(3600.0));
        assert_eq!(m.total_length(), 4.0 * 4200.0 + 2.0 * 3600.0);
        assert!(!m.is_empty());

        let empty = LengthMultiset::new();
        assert!(empty.is_empty());
        assert_eq!(empty.max_length(), None);
        assert_eq!(empty.min_length(), None);
        assert_eq!(empty.to_string(), "{}");
    }
}
