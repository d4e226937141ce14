use std::fmt::Display;

use itertools::Itertools;
use log::debug;

use crate::entities::{CuttingPattern, DisplayConfig, LengthMultiset, round_to};
use crate::{CutError, Result};

/// Packing strategy which produced a [`Plan`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Greedy,
    Experimental,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Greedy => "Greedy Cut",
            Strategy::Experimental => "Experimental",
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A [`CuttingPattern`] together with the number of bars it has to be cut from.
///
/// `pattern` is expressed in the target unit. `remaining_stock` is derived from it, `waste`
/// from the unscaled pattern. Both are rounded to the display precision.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternGroup {
    pub pattern: CuttingPattern,
    pub count: usize,
    /// Offcut of a single bar
    pub remaining_stock: f64,
    /// Offcut plus kerf of a single bar
    pub waste: f64,
}

/// Outcome of a cutting run: the patterns to cut, the demand left unsatisfied and the waste.
///
/// Lengths are stored as provided (in the source unit).
/// All public accessors, except the `raw_*` ones and [`Plan::patterns`], report figures
/// converted to the target unit of the [`DisplayConfig`] and rounded to its precision.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Plan {
    available_stock: LengthMultiset,
    used_stock: LengthMultiset,
    remaining_demand: LengthMultiset,
    total_waste: f64,
    patterns: Vec<CuttingPattern>,
    method: Option<Strategy>,
    display: DisplayConfig,
}

impl Plan {
    pub fn new(available_stock: LengthMultiset, display: DisplayConfig) -> Self {
        Self {
            available_stock,
            display,
            ..Self::default()
        }
    }

    /// Adds a pattern to the plan.
    /// Invalid patterns are rejected with [`CutError::Validation`], leaving the plan untouched.
    pub fn append(&mut self, pattern: CuttingPattern) -> Result<&mut Self> {
        if !pattern.is_valid() {
            return Err(CutError::Validation(format!(
                "pieces and cuts exceed the stock length:\n{pattern}"
            )));
        }
        self.used_stock
            .increment(pattern.stock_length())
            .map_err(|e| CutError::Validation(e.to_string()))?;
        self.total_waste +=
            pattern.remaining_stock() + pattern.cuts() as f64 * pattern.kerf_width();
        debug!(
            "[PLAN] appended bar of {} ({} pieces), total waste: {}",
            pattern.stock_length(),
            pattern.pieces().cardinality(),
            self.total_waste
        );
        self.patterns.push(pattern);
        Ok(self)
    }

    pub fn set_remaining_demand(&mut self, remaining_demand: LengthMultiset) -> &mut Self {
        self.remaining_demand = remaining_demand;
        self
    }

    pub fn set_method(&mut self, method: Strategy) -> &mut Self {
        self.method = Some(method);
        self
    }

    /// Number of bars of each stock length the plan consumes
    pub fn used_stock(&self) -> LengthMultiset {
        self.scale_multiset(&self.used_stock)
    }

    /// Pieces which could not be cut from the available stock
    pub fn remaining_demand(&self) -> LengthMultiset {
        self.scale_multiset(&self.remaining_demand)
    }

    pub fn available_stock(&self) -> LengthMultiset {
        self.scale_multiset(&self.available_stock)
    }

    /// Stock bars left untouched by the plan
    pub fn remaining_stock(&self) -> LengthMultiset {
        let mut remaining = &self.available_stock - &self.used_stock;
        remaining.clean(0.0);
        self.scale_multiset(&remaining)
    }

    /// Offcuts plus the kerf of every cut, summed over all bars
    pub fn total_waste(&self) -> f64 {
        self.display.scale(self.total_waste)
    }

    /// Whether all demand has been satisfied
    pub fn completed(&self) -> bool {
        self.remaining_demand.is_empty()
    }

    /// Structurally equal patterns merged into groups, sorted by descending stock length,
    /// descending count and ascending offcut.
    pub fn cut_pattern_list(&self) -> Vec<PatternGroup> {
        let mut groups: Vec<(&CuttingPattern, usize)> = vec![];
        for pattern in &self.patterns {
            match groups.iter_mut().find(|(p, _)| *p == pattern) {
                Some((_, count)) => *count += 1,
                None => groups.push((pattern, 1)),
            }
        }
        //stable sort: full ties keep the order in which the patterns were appended
        groups
            .into_iter()
            .sorted_by(|(a, a_count), (b, b_count)| {
                b.stock_length()
                    .total_cmp(&a.stock_length())
                    .then(b_count.cmp(a_count))
                    .then(a.remaining_stock().total_cmp(&b.remaining_stock()))
            })
            .map(|(pattern, count)| {
                let scaled = pattern.scaled(|l| self.display.scale(l));
                PatternGroup {
                    remaining_stock: round_to(scaled.remaining_stock(), self.display.precision()),
                    waste: self.display.scale(pattern.waste()),
                    pattern: scaled,
                    count,
                }
            })
            .collect_vec()
    }

    pub fn method(&self) -> Option<Strategy> {
        self.method
    }

    pub fn display(&self) -> DisplayConfig {
        self.display
    }

    /// Suffix of the unit reported figures are expressed in
    pub fn length_unit_suffix(&self) -> &'static str {
        self.display.target_unit().suffix()
    }

    /// The appended patterns in their original order and unit
    pub fn patterns(&self) -> &[CuttingPattern] {
        &self.patterns
    }

    /// Total waste in the source unit, without rounding
    pub fn raw_total_waste(&self) -> f64 {
        self.total_waste
    }

    /// Remaining demand in the source unit
    pub fn raw_remaining_demand(&self) -> &LengthMultiset {
        &self.remaining_demand
    }

    /// Number of bars consumed
    pub fn n_bars(&self) -> usize {
        self.patterns.len()
    }

    fn scale_multiset(&self, multiset: &LengthMultiset) -> LengthMultiset {
        multiset.scaled(|l| self.display.scale(l))
    }
}
