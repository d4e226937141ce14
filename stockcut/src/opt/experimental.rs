use itertools::Itertools;
use log::{debug, info, warn};
use ordered_float::NotNan;

use crate::Result;
use crate::entities::{CuttingPattern, DisplayConfig, LengthMultiset, Plan, Strategy};
use crate::opt::{Packer, fits};

/// Keeps several bars open at once and, at every step, assigns the (piece, bar) pair
/// leaving the least capacity behind.
///
/// One bar of every stock length is opened up front. Whenever an untouched bar receives
/// its first piece, a fresh bar of the same length is opened if stock allows.
pub struct ExperimentalPacker {
    kerf: f64,
    available_stock: LengthMultiset,
    stock: LengthMultiset,
    demand: LengthMultiset,
    bars: Vec<OpenBar>,
    display: DisplayConfig,
    done: bool,
}

#[derive(Clone, Debug)]
struct OpenBar {
    length: NotNan<f64>,
    capacity: f64,
    pieces: LengthMultiset,
    used: bool,
}

impl OpenBar {
    fn new(length: NotNan<f64>) -> Self {
        Self {
            length,
            capacity: length.into_inner(),
            pieces: LengthMultiset::new(),
            used: false,
        }
    }
}

/// Best (piece, bar) pair found in a scan
#[derive(Clone, Copy, Debug)]
struct Assignment {
    bar_idx: usize,
    piece: NotNan<f64>,
    waste: f64,
}

impl ExperimentalPacker {
    pub fn new(
        stock: LengthMultiset,
        mut demand: LengthMultiset,
        kerf: f64,
        display: DisplayConfig,
    ) -> Self {
        demand.clean(0.0);
        Self {
            kerf,
            available_stock: stock.clone(),
            stock,
            demand,
            bars: vec![],
            display,
            done: false,
        }
    }

    /// Scans the open bars in the order they were opened and, per bar, the demanded pieces
    /// from long to short. The first pair reaching the minimal waste wins.
    fn best_assignment(&self) -> Option<Assignment> {
        let mut best: Option<Assignment> = None;
        for (bar_idx, bar) in self.bars.iter().enumerate() {
            for (piece, _) in self.demand.entries().filter(|(_, qty)| *qty > 0) {
                if !fits(piece.into_inner(), self.kerf, bar.capacity) {
                    continue;
                }
                let waste = bar.capacity - (piece.into_inner() + self.kerf);
                if best.is_none_or(|b| waste < b.waste) {
                    best = Some(Assignment {
                        bar_idx,
                        piece,
                        waste,
                    });
                }
            }
        }
        best
    }

    fn assign(&mut self, assignment: Assignment) {
        let Assignment { bar_idx, piece, .. } = assignment;
        let length = self.bars[bar_idx].length;
        if !self.bars[bar_idx].used && self.stock.get_key(length) > 0 {
            self.open_bar(length);
        }
        let bar = &mut self.bars[bar_idx];
        bar.capacity = f64::max(0.0, bar.capacity - (piece.into_inner() + self.kerf));
        bar.pieces.increment_key(piece);
        bar.used = true;
        self.demand.decrement_key(piece);
        self.demand.clean(0.0);
        debug!(
            "[EXPERIMENTAL] cutting {} from bar #{} of {} (capacity left: {})",
            piece, bar_idx, length, assignment.waste
        );
    }

    /// Opens a bar for every stock length which has no untouched bar open yet.
    /// Returns whether any bar was opened.
    fn refill(&mut self) -> bool {
        let lengths = self
            .stock
            .entries()
            .filter(|(_, qty)| *qty > 0)
            .map(|(length, _)| length)
            .filter(|length| !self.bars.iter().any(|b| !b.used && b.length == *length))
            .collect_vec();
        for &length in &lengths {
            self.open_bar(length);
        }
        if !lengths.is_empty() {
            debug!("[EXPERIMENTAL] opened bars: {}", lengths.iter().join(", "));
        }
        !lengths.is_empty()
    }

    fn open_bar(&mut self, length: NotNan<f64>) {
        self.stock.decrement_key(length);
        self.bars.push(OpenBar::new(length));
    }

    fn finish(&mut self) {
        self.done = true;
        info!(
            "[EXPERIMENTAL] finished: {} bars, {} pieces unassigned",
            self.bars.iter().filter(|b| b.used).count(),
            self.demand.cardinality()
        );
        if !self.demand.is_empty() {
            warn!(
                "[EXPERIMENTAL] unable to cut {} pieces: {}",
                self.demand.cardinality(),
                self.demand
            );
        }
    }
}

impl Packer for ExperimentalPacker {
    fn strategy(&self) -> Strategy {
        Strategy::Experimental
    }

    fn step(&mut self) -> Result<bool> {
        if self.done {
            return Ok(true);
        }
        if self.demand.is_empty() {
            self.finish();
            return Ok(true);
        }
        match self.best_assignment() {
            Some(assignment) => self.assign(assignment),
            None => {
                if !self.refill() {
                    self.finish();
                }
            }
        }
        Ok(self.done)
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn remaining_demand_count(&self) -> usize {
        self.demand.cardinality()
    }

    fn plan(&self) -> Result<Plan> {
        let mut plan = Plan::new(self.available_stock.clone(), self.display);
        for bar in self.bars.iter().filter(|b| b.used) {
            let pattern =
                CuttingPattern::new(bar.length.into_inner(), self.kerf, bar.pieces.clone())?;
            plan.append(pattern)?;
        }
        plan.set_remaining_demand(self.demand.clone())
            .set_method(Strategy::Experimental);
        Ok(plan)
    }
}
