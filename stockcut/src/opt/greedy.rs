use itertools::Itertools;
use log::{debug, info, warn};
use ordered_float::NotNan;

use crate::Result;
use crate::entities::{CuttingPattern, DisplayConfig, LengthMultiset, Plan, Strategy};
use crate::opt::{Packer, fits};

/// Fills one bar at a time.
///
/// Every round simulates filling a single bar of each stock length still available,
/// packing the longest demanded pieces first, and commits the bar which wastes the least.
pub struct GreedyPacker {
    kerf: f64,
    stock: LengthMultiset,
    demand: LengthMultiset,
    plan: Plan,
    round: Option<Round>,
    done: bool,
}

/// Evaluation of one bar of every available stock length
struct Round {
    candidates: Vec<NotNan<f64>>,
    next: usize,
    best: Option<BarFill>,
}

/// Simulated contents of a single bar
#[derive(Debug)]
struct BarFill {
    stock_length: NotNan<f64>,
    pieces: LengthMultiset,
    waste: f64,
}

impl GreedyPacker {
    pub fn new(
        stock: LengthMultiset,
        mut demand: LengthMultiset,
        kerf: f64,
        display: DisplayConfig,
    ) -> Self {
        demand.clean(0.0);
        let plan = Plan::new(stock.clone(), display);
        Self {
            kerf,
            stock,
            demand,
            plan,
            round: None,
            done: false,
        }
    }

    fn commit(&mut self, fill: BarFill) -> Result<()> {
        self.stock.decrement_key(fill.stock_length);
        self.demand.subtract(&fill.pieces);
        self.demand.clean(0.0);
        debug!(
            "[GREEDY] cutting {} from a bar of {} (waste: {})",
            fill.pieces, fill.stock_length, fill.waste
        );
        let pattern = CuttingPattern::new(fill.stock_length.into_inner(), self.kerf, fill.pieces)?;
        self.plan.append(pattern)?;
        Ok(())
    }

    fn finish(&mut self) {
        self.done = true;
        self.round = None;
        info!(
            "[GREEDY] finished: {} bars, total waste {}",
            self.plan.n_bars(),
            self.plan.raw_total_waste()
        );
        if !self.demand.is_empty() {
            warn!("[GREEDY] unable to cut {} pieces: {}", self.demand.cardinality(), self.demand);
        }
    }
}

impl Packer for GreedyPacker {
    fn strategy(&self) -> Strategy {
        Strategy::Greedy
    }

    fn step(&mut self) -> Result<bool> {
        if self.done {
            return Ok(true);
        }
        if self.demand.is_empty() {
            self.finish();
            return Ok(true);
        }
        let round = self.round.get_or_insert_with(|| Round::new(&self.stock));
        let Some(&stock_length) = round.candidates.get(round.next) else {
            //no stock left to evaluate
            self.finish();
            return Ok(true);
        };

        let fill = fill_bar(stock_length, &self.demand, self.kerf);
        let improves = !fill.pieces.is_empty()
            && round.best.as_ref().is_none_or(|best| fill.waste < best.waste);
        if improves {
            round.best = Some(fill);
        }
        round.next += 1;
        if round.next < round.candidates.len() {
            return Ok(false);
        }

        //last candidate of the round evaluated: commit the best one or stop
        match self.round.take().and_then(|r| r.best) {
            Some(best) => {
                self.commit(best)?;
                if self.demand.is_empty() || self.stock.is_empty() {
                    self.finish();
                }
            }
            None => self.finish(),
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
        let mut plan = self.plan.clone();
        plan.set_remaining_demand(self.demand.clone())
            .set_method(Strategy::Greedy);
        Ok(plan)
    }
}

impl Round {
    fn new(stock: &LengthMultiset) -> Self {
        let candidates = stock
            .entries()
            .filter(|(_, qty)| *qty > 0)
            .map(|(length, _)| length)
            .collect_vec();
        Self {
            candidates,
            next: 0,
            best: None,
        }
    }
}

/// Packs the demand into a single bar, longest pieces first.
fn fill_bar(stock_length: NotNan<f64>, demand: &LengthMultiset, kerf: f64) -> BarFill {
    let mut capacity = stock_length.into_inner();
    let mut pieces = LengthMultiset::new();
    let mut n_cuts = 0;
    for (piece, qty) in demand.entries() {
        let mut left = qty;
        while left > 0 && fits(piece.into_inner(), kerf, capacity) {
            capacity -= piece.into_inner() + kerf;
            pieces.increment_key(piece);
            left -= 1;
            n_cuts += 1;
        }
    }
    BarFill {
        stock_length,
        pieces,
        waste: f64::max(0.0, capacity) + kerf * n_cuts as f64,
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use ordered_float::NotNan;

    use super::{GreedyPacker, fill_bar};
    use crate::entities::{DisplayConfig, LengthMultiset};
    use crate::opt::Packer;
    use crate::util::assertions;

    fn packer(stock: &[(f64, usize)], demand: &[(f64, usize)], kerf: f64) -> GreedyPacker {
        GreedyPacker::new(
            LengthMultiset::from_counts(stock.iter().copied()).unwrap(),
            LengthMultiset::from_counts(demand.iter().copied()).unwrap(),
            kerf,
            DisplayConfig::default(),
        )
    }

    #[test]
    fn bar_is_filled_longest_first() {
        let demand = LengthMultiset::from_counts([(600.0, 4), (1000.0, 2)]).unwrap();
        let fill = fill_bar(NotNan::new(2400.0).unwrap(), &demand, 5.0);
        assert_eq!(fill.pieces.to_string(), "{1000: 2}");
        assert!(approx_eq!(f64, fill.waste, 400.0));
    }

    #[test]
    fn matching_bars_are_chosen() {
        let mut p = packer(
            &[(500.0, 1), (1000.0, 1), (2000.0, 1)],
            &[(1000.0, 1), (2000.0, 1), (3000.0, 1)],
            0.0,
        );
        let plan = p.run().unwrap();
        assert_eq!(plan.remaining_demand().to_string(), "{3000: 1}");
        assert_eq!(plan.remaining_stock().to_string(), "{500: 1}");
        let cut = plan
            .patterns()
            .iter()
            .map(|p| (p.stock_length(), p.pieces().to_string()))
            .collect::<Vec<_>>();
        assert_eq!(
            cut,
            vec![
                (2000.0, "{2000: 1}".to_string()),
                (1000.0, "{1000: 1}".to_string())
            ]
        );
        assert_eq!(plan.total_waste(), 0.0);
    }

    #[test]
    fn one_step_per_candidate() {
        let mut p = packer(&[(500.0, 1), (1000.0, 1), (2000.0, 1)], &[(400.0, 1)], 0.0);
        // three candidates in the first round, the last one commits the 500 bar
        assert!(!p.step().unwrap());
        assert!(!p.step().unwrap());
        assert_eq!(p.remaining_demand_count(), 1);
        assert!(p.step().unwrap());
        assert!(p.is_done());
        assert!(p.step().unwrap());

        let plan = p.plan().unwrap();
        assert_eq!(plan.used_stock().to_string(), "{500: 1}");
        assert!(plan.completed());
    }

    #[test]
    fn candidates_without_pieces_are_never_chosen() {
        // the empty 100 bar wastes less than the filled 2400 bar
        let mut p = packer(&[(2400.0, 1), (100.0, 1)], &[(1000.0, 2)], 5.0);
        let plan = p.run().unwrap();
        assert_eq!(plan.used_stock().to_string(), "{2400: 1}");
        assert!(plan.completed());
    }

    #[test]
    fn incomplete_scenario() {
        let _ = env_logger::builder().is_test(true).try_init();
        let demand = LengthMultiset::from_counts([(600.0, 4), (1000.0, 2)]).unwrap();
        let mut p = GreedyPacker::new(
            LengthMultiset::from_counts([(2400.0, 2)]).unwrap(),
            demand.clone(),
            5.0,
            DisplayConfig::default(),
        );
        let plan = p.run().unwrap();

        assert_eq!(plan.n_bars(), 2);
        assert_eq!(plan.remaining_demand().to_string(), "{600: 1}");
        assert!(!plan.completed());
        assert!(approx_eq!(f64, plan.raw_total_waste(), 1000.0));
        assert!(assertions::plan_conserves_demand(&demand, &plan));
        assert!(assertions::plan_patterns_valid(&plan));
        assert!(assertions::plan_waste_consistent(&plan));
    }

    #[test]
    fn empty_demand_finishes_on_the_first_step() {
        let mut p = packer(&[(500.0, 1), (1000.0, 1), (2400.0, 2)], &[], 5.0);
        assert!(p.step().unwrap());
        assert!(p.is_done());
        let plan = p.plan().unwrap();
        assert_eq!(plan.n_bars(), 0);
        assert_eq!(plan.remaining_stock().to_string(), "{2400: 2, 1000: 1, 500: 1}");
    }

    #[test]
    fn empty_inputs() {
        let plan = packer(&[(2400.0, 2)], &[], 5.0).run().unwrap();
        assert!(plan.completed());
        assert_eq!(plan.n_bars(), 0);
        assert_eq!(plan.total_waste(), 0.0);

        let plan = packer(&[], &[(1000.0, 1), (2000.0, 1)], 5.0).run().unwrap();
        assert!(!plan.completed());
        assert_eq!(plan.remaining_demand().to_string(), "{2000: 1, 1000: 1}");
    }
}
