use std::collections::VecDeque;

use log::{debug, info};

use crate::entities::{DisplayConfig, LengthMultiset, Plan, Strategy};
use crate::opt::{ExperimentalPacker, GreedyPacker, Packer};
use crate::util::{CutMode, CutterConfig, assertions};
use crate::{CutError, Result};

/// Snapshot of the state of a [`Cutter`] after a call to [`Cutter::step`]
#[derive(Clone, Debug)]
pub struct Progress {
    /// Whether the cutter has finished
    pub done: bool,
    /// Packer which performed the step, or the one whose plan was selected once done
    pub strategy: Strategy,
    /// The selected plan, only present once done
    pub plan: Option<Plan>,
    /// Number of demanded pieces the active packer has not assigned yet
    pub remaining_demand_count: usize,
}

/// Cuts the demanded pieces from the stock, using the strategy selected by its [`CutMode`].
///
/// In [`CutMode::Opt`] both packers run to completion, one after the other, and the plan with
/// the least waste is kept. Greedy wins ties.
pub struct Cutter {
    stock: LengthMultiset,
    demand: LengthMultiset,
    kerf: f64,
    mode: CutMode,
    display: DisplayConfig,
    pending: VecDeque<Strategy>,
    active: Option<Box<dyn Packer>>,
    candidates: Vec<Plan>,
    result: Plan,
    done: bool,
}

impl Cutter {
    pub fn new(
        stock: LengthMultiset,
        demand: LengthMultiset,
        config: &CutterConfig,
    ) -> Result<Self> {
        let display =
            DisplayConfig::parse(config.precision, &config.source_unit, &config.target_unit)?;
        if !config.kerf.is_finite() || config.kerf < 0.0 {
            return Err(CutError::Configuration(format!(
                "kerf must be finite and non-negative, got {}",
                config.kerf
            )));
        }
        let pending = match config.mode {
            CutMode::Opt => VecDeque::from([Strategy::Greedy, Strategy::Experimental]),
            CutMode::Greedy => VecDeque::from([Strategy::Greedy]),
            CutMode::Experimental => VecDeque::from([Strategy::Experimental]),
        };
        let result = Plan::new(stock.clone(), display);
        Ok(Self {
            stock,
            demand,
            kerf: config.kerf,
            mode: config.mode,
            display,
            pending,
            active: None,
            candidates: vec![],
            result,
            done: false,
        })
    }

    /// Runs the selected strategy to completion and returns the resulting plan.
    pub fn run(&mut self) -> Result<&Plan> {
        while !self.step()?.done {}
        Ok(&self.result)
    }

    /// Performs one unit of work of the active packer.
    /// Once done, keeps returning the final snapshot.
    pub fn step(&mut self) -> Result<Progress> {
        if self.done {
            return Ok(self.final_progress());
        }
        let mut packer = match self.active.take() {
            Some(packer) => packer,
            None => {
                let Some(strategy) = self.pending.pop_front() else {
                    return self.select();
                };
                info!(
                    "[CUTTER] starting {strategy} on {} pieces and {} bars (kerf: {})",
                    self.demand.cardinality(),
                    self.stock.cardinality(),
                    self.kerf
                );
                self.packer(strategy)
            }
        };

        let finished = packer.step()?;
        let strategy = packer.strategy();
        let remaining_demand_count = packer.remaining_demand_count();
        if finished {
            let plan = packer.plan()?;
            debug_assert!(assertions::plan_conserves_demand(&self.demand, &plan));
            debug_assert!(assertions::plan_patterns_valid(&plan));
            debug_assert!(assertions::plan_respects_stock(&self.stock, &plan));
            info!(
                "[CUTTER] {strategy} finished with {} bars and a total waste of {}",
                plan.n_bars(),
                plan.raw_total_waste()
            );
            self.candidates.push(plan);
            if self.pending.is_empty() {
                return self.select();
            }
        } else {
            self.active = Some(packer);
        }
        Ok(Progress {
            done: false,
            strategy,
            plan: None,
            remaining_demand_count,
        })
    }

    /// The last computed plan, an empty one before the cutter has finished
    pub fn result(&self) -> &Plan {
        &self.result
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn mode(&self) -> CutMode {
        self.mode
    }

    pub fn kerf(&self) -> f64 {
        self.kerf
    }

    pub fn stock(&self) -> &LengthMultiset {
        &self.stock
    }

    pub fn demand(&self) -> &LengthMultiset {
        &self.demand
    }

    fn packer(&self, strategy: Strategy) -> Box<dyn Packer> {
        let (stock, demand) = (self.stock.clone(), self.demand.clone());
        match strategy {
            Strategy::Greedy => Box::new(GreedyPacker::new(stock, demand, self.kerf, self.display)),
            Strategy::Experimental => Box::new(ExperimentalPacker::new(
                stock,
                demand,
                self.kerf,
                self.display,
            )),
        }
    }

    /// Keeps the candidate plan with the least waste, the first one on ties.
    fn select(&mut self) -> Result<Progress> {
        let mut best: Option<Plan> = None;
        for plan in self.candidates.drain(..) {
            debug!(
                "[CUTTER] waste of {}: {}",
                plan.method().map_or("unknown", |m| m.name()),
                plan.raw_total_waste()
            );
            if best
                .as_ref()
                .is_none_or(|b| plan.raw_total_waste() < b.raw_total_waste())
            {
                best = Some(plan);
            }
        }
        if let Some(plan) = best {
            self.result = plan;
        }
        self.done = true;
        info!(
            "[CUTTER] selected {} ({} bars, total waste {}{}, completed: {})",
            self.result.method().map_or("nothing", |m| m.name()),
            self.result.n_bars(),
            self.result.total_waste(),
            self.result.length_unit_suffix(),
            self.result.completed()
        );
        Ok(self.final_progress())
    }

    fn final_progress(&self) -> Progress {
        Progress {
            done: true,
            strategy: self.result.method().unwrap_or(Strategy::Greedy),
            plan: Some(self.result.clone()),
            remaining_demand_count: self.result.raw_remaining_demand().cardinality(),
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use test_case::test_case;

    use super::Cutter;
    use crate::CutError;
    use crate::entities::{LengthMultiset, Strategy};
    use crate::util::{CutMode, CutterConfig, assertions};

    fn multiset(counts: &[(f64, usize)]) -> LengthMultiset {
        LengthMultiset::from_counts(counts.iter().copied()).unwrap()
    }

    fn cutter(stock: &[(f64, usize)], demand: &[(f64, usize)], kerf: f64, mode: CutMode) -> Cutter {
        Cutter::new(multiset(stock), multiset(demand), &CutterConfig::new(kerf, mode)).unwrap()
    }

    #[test_case(CutMode::Greedy)]
    #[test_case(CutMode::Experimental)]
    #[test_case(CutMode::Opt)]
    fn empty_demand(mode: CutMode) {
        let mut c = cutter(&[(2400.0, 2)], &[], 5.0, mode);
        let plan = c.run().unwrap();
        assert!(plan.completed());
        assert_eq!(plan.n_bars(), 0);
        assert_eq!(plan.total_waste(), 0.0);
    }

    #[test_case(CutMode::Greedy)]
    #[test_case(CutMode::Experimental)]
    #[test_case(CutMode::Opt)]
    fn empty_stock(mode: CutMode) {
        let mut c = cutter(&[], &[(1000.0, 1), (2000.0, 1)], 0.0, mode);
        let plan = c.run().unwrap();
        assert!(!plan.completed());
        assert_eq!(plan.remaining_demand().to_string(), "{2000: 1, 1000: 1}");
    }

    #[test_case(CutMode::Greedy)]
    #[test_case(CutMode::Experimental)]
    #[test_case(CutMode::Opt)]
    fn pieces_come_from_matching_bars(mode: CutMode) {
        let mut c = cutter(
            &[(500.0, 1), (1000.0, 1), (2000.0, 1)],
            &[(1000.0, 1), (2000.0, 1), (3000.0, 1)],
            0.0,
            mode,
        );
        let plan = c.run().unwrap();
        assert_eq!(plan.remaining_demand().to_string(), "{3000: 1}");
        assert_eq!(plan.remaining_stock().to_string(), "{500: 1}");
        assert_eq!(plan.used_stock().to_string(), "{2000: 1, 1000: 1}");
        for p in plan.patterns() {
            assert_eq!(p.pieces(), &LengthMultiset::from_scalar(p.stock_length()).unwrap());
        }
    }

    #[test_case(CutMode::Greedy)]
    #[test_case(CutMode::Experimental)]
    #[test_case(CutMode::Opt)]
    fn two_bars_with_kerf(mode: CutMode) {
        let _ = env_logger::builder().is_test(true).try_init();
        let demand = multiset(&[(600.0, 4), (1000.0, 2)]);
        let mut c = Cutter::new(
            multiset(&[(2400.0, 2)]),
            demand.clone(),
            &CutterConfig::new(5.0, mode),
        )
        .unwrap();
        let plan = c.run().unwrap();

        assert_eq!(plan.used_stock().to_string(), "{2400: 2}");
        assert!(assertions::plan_patterns_valid(plan));
        assert!(assertions::plan_conserves_demand(&demand, plan));
        let waste: f64 = plan
            .patterns()
            .iter()
            .map(|p| p.remaining_stock() + p.cuts() as f64 * 5.0)
            .sum();
        assert!(approx_eq!(f64, plan.total_waste(), waste));
        // {1000, 1000} fill the first bar, leaving room for three 600 pieces in the second
        assert_eq!(plan.remaining_demand().to_string(), "{600: 1}");
        assert!(!plan.completed());
    }

    #[test]
    fn opt_keeps_the_plan_with_least_waste() {
        let stock = [(10.0, 1), (9.0, 1), (6.0, 1)];
        let demand = [(6.0, 1), (5.0, 1), (4.0, 1)];

        let greedy = cutter(&stock, &demand, 0.0, CutMode::Greedy).run().unwrap().clone();
        let experimental = cutter(&stock, &demand, 0.0, CutMode::Experimental)
            .run()
            .unwrap()
            .clone();
        let opt = cutter(&stock, &demand, 0.0, CutMode::Opt).run().unwrap().clone();

        assert_eq!(greedy.total_waste(), 1.0);
        assert_eq!(experimental.total_waste(), 0.0);
        assert_eq!(opt.method(), Some(Strategy::Experimental));
        assert_eq!(opt, experimental);
        assert!(opt.total_waste() <= greedy.total_waste().min(experimental.total_waste()));
    }

    #[test]
    fn opt_prefers_greedy_on_ties() {
        let mut c = cutter(&[(2400.0, 2)], &[(600.0, 4), (1000.0, 2)], 5.0, CutMode::Opt);
        assert_eq!(c.run().unwrap().method(), Some(Strategy::Greedy));
    }

    #[test_case(CutMode::Greedy)]
    #[test_case(CutMode::Experimental)]
    #[test_case(CutMode::Opt)]
    fn stepping_matches_running(mode: CutMode) {
        let stock = [(3600.0, 3), (2400.0, 4), (1200.0, 2)];
        let demand = [(1500.0, 3), (900.0, 5), (600.0, 6), (250.0, 4)];
        let mut ran = cutter(&stock, &demand, 3.0, mode);
        let expected = ran.run().unwrap().clone();

        let mut stepped = cutter(&stock, &demand, 3.0, mode);
        let mut n_steps = 0;
        let progress = loop {
            let progress = stepped.step().unwrap();
            n_steps += 1;
            if progress.done {
                break progress;
            }
            assert!(progress.plan.is_none());
        };
        assert!(n_steps > 1);
        assert_eq!(progress.plan.as_ref(), Some(&expected));
        assert_eq!(stepped.result(), &expected);
        assert_eq!(progress.remaining_demand_count, expected.remaining_demand().cardinality());
    }

    #[test]
    fn steps_after_completion_repeat_the_final_snapshot() {
        let mut c = cutter(&[(1000.0, 2)], &[(400.0, 3)], 0.0, CutMode::Greedy);
        let plan = c.run().unwrap().clone();
        for _ in 0..3 {
            let progress = c.step().unwrap();
            assert!(progress.done);
            assert_eq!(progress.strategy, Strategy::Greedy);
            assert_eq!(progress.plan, Some(plan.clone()));
        }
        assert!(c.is_done());
    }

    #[test]
    fn inputs_are_not_modified() {
        let stock = multiset(&[(2400.0, 2)]);
        let demand = multiset(&[(600.0, 4), (1000.0, 2)]);
        let mut c = Cutter::new(stock.clone(), demand.clone(), &CutterConfig::default()).unwrap();
        c.run().unwrap();
        assert_eq!(c.stock(), &stock);
        assert_eq!(c.demand(), &demand);
        assert_eq!(c.mode(), CutMode::Opt);
        assert_eq!(c.kerf(), 0.0);
    }

    #[test]
    fn result_before_running_is_empty() {
        let c = cutter(&[(2400.0, 2)], &[(600.0, 4)], 0.0, CutMode::Opt);
        assert_eq!(c.result().n_bars(), 0);
        assert_eq!(c.result().method(), None);
        assert_eq!(c.result().remaining_stock().to_string(), "{2400: 2}");
    }

    #[test]
    fn display_units_apply_to_the_result() {
        let config =
            CutterConfig::new(5.0, CutMode::Greedy).with_display(2, "MILLIMETERS", "METERS");
        let mut c =
            Cutter::new(multiset(&[(2400.0, 1)]), multiset(&[(1000.0, 2)]), &config).unwrap();
        let plan = c.run().unwrap();
        assert_eq!(plan.used_stock().to_string(), "{2.4: 1}");
        assert!(approx_eq!(f64, plan.total_waste(), 0.4));
        assert_eq!(plan.length_unit_suffix(), "m");
    }

    #[test_case(CutterConfig::new(-1.0, CutMode::Opt); "negative kerf")]
    #[test_case(CutterConfig::new(f64::NAN, CutMode::Opt); "nan kerf")]
    #[test_case(CutterConfig::default().with_display(0, "FURLONGS", "METERS"); "unknown unit")]
    #[test_case(CutterConfig::default().with_display(16, "NONE", "NONE"); "precision")]
    fn invalid_configuration(config: CutterConfig) {
        let result = Cutter::new(multiset(&[(2400.0, 1)]), multiset(&[(1000.0, 1)]), &config);
        assert!(matches!(result, Err(CutError::Configuration(_))));
    }
}
