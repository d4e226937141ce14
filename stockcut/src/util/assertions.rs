use log::error;

use crate::entities::{LengthMultiset, Plan};
use crate::util::FPA;

//Various checks to verify correctness of the state of the system
//Used in debug_assert!() blocks and tests

/// Every piece of `demand` is either cut by a pattern of the plan or still part of its remaining demand.
pub fn plan_conserves_demand(demand: &LengthMultiset, plan: &Plan) -> bool {
    let mut accounted = plan.raw_remaining_demand().clone();
    for pattern in plan.patterns() {
        accounted.add(pattern.pieces());
    }
    accounted.clean(0.0);
    let mut expected = demand.clone();
    expected.clean(0.0);

    if accounted != expected {
        error!("demand not conserved: expected {expected}, packed + remaining {accounted}");
        return false;
    }
    true
}

/// No pattern of the plan holds more than its bar can carry.
pub fn plan_patterns_valid(plan: &Plan) -> bool {
    plan.patterns().iter().all(|p| {
        let valid = p.is_valid();
        if !valid {
            error!("invalid pattern in plan: {p}");
        }
        valid
    })
}

/// The plan does not cut more bars of a length than are available.
pub fn plan_respects_stock(stock: &LengthMultiset, plan: &Plan) -> bool {
    let mut used = LengthMultiset::new();
    for pattern in plan.patterns() {
        //stock lengths of a valid pattern are valid keys
        if used.increment(pattern.stock_length()).is_err() {
            return false;
        }
    }
    used.iter().all(|(length, qty)| {
        let ok = qty <= stock.get(length);
        if !ok {
            error!("{qty} bars of {length} used, only {} available", stock.get(length));
        }
        ok
    })
}

/// The accumulated waste of the plan matches the sum of the waste of its patterns.
pub fn plan_waste_consistent(plan: &Plan) -> bool {
    let summed: f64 = plan.patterns().iter().map(|p| p.waste()).sum();
    FPA(summed) == FPA(plan.raw_total_waste())
}
