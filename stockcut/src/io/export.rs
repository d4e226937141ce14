use crate::entities::{LengthMultiset, Plan};
use crate::io::ext_repr::{ExtLengthQty, ExtPattern, ExtPlan};

/// Exports a plan out of the library, with all figures as reported by the plan's accessors
pub fn export(plan: &Plan) -> ExtPlan {
    let patterns = plan
        .cut_pattern_list()
        .into_iter()
        .map(|group| {
            let p = &group.pattern;
            ExtPattern {
                count: group.count,
                stock_length: p.stock_length(),
                kerf_width: p.kerf_width(),
                cuts: p.cuts(),
                pieces: p.pieces().lengths().collect(),
                remaining_stock: group.remaining_stock,
                waste: group.waste,
            }
        })
        .collect();

    ExtPlan {
        method: plan.method().map(|m| m.name().to_string()),
        completed: plan.completed(),
        unit_suffix: plan.length_unit_suffix().to_string(),
        total_waste: plan.total_waste(),
        patterns,
        used_stock: export_lengths(&plan.used_stock()),
        remaining_stock: export_lengths(&plan.remaining_stock()),
        remaining_demand: export_lengths(&plan.remaining_demand()),
    }
}

/// Lengths with a non-zero quantity, longest first
pub fn export_lengths(multiset: &LengthMultiset) -> Vec<ExtLengthQty> {
    multiset
        .iter()
        .filter(|(_, qty)| *qty > 0)
        .map(|(length, qty)| ExtLengthQty { length, qty })
        .collect()
}
