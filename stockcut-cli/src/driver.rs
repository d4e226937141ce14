use anyhow::Result;
use log::{info, warn};
use stockcut::entities::{Instance, Plan};
use stockcut::opt::Cutter;
use thousands::Separable;

use crate::config::CliConfig;

/// Steps a [`Cutter`] through the instance, logging the progress along the way.
pub fn solve(instance: &Instance, config: &CliConfig) -> Result<Plan> {
    let mut cutter = Cutter::new(instance.stock.clone(), instance.demand.clone(), &config.cutter)?;
    info!(
        "[MAIN] cutting {} pieces from {} bars ({} mode)",
        instance.demand.cardinality().separate_with_commas(),
        instance.stock.cardinality().separate_with_commas(),
        cutter.mode()
    );

    let interval = config.progress_interval.max(1);
    let mut n_steps: usize = 0;
    let plan = loop {
        let progress = cutter.step()?;
        n_steps += 1;
        if let Some(plan) = progress.plan {
            break plan;
        }
        if n_steps % interval == 0 {
            info!(
                "[MAIN] step {}: {} has {} pieces left to assign",
                n_steps.separate_with_commas(),
                progress.strategy,
                progress.remaining_demand_count.separate_with_commas()
            );
        }
    };

    info!(
        "[MAIN] finished after {} steps in {:.3}ms",
        n_steps.separate_with_commas(),
        crate::EPOCH.elapsed().as_secs_f64() * 1000.0
    );
    log_plan(&plan);
    Ok(plan)
}

fn log_plan(plan: &Plan) {
    let suffix = plan.length_unit_suffix();
    for group in plan.cut_pattern_list() {
        let p = &group.pattern;
        info!(
            "[MAIN] {} x {}{suffix}: {} (offcut: {}{suffix})",
            group.count,
            p.stock_length(),
            p.pieces(),
            group.remaining_stock
        );
    }
    info!(
        "[MAIN] total waste: {}{suffix}, unused stock: {}",
        plan.total_waste(),
        plan.remaining_stock()
    );
    if !plan.completed() {
        warn!("[MAIN] insufficient stock, pieces left: {}", plan.remaining_demand());
    }
}
