mod cutter;
mod experimental;
mod greedy;

#[doc(inline)]
pub use cutter::{Cutter, Progress};

#[doc(inline)]
pub use experimental::ExperimentalPacker;

#[doc(inline)]
pub use greedy::GreedyPacker;

#[doc(inline)]
pub use crate::entities::Strategy;

use crate::Result;
use crate::entities::Plan;
use crate::util::FPA;

/// A packing heuristic which can be driven one unit of work at a time.
pub trait Packer {
    fn strategy(&self) -> Strategy;

    /// Performs one unit of work. Returns `true` once the packer has finished,
    /// further calls are no-ops returning `true`.
    fn step(&mut self) -> Result<bool>;

    fn is_done(&self) -> bool;

    /// Number of demanded pieces not yet assigned to a bar
    fn remaining_demand_count(&self) -> usize;

    /// The plan built so far. Complete once the packer is done.
    fn plan(&self) -> Result<Plan>;

    /// Steps until done and returns the final plan.
    fn run(&mut self) -> Result<Plan> {
        while !self.step()? {}
        self.plan()
    }
}

/// Whether a piece, followed by a cut, fits in the remaining capacity of a bar.
pub fn fits(piece: f64, kerf: f64, capacity: f64) -> bool {
    FPA(piece + kerf) <= FPA(capacity)
}
