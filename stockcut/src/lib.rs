//! One-dimensional cutting stock engine.
//!
//! Given stock bars (lengths with finite quantities), demanded pieces (lengths with required
//! quantities) and a kerf, a [`Cutter`](opt::Cutter) produces a [`Plan`](entities::Plan) assigning
//! pieces to bars while trying to minimize the wasted material.

/// Entities to model the cutting stock problem: multisets, patterns and plans
pub mod entities;

/// The packing heuristics and the [`Cutter`](opt::Cutter) orchestrating them
pub mod opt;

/// Importing problem instances into and exporting plans out of this library
pub mod io;

/// Helper functions which do not belong to any specific module
pub mod util;

mod error;

#[doc(inline)]
pub use error::CutError;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, CutError>;
