mod cutting_pattern;
mod instance;
pub(crate) mod length_multiset;
mod plan;
mod units;

#[doc(inline)]
pub use length_multiset::LengthMultiset;

#[doc(inline)]
pub use cutting_pattern::CuttingPattern;

#[doc(inline)]
pub use instance::Instance;

#[doc(inline)]
pub use plan::Plan;

#[doc(inline)]
pub use plan::PatternGroup;

#[doc(inline)]
pub use plan::Strategy;

#[doc(inline)]
pub use units::DisplayConfig;

#[doc(inline)]
pub use units::LengthUnit;

#[doc(inline)]
pub use units::MAX_PRECISION;

#[doc(inline)]
pub use units::round_to;
