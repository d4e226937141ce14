mod export;
mod import;

/// External (serializable) representations of cutting stock related entities.
pub mod ext_repr;

#[doc(inline)]
pub use export::export;

#[doc(inline)]
pub use export::export_lengths;

#[doc(inline)]
pub use import::import;

#[doc(inline)]
pub use import::import_lengths;
