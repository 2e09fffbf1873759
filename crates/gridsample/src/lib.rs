#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use gridsample_grid as grid;

#[doc(inline)]
pub use gridsample_resample as resample;
