pub mod errors;
pub mod rounding;
pub mod shutdown;
