//! Driver aggregate
//!
//! Driver profiles are owned by master-data administration; the costing
//! engine only reads them.

pub mod model;
pub mod repository;

pub use model::{DriverProfile, DriverType, OoZone};
pub use repository::DriverRepository;
