//! Infrastructure layer - external concerns

pub mod database;
pub mod seed;
pub mod storage;

pub use database::{init_database, seed_demo_data, DatabaseConfig, SeaOrmRepositoryProvider};
pub use storage::InMemoryRepositories;
