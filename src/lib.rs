pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod use_cases;

pub use adapters::InMemoryBusinessStore;
pub use config::{Config, PopulationConfig};
pub use error::{AppError, AppResult};
pub use ports::{BusinessStore, StoreError, StoreResult};
