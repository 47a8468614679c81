pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{toml_config::TomlConfig, RentalConfig};

pub use crate::adapters::RentalApiClient;
pub use crate::core::{availability::AvailabilityFilter, desk::BookingDesk};
pub use crate::utils::error::{RentalError, Result};
