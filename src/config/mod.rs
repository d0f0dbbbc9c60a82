//! Configuration loading and management for the Jornada Engine.
//!
//! This module provides functionality to load the company catalog from YAML
//! files (contract types, absence types, annual rules, holidays, groups) and
//! the server settings read from the environment.
//!
//! # Example
//!
//! ```no_run
//! use jornada_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded company: {}", config.config().company().name);
//! ```

mod loader;
mod settings;
mod types;

pub use loader::ConfigLoader;
pub use settings::ServerSettings;
pub use types::{
    AbsenceType, AnnualConfiguration, CompanyMetadata, ContractType, EmployeeGroup, Holiday,
    HolidayType, HrConfig, VacationDayMode,
};
