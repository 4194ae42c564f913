//! Configuration loading for the bakery back office.
//!
//! Loads the business profile, attendance and register rules, and the staff
//! directory from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use bakery_pos::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/bakery").unwrap();
//! println!("Work starts at {}", config.attendance().work_start);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendancePolicy, BakeryConfig, CashPolicy, StaffConfig, StaffEntry, SystemProfile,
};
