//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the bakery
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{PosError, PosResult};
use crate::models::StaffMember;

use super::types::{
    AttendancePolicy, BakeryConfig, CashPolicy, StaffConfig, StaffEntry, SystemProfile,
};

/// Loads and provides access to the bakery configuration.
///
/// # Directory Structure
///
/// ```text
/// config/bakery/
/// ├── system.yaml      # Public business profile
/// ├── attendance.yaml  # Start of day, break allowances
/// ├── cash.yaml        # Register snapshot settings
/// └── staff.yaml       # Staff directory and session tokens
/// ```
///
/// # Example
///
/// ```no_run
/// use bakery_pos::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/bakery")?;
/// println!("Loaded profile for {}", loader.system().business_name);
/// # Ok::<(), bakery_pos::error::PosError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: BakeryConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any file is missing or contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> PosResult<Self> {
        let path = path.as_ref();

        let system = Self::load_yaml::<SystemProfile>(&path.join("system.yaml"))?;
        let attendance = Self::load_yaml::<AttendancePolicy>(&path.join("attendance.yaml"))?;
        let cash = Self::load_yaml::<CashPolicy>(&path.join("cash.yaml"))?;
        let staff = Self::load_yaml::<StaffConfig>(&path.join("staff.yaml"))?;

        tracing::debug!(
            path = %path.display(),
            staff_count = staff.staff.len(),
            "Configuration loaded"
        );

        Ok(Self::new(BakeryConfig {
            system,
            attendance,
            cash,
            staff: staff.staff,
        }))
    }

    /// Wraps an already-built configuration.
    pub fn new(config: BakeryConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PosResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PosError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PosError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &BakeryConfig {
        &self.config
    }

    /// Returns the public business profile.
    pub fn system(&self) -> &SystemProfile {
        &self.config.system
    }

    /// Returns the attendance rules.
    pub fn attendance(&self) -> &AttendancePolicy {
        &self.config.attendance
    }

    /// Returns the cash register rules.
    pub fn cash(&self) -> &CashPolicy {
        &self.config.cash
    }

    /// Resolves a session token to an active staff member.
    ///
    /// Unknown tokens and disabled accounts are both reported as
    /// [`PosError::Unauthenticated`].
    pub fn authenticate(&self, token: &str) -> PosResult<StaffMember> {
        self.config
            .staff
            .iter()
            .find(|entry| entry.active && !token.is_empty() && entry.session_token == token)
            .map(StaffEntry::member)
            .ok_or(PosError::Unauthenticated)
    }

    /// Looks up an active staff member by id.
    pub fn find_staff(&self, id: &str) -> PosResult<StaffMember> {
        self.config
            .staff
            .iter()
            .find(|entry| entry.active && entry.id == id)
            .map(StaffEntry::member)
            .ok_or_else(|| PosError::NotFound {
                entity: "Employee",
                id: id.to_string(),
            })
    }
}
