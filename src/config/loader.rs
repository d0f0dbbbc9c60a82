//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the company
//! catalog from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{
    AbsenceTypesConfig, AnnualConfiguration, CompanyMetadata, ContractTypesConfig, GroupsConfig,
    HolidayCalendar, HrConfig,
};

/// Loads and provides access to the company catalog.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// into an [`HrConfig`], which the store then owns.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── company.yaml          # Company metadata and admin allow-list
/// ├── contract_types.yaml   # Contract type catalog
/// ├── absence_types.yaml    # Absence type catalog
/// ├── groups.yaml           # Employee groups (optional)
/// ├── annual/
/// │   └── 2025.yaml         # One annual configuration per file
/// └── holidays/
///     └── 2025.yaml         # Holiday calendars (optional directory)
/// ```
///
/// # Example
///
/// ```no_run
/// use jornada_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let contract = &loader.config().contract_types()["full_time"];
/// println!("Contract: {}", contract.name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: HrConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The annual directory holds no configuration
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let company = Self::load_yaml::<CompanyMetadata>(&path.join("company.yaml"))?;
        let contract_types =
            Self::load_yaml::<ContractTypesConfig>(&path.join("contract_types.yaml"))?;
        let absence_types =
            Self::load_yaml::<AbsenceTypesConfig>(&path.join("absence_types.yaml"))?;

        let groups_path = path.join("groups.yaml");
        let groups = if groups_path.exists() {
            Self::load_yaml::<GroupsConfig>(&groups_path)?.groups
        } else {
            Vec::new()
        };

        let annual = Self::load_dir::<AnnualConfiguration>(&path.join("annual"))?;
        if annual.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no annual files found)", path.join("annual").display()),
            });
        }
        for year in &annual {
            year.validate().map_err(|e| EngineError::ConfigParseError {
                path: path.join("annual").join(format!("{}.yaml", year.year)).display().to_string(),
                message: e.to_string(),
            })?;
        }

        let holidays_dir = path.join("holidays");
        let holidays = if holidays_dir.exists() {
            Self::load_dir::<HolidayCalendar>(&holidays_dir)?
                .into_iter()
                .flat_map(|calendar| calendar.holidays)
                .collect()
        } else {
            Vec::new()
        };

        tracing::debug!(
            path = %path.display(),
            contract_types = contract_types.contract_types.len(),
            absence_types = absence_types.absence_types.len(),
            years = annual.len(),
            "Loaded configuration"
        );

        let config = HrConfig::new(
            company,
            contract_types.contract_types,
            absence_types.absence_types,
            annual,
            holidays,
            groups,
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every `.yaml` file of a directory.
    fn load_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> EngineResult<Vec<T>> {
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|p| Self::load_yaml::<T>(p)).collect()
    }

    /// Returns the loaded catalog.
    pub fn config(&self) -> &HrConfig {
        &self.config
    }

    /// Consumes the loader, returning the catalog.
    pub fn into_config(self) -> HrConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    use crate::config::{HolidayType, VacationDayMode};

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.config().company().name, "Comercial Ejemplo S.L.");
        assert!(loader.config().company().is_admin_email("admin@example.com"));
    }

    #[test]
    fn test_contract_type_flags() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let contract = loader.config().contract_types().get("full_time").unwrap();
        assert_eq!(contract.name, "Indefinido tiempo completo");
        assert!(contract.computes_ordinary_bag);
        assert!(contract.computes_holiday_bag);
        assert!(contract.computes_off_day_bag);
    }

    #[test]
    fn test_unknown_contract_type_is_absent() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert!(loader.config().contract_types().get("unknown").is_none());
    }

    #[test]
    fn test_absence_type_flags() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let vacation = &loader.config().absence_types()["vacaciones"];
        assert!(vacation.counts_as_vacation);
        assert!(!vacation.is_absence_splittable);

        let medical = &loader.config().absence_types()["medico"];
        assert!(medical.is_absence_splittable);

        let leave = &loader.config().absence_types()["excedencia"];
        assert!(leave.suspends_contract);
    }

    #[test]
    fn test_annual_configuration_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let annual = loader.config().annual(2025).unwrap();
        assert_eq!(annual.max_annual_hours, dec("1780"));
        assert_eq!(annual.reference_weekly_hours, dec("40"));
        assert_eq!(annual.vacation_days, dec("30"));
        assert_eq!(annual.vacation_day_mode, VacationDayMode::Natural);
    }

    #[test]
    fn test_missing_annual_year_is_absent() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert!(loader.config().annual(1999).is_none());
    }

    #[test]
    fn test_holidays_loaded_and_sorted() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let holidays = loader.config().holidays();
        assert!(!holidays.is_empty());
        assert!(holidays.windows(2).all(|w| w[0].date <= w[1].date));

        let christmas = loader
            .config()
            .holiday_on(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap())
            .unwrap();
        assert_eq!(christmas.holiday_type, HolidayType::Nacional);
    }

    #[test]
    fn test_groups_loaded_in_order() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let groups = loader.config().groups();
        assert!(groups.windows(2).all(|w| w[0].order <= w[1].order));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match ConfigLoader::load("/nonexistent/path") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("company.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }
}
