//! Configuration types for working-time computation.
//!
//! This module contains the strongly-typed catalog structures that are
//! deserialized from YAML configuration files and later edited through the
//! settings endpoints.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Metadata about the company the engine is configured for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyMetadata {
    /// The company name.
    pub name: String,
    /// Emails that always resolve to the admin role.
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

impl CompanyMetadata {
    /// Returns true if the email is in the admin allow-list.
    ///
    /// Comparison ignores surrounding whitespace and ASCII case.
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim();
        self.admin_emails
            .iter()
            .any(|admin| admin.trim().eq_ignore_ascii_case(email))
    }
}

/// A contract type and the hour bags it computes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractType {
    /// The human-readable name of the contract type.
    pub name: String,
    /// Whether the ordinary-hours bag is kept for this contract.
    pub computes_ordinary_bag: bool,
    /// Whether hours worked on holidays accrue to the holiday bag.
    pub computes_holiday_bag: bool,
    /// Whether compensatory days off accrue to the leave bag.
    pub computes_off_day_bag: bool,
}

/// An absence type (vacation, sick leave, unpaid leave, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceType {
    /// The human-readable name.
    pub name: String,
    /// Short label shown in the weekly grid.
    #[serde(default)]
    pub abbreviation: String,
    /// Display color (hex).
    #[serde(default)]
    pub color: String,
    /// Whether the absence may cover only part of a day.
    #[serde(default)]
    pub is_absence_splittable: bool,
    /// Whether days of this absence consume vacation allowance.
    #[serde(default)]
    pub counts_as_vacation: bool,
    /// Whether days of this absence suspend the contract.
    #[serde(default)]
    pub suspends_contract: bool,
}

/// How vacation days are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacationDayMode {
    /// Every calendar day of a vacation counts.
    #[default]
    Natural,
    /// Only working weekdays that are not holidays count.
    Working,
}

/// Rules for one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualConfiguration {
    /// The calendar year.
    pub year: i32,
    /// The annual ceiling of ordinary hours for a full-time contract.
    pub max_annual_hours: Decimal,
    /// The weekly hours the ceiling refers to.
    pub reference_weekly_hours: Decimal,
    /// Vacation days for a full year of employment.
    pub vacation_days: Decimal,
    /// How vacation days are counted.
    #[serde(default)]
    pub vacation_day_mode: VacationDayMode,
}

/// Hours in a leap year.
const MAX_ANNUAL_HOURS: Decimal = Decimal::from_parts(24 * 366, 0, 0, false, 0);
/// Hours in a week.
const MAX_REFERENCE_WEEKLY_HOURS: Decimal = Decimal::from_parts(24 * 7, 0, 0, false, 0);
const MAX_VACATION_DAYS: Decimal = Decimal::from_parts(366, 0, 0, false, 0);

impl AnnualConfiguration {
    /// Checks every quantity lies within what a calendar year can hold.
    ///
    /// # Errors
    ///
    /// [`EngineError::ValidationError`] naming the first field out of range.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_annual_hours <= Decimal::ZERO || self.max_annual_hours > MAX_ANNUAL_HOURS {
            return Err(EngineError::validation(
                "max_annual_hours",
                format!("must be within (0, {}]", MAX_ANNUAL_HOURS),
            ));
        }
        if self.reference_weekly_hours <= Decimal::ZERO
            || self.reference_weekly_hours > MAX_REFERENCE_WEEKLY_HOURS
        {
            return Err(EngineError::validation(
                "reference_weekly_hours",
                format!("must be within (0, {}]", MAX_REFERENCE_WEEKLY_HOURS),
            ));
        }
        if self.vacation_days < Decimal::ZERO || self.vacation_days > MAX_VACATION_DAYS {
            return Err(EngineError::validation(
                "vacation_days",
                format!("must be within [0, {}]", MAX_VACATION_DAYS),
            ));
        }
        Ok(())
    }
}

/// The type of a holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HolidayType {
    /// National holiday.
    Nacional,
    /// Regional holiday.
    Regional,
    /// Local holiday.
    Local,
    /// Holiday on which the business opens.
    Apertura,
}

impl std::fmt::Display for HolidayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HolidayType::Nacional => write!(f, "Nacional"),
            HolidayType::Regional => write!(f, "Regional"),
            HolidayType::Local => write!(f, "Local"),
            HolidayType::Apertura => write!(f, "Apertura"),
        }
    }
}

/// A holiday on the company calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Unique identifier.
    pub id: String,
    /// The name of the holiday.
    pub name: String,
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The holiday type.
    #[serde(rename = "type")]
    pub holiday_type: HolidayType,
}

/// A group employees are organised in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeGroup {
    /// Unique identifier.
    pub id: String,
    /// The group name.
    pub name: String,
    /// Sort position in listings and reports.
    pub order: u32,
}

/// Contract types file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractTypesConfig {
    /// Map of contract type code to contract type.
    pub contract_types: HashMap<String, ContractType>,
}

/// Absence types file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct AbsenceTypesConfig {
    /// Map of absence type id to absence type.
    pub absence_types: HashMap<String, AbsenceType>,
}

/// Groups file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupsConfig {
    /// The employee groups.
    #[serde(default)]
    pub groups: Vec<EmployeeGroup>,
}

/// Holiday calendar file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayCalendar {
    /// The holidays in this file.
    pub holidays: Vec<Holiday>,
}

/// The complete catalog loaded from the configuration directory.
///
/// Holidays are kept sorted by date and annual configurations by year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrConfig {
    company: CompanyMetadata,
    contract_types: HashMap<String, ContractType>,
    absence_types: HashMap<String, AbsenceType>,
    annual: BTreeMap<i32, AnnualConfiguration>,
    holidays: Vec<Holiday>,
    groups: Vec<EmployeeGroup>,
}

impl HrConfig {
    /// Creates a new HrConfig from its component parts.
    pub fn new(
        company: CompanyMetadata,
        contract_types: HashMap<String, ContractType>,
        absence_types: HashMap<String, AbsenceType>,
        annual: Vec<AnnualConfiguration>,
        holidays: Vec<Holiday>,
        groups: Vec<EmployeeGroup>,
    ) -> Self {
        let mut config = Self {
            company,
            contract_types,
            absence_types,
            annual: annual.into_iter().map(|a| (a.year, a)).collect(),
            holidays,
            groups,
        };
        config.sort();
        config
    }

    fn sort(&mut self) {
        self.holidays.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        self.groups
            .sort_by(|a, b| a.order.cmp(&b.order).then(a.name.cmp(&b.name)));
    }

    /// Returns the company metadata.
    pub fn company(&self) -> &CompanyMetadata {
        &self.company
    }

    /// Returns all contract types.
    pub fn contract_types(&self) -> &HashMap<String, ContractType> {
        &self.contract_types
    }

    /// Returns all absence types.
    pub fn absence_types(&self) -> &HashMap<String, AbsenceType> {
        &self.absence_types
    }

    /// Returns all annual configurations keyed by year.
    pub fn annual_configurations(&self) -> &BTreeMap<i32, AnnualConfiguration> {
        &self.annual
    }

    /// Returns the annual configuration for a year, if any.
    pub fn annual(&self, year: i32) -> Option<&AnnualConfiguration> {
        self.annual.get(&year)
    }

    /// Returns all holidays, sorted by date.
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    /// Returns the holiday falling on a date, if any.
    pub fn holiday_on(&self, date: NaiveDate) -> Option<&Holiday> {
        self.holidays.iter().find(|h| h.date == date)
    }

    /// Returns all groups, sorted by their order.
    pub fn groups(&self) -> &[EmployeeGroup] {
        &self.groups
    }

    /// Inserts or replaces a contract type.
    pub fn upsert_contract_type(&mut self, code: String, contract_type: ContractType) {
        self.contract_types.insert(code, contract_type);
    }

    /// Removes a contract type, returning it if present.
    pub fn remove_contract_type(&mut self, code: &str) -> Option<ContractType> {
        self.contract_types.remove(code)
    }

    /// Inserts or replaces an absence type.
    pub fn upsert_absence_type(&mut self, id: String, absence_type: AbsenceType) {
        self.absence_types.insert(id, absence_type);
    }

    /// Removes an absence type, returning it if present.
    pub fn remove_absence_type(&mut self, id: &str) -> Option<AbsenceType> {
        self.absence_types.remove(id)
    }

    /// Inserts or replaces the configuration for its year.
    pub fn upsert_annual(&mut self, annual: AnnualConfiguration) {
        self.annual.insert(annual.year, annual);
    }

    /// Inserts or replaces a holiday by id.
    pub fn upsert_holiday(&mut self, holiday: Holiday) {
        self.holidays.retain(|h| h.id != holiday.id);
        self.holidays.push(holiday);
        self.sort();
    }

    /// Removes a holiday by id, returning it if present.
    pub fn remove_holiday(&mut self, id: &str) -> Option<Holiday> {
        let index = self.holidays.iter().position(|h| h.id == id)?;
        Some(self.holidays.remove(index))
    }

    /// Inserts or replaces a group by id.
    pub fn upsert_group(&mut self, group: EmployeeGroup) {
        self.groups.retain(|g| g.id != group.id);
        self.groups.push(group);
        self.sort();
    }

    /// Removes a group by id, returning it if present.
    pub fn remove_group(&mut self, id: &str) -> Option<EmployeeGroup> {
        let index = self.groups.iter().position(|g| g.id == id)?;
        Some(self.groups.remove(index))
    }

    /// Returns the position of a group in the ordering, or `u32::MAX` if unknown.
    pub fn group_order(&self, id: Option<&str>) -> u32 {
        id.and_then(|id| self.groups.iter().find(|g| g.id == id))
            .map(|g| g.order)
            .unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holiday(id: &str, date: &str) -> Holiday {
        Holiday {
            id: id.to_string(),
            name: id.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            holiday_type: HolidayType::Nacional,
        }
    }

    fn empty_config() -> HrConfig {
        HrConfig::new(
            CompanyMetadata {
                name: "Test".to_string(),
                admin_emails: vec![" Admin@Example.com ".to_string()],
            },
            HashMap::new(),
            HashMap::new(),
            vec![],
            vec![holiday("b", "2025-12-25"), holiday("a", "2025-01-01")],
            vec![],
        )
    }

    #[test]
    fn test_admin_email_is_case_insensitive() {
        let config = empty_config();
        assert!(config.company().is_admin_email("admin@example.com"));
        assert!(!config.company().is_admin_email("someone@example.com"));
    }

    #[test]
    fn test_holidays_are_sorted_by_date() {
        let config = empty_config();
        assert_eq!(config.holidays()[0].id, "a");
        assert_eq!(config.holidays()[1].id, "b");
    }

    #[test]
    fn test_upsert_holiday_replaces_same_id() {
        let mut config = empty_config();
        config.upsert_holiday(holiday("a", "2025-01-06"));
        assert_eq!(config.holidays().len(), 2);
        assert_eq!(
            config.holidays()[0].date,
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
        );
    }

    #[test]
    fn test_holiday_type_uses_spanish_names() {
        let json = serde_json::to_string(&HolidayType::Apertura).unwrap();
        assert_eq!(json, "\"Apertura\"");
        let parsed: HolidayType = serde_json::from_str("\"Regional\"").unwrap();
        assert_eq!(parsed, HolidayType::Regional);
    }

    #[test]
    fn test_group_order_unknown_sorts_last() {
        let mut config = empty_config();
        config.upsert_group(EmployeeGroup {
            id: "g1".to_string(),
            name: "Tienda".to_string(),
            order: 2,
        });
        assert_eq!(config.group_order(Some("g1")), 2);
        assert_eq!(config.group_order(Some("nope")), u32::MAX);
        assert_eq!(config.group_order(None), u32::MAX);
    }
}
