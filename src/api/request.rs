//! Request types for the Jornada Engine API.
//!
//! This module defines the JSON request bodies and query strings accepted by
//! the endpoints, and their conversion into domain types. Ids the client
//! leaves out are generated here.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{AbsenceType, ContractType, EmployeeGroup, Holiday, HolidayType};
use crate::models::{
    DailyData, Employee, EmploymentPeriod, OpeningBalances, Role, ScheduledAbsence, Sender,
};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Request body for `POST /session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    /// The signed-in email.
    pub email: String,
}

/// Request body for creating or replacing an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Id to create the employee with; generated when missing. Ignored on
    /// replacement, where the path id wins.
    #[serde(default)]
    pub id: Option<String>,
    /// Full name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Group id.
    #[serde(default)]
    pub group_id: Option<String>,
    /// Profile role.
    #[serde(default)]
    pub role: Role,
    /// Employment periods.
    #[serde(default)]
    pub employment_periods: Vec<PeriodRequest>,
}

/// An employment period in an employee request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// Period id; generated when missing.
    #[serde(default)]
    pub id: Option<String>,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day, `null` while active.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Contract type code.
    pub contract_type: String,
    /// Contracted weekly hours.
    pub weekly_hours: Decimal,
    /// Opening bag balances.
    #[serde(default)]
    pub opening_balances: OpeningBalances,
    /// Scheduled absences.
    #[serde(default)]
    pub scheduled_absences: Vec<AbsenceRequest>,
}

/// A scheduled absence in an employee request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbsenceRequest {
    /// Absence id; generated when missing.
    #[serde(default)]
    pub id: Option<String>,
    /// Absence type id.
    pub absence_type_id: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day, `null` when open-ended.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee {
            id: req.id.unwrap_or_else(new_id),
            name: req.name.trim().to_string(),
            email: req.email,
            group_id: req.group_id.filter(|g| !g.trim().is_empty()),
            role: req.role,
            employment_periods: req.employment_periods.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PeriodRequest> for EmploymentPeriod {
    fn from(req: PeriodRequest) -> Self {
        EmploymentPeriod {
            id: req.id.unwrap_or_else(new_id),
            start_date: req.start_date,
            end_date: req.end_date,
            contract_type: req.contract_type,
            weekly_hours: req.weekly_hours,
            opening_balances: req.opening_balances,
            scheduled_absences: req.scheduled_absences.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<AbsenceRequest> for ScheduledAbsence {
    fn from(req: AbsenceRequest) -> Self {
        ScheduledAbsence {
            id: req.id.unwrap_or_else(new_id),
            absence_type_id: req.absence_type_id,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

/// Request body for `POST /holidays`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayRequest {
    /// Holiday id; the date when missing.
    #[serde(default)]
    pub id: Option<String>,
    /// Name.
    pub name: String,
    /// Date.
    pub date: NaiveDate,
    /// Holiday type.
    #[serde(rename = "type")]
    pub holiday_type: HolidayType,
}

impl From<HolidayRequest> for Holiday {
    fn from(req: HolidayRequest) -> Self {
        Holiday {
            id: req.id.unwrap_or_else(|| req.date.to_string()),
            name: req.name,
            date: req.date,
            holiday_type: req.holiday_type,
        }
    }
}

/// Request body for `POST /groups`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRequest {
    /// Group id; generated when missing.
    #[serde(default)]
    pub id: Option<String>,
    /// Name.
    pub name: String,
    /// Position in listings.
    #[serde(default)]
    pub order: u32,
}

impl From<GroupRequest> for EmployeeGroup {
    fn from(req: GroupRequest) -> Self {
        EmployeeGroup {
            id: req.id.unwrap_or_else(new_id),
            name: req.name,
            order: req.order,
        }
    }
}

/// Request body for `PUT /contract-types`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractTypeRequest {
    /// Contract type code.
    pub id: String,
    /// The contract type.
    #[serde(flatten)]
    pub contract_type: ContractType,
}

/// Request body for `PUT /absence-types`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbsenceTypeRequest {
    /// Absence type id.
    pub id: String,
    /// The absence type.
    #[serde(flatten)]
    pub absence_type: AbsenceType,
}

/// Request body for `PUT /weekly-records/{week}/employees/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeWeekRequest {
    /// Logged data keyed by date.
    #[serde(default)]
    pub days: BTreeMap<NaiveDate, DailyData>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for confirming a week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmRequest {
    /// Who confirms.
    pub confirmed_by: String,
}

/// Request body for `POST /conversations/{employee_id}/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    /// Who writes.
    pub sender: Sender,
    /// The message.
    pub text: String,
}

/// Request body for `POST /conversations/{employee_id}/read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadRequest {
    /// Who read the conversation.
    pub reader: Sender,
}

/// Query string of `GET /dashboard`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    /// Date of the summary; today when missing.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_request_generates_missing_ids() {
        let json = r#"{
            "name": " Lucía Pérez ",
            "email": "lucia@example.com",
            "group_id": "",
            "employment_periods": [{
                "start_date": "2024-03-01",
                "contract_type": "full_time",
                "weekly_hours": "40",
                "scheduled_absences": [{
                    "absence_type_id": "vacaciones",
                    "start_date": "2025-08-01",
                    "end_date": "2025-08-15"
                }]
            }]
        }"#;

        let request: EmployeeRequest = serde_json::from_str(json).unwrap();
        let employee: Employee = request.into();
        assert_eq!(employee.name, "Lucía Pérez");
        assert_eq!(employee.group_id, None);
        assert_eq!(employee.role, Role::Employee);
        assert!(!employee.id.is_empty());
        let period = &employee.employment_periods[0];
        assert!(!period.id.is_empty());
        assert_eq!(period.end_date, None);
        assert!(!period.scheduled_absences[0].id.is_empty());
    }

    #[test]
    fn test_holiday_request_defaults_id_to_date() {
        let json = r#"{"name": "San Juan", "date": "2025-06-24", "type": "Local"}"#;
        let holiday: Holiday = serde_json::from_str::<HolidayRequest>(json).unwrap().into();
        assert_eq!(holiday.id, "2025-06-24");
        assert_eq!(holiday.holiday_type, HolidayType::Local);
    }

    #[test]
    fn test_contract_type_request_is_flat() {
        let json = r#"{
            "id": "fijo_discontinuo",
            "name": "Fijo discontinuo",
            "computes_ordinary_bag": true,
            "computes_holiday_bag": true,
            "computes_off_day_bag": false
        }"#;
        let request: ContractTypeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.id, "fijo_discontinuo");
        assert!(!request.contract_type.computes_off_day_bag);
    }

    #[test]
    fn test_week_request_days_keyed_by_date() {
        let json = r#"{
            "days": {
                "2025-03-03": {"worked_hours": "8"},
                "2025-03-04": {"absence_type_id": "medico", "absence_hours": "2", "worked_hours": "6"}
            }
        }"#;
        let request: EmployeeWeekRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.days.len(), 2);
        assert_eq!(request.notes, None);
    }

    #[test]
    fn test_message_request_sender() {
        let request: MessageRequest =
            serde_json::from_str(r#"{"sender": "admin", "text": "Hola"}"#).unwrap();
        assert_eq!(request.sender, Sender::Admin);
    }
}
