//! HTTP API module for the Jornada Engine.
//!
//! This module provides the REST endpoints used by the admin console and the
//! employee portal: employees, the company catalog, weekly records, balances,
//! vacations, conversations and the dashboard.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AbsenceRequest, AbsenceTypeRequest, ConfirmRequest, ContractTypeRequest, DashboardQuery,
    EmployeeRequest, EmployeeWeekRequest, GroupRequest, HolidayRequest, MessageRequest,
    PeriodRequest, ReadRequest, SessionRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
