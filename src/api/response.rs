//! Response types for the Jornada Engine API.
//!
//! This module defines the error response structures and the mapping from
//! engine errors to HTTP statuses. Messages are user-facing and in Spanish;
//! `details` carries the engine's own description.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let details = error.to_string();
        let (status, code, message) = match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "Error de configuración del sistema".to_string(),
            ),
            EngineError::EmployeeNotFound { id } => (
                StatusCode::NOT_FOUND,
                "EMPLOYEE_NOT_FOUND",
                format!("Empleado no registrado: {}", id),
            ),
            EngineError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("No se ha encontrado {} '{}'", entity_name(entity), id),
            ),
            EngineError::ContractTypeNotFound { code } => (
                StatusCode::NOT_FOUND,
                "CONTRACT_TYPE_NOT_FOUND",
                format!("Tipo de contrato no encontrado: {}", code),
            ),
            EngineError::AbsenceTypeNotFound { id } => (
                StatusCode::NOT_FOUND,
                "ABSENCE_TYPE_NOT_FOUND",
                format!("Tipo de ausencia no encontrado: {}", id),
            ),
            EngineError::AnnualConfigNotFound { year } => (
                StatusCode::NOT_FOUND,
                "ANNUAL_CONFIG_NOT_FOUND",
                format!("No hay configuración anual para {}", year),
            ),
            EngineError::InvalidEmploymentPeriod { period_id, .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_EMPLOYMENT_PERIOD",
                format!("Periodo de contratación no válido: {}", period_id),
            ),
            EngineError::InvalidWeekId { value } => (
                StatusCode::BAD_REQUEST,
                "INVALID_WEEK_ID",
                format!("Semana no válida: {} (formato AAAA-Wss)", value),
            ),
            EngineError::InvalidWeeklyRecord { week_id, .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_WEEKLY_RECORD",
                format!("Datos de la semana {} no válidos", week_id),
            ),
            EngineError::WeekAlreadyConfirmed { week_id, .. } => (
                StatusCode::CONFLICT,
                "WEEK_ALREADY_CONFIRMED",
                format!("La semana {} ya está confirmada", week_id),
            ),
            EngineError::ValidationError { field, .. } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Valor no válido en '{}'", field),
            ),
            EngineError::StorageError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                "No se han podido guardar los datos".to_string(),
            ),
            EngineError::CalculationError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CALCULATION_ERROR",
                "Error en el cálculo".to_string(),
            ),
        };

        ApiErrorResponse {
            status,
            error: ApiError::with_details(code, message, details),
        }
    }
}

fn entity_name(entity: &str) -> &str {
    match entity {
        "holiday" => "el festivo",
        "group" => "el grupo",
        "conversation" => "la conversación",
        "weekly record" => "el registro semanal",
        "employee week" => "la semana del empleado",
        other => other,
    }
}
