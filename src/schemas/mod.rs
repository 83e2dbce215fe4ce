use std::collections::HashMap;

use serde::Serialize;

pub(crate) mod auth;
pub(crate) mod comment;
pub(crate) mod course;
pub(crate) mod teacher;
pub(crate) mod user;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
}

/// Severity of a user-facing status message; the JSON analogue of the flash
/// messages the HTML front end renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Severity {
    Success,
    Warning,
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageResponse {
    pub(crate) message: String,
    pub(crate) severity: Severity,
}

impl MessageResponse {
    pub(crate) fn success(message: String) -> Self {
        Self { message, severity: Severity::Success }
    }

    pub(crate) fn warning(message: String) -> Self {
        Self { message, severity: Severity::Warning }
    }
}
