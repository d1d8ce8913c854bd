use std::fmt;

use crate::summary::SummaryError;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug)]
pub enum DashboardError {
    Io(std::io::Error),
    Summary(SummaryError),
    Json(serde_json::Error),
    Generic(String),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Io(e) => write!(f, "IO error: {}", e),
            DashboardError::Summary(e) => write!(f, "Summary error: {}", e),
            DashboardError::Json(e) => write!(f, "JSON error: {}", e),
            DashboardError::Generic(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Io(e) => Some(e),
            DashboardError::Summary(e) => Some(e),
            DashboardError::Json(e) => Some(e),
            DashboardError::Generic(_) => None,
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(error: std::io::Error) -> Self {
        DashboardError::Io(error)
    }
}

impl From<SummaryError> for DashboardError {
    fn from(error: SummaryError) -> Self {
        DashboardError::Summary(error)
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(error: serde_json::Error) -> Self {
        DashboardError::Json(error)
    }
}

impl From<String> for DashboardError {
    fn from(error: String) -> Self {
        DashboardError::Generic(error)
    }
}

impl From<&str> for DashboardError {
    fn from(error: &str) -> Self {
        DashboardError::Generic(error.to_string())
    }
}
