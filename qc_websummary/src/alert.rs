//!
//! Notices shown at the top of a report section (aka alerts)
//!

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    Warn,
    Info,
}

impl AlertLevel {
    pub(crate) fn css_class(self) -> &'static str {
        match self {
            AlertLevel::Warn => "alert-warn",
            AlertLevel::Info => "alert-info",
        }
    }
}

/// Specification of an alert that appears in the web summary. Only `level`,
/// `title` and `message` are rendered; `formatted_value` is appended to the
/// title when present.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AlertSpec {
    pub level: AlertLevel,
    pub title: String,
    pub formatted_value: String,
    pub message: String,
}

impl AlertSpec {
    pub fn warn(title: impl ToString, message: impl ToString) -> Self {
        AlertSpec {
            level: AlertLevel::Warn,
            title: title.to_string(),
            formatted_value: String::default(),
            message: message.to_string(),
        }
    }

    pub fn info(title: impl ToString, message: impl ToString) -> Self {
        AlertSpec {
            level: AlertLevel::Info,
            ..AlertSpec::warn(title, message)
        }
    }
}
