//! Data models for placement tracking.
//!
//! This module contains the record types supplied by a record store
//! (students, applications, interviews, companies) and the closed
//! enumerations used to classify them.

use crate::error::AggregateError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of an application in its fixed progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    InterviewScheduled,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    /// Every status, in display order.
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::Selected,
        ApplicationStatus::Rejected,
    ];

    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::InterviewScheduled => "interview-scheduled",
            ApplicationStatus::Selected => "selected",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Returns the derived category this status belongs to.
    #[allow(dead_code)] // Inverse of StatusCategory::statuses
    pub fn category(&self) -> StatusCategory {
        match self {
            ApplicationStatus::Applied => StatusCategory::Pending,
            ApplicationStatus::Shortlisted | ApplicationStatus::InterviewScheduled => {
                StatusCategory::InProgress
            }
            ApplicationStatus::Selected => StatusCategory::Placed,
            ApplicationStatus::Rejected => StatusCategory::Closed,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationStatus::Applied => write!(f, "Applied"),
            ApplicationStatus::Shortlisted => write!(f, "Shortlisted"),
            ApplicationStatus::InterviewScheduled => write!(f, "Interview Scheduled"),
            ApplicationStatus::Selected => write!(f, "Selected"),
            ApplicationStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AggregateError::InvalidStatus(s.to_string()))
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = AggregateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Named groups of statuses shown together on the dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusCategory {
    /// Submitted, no response yet.
    Pending,
    /// Shortlisted or with an interview scheduled.
    InProgress,
    /// Selected.
    Placed,
    /// Rejected.
    Closed,
}

impl StatusCategory {
    /// The statuses that make up this category.
    pub fn statuses(&self) -> &'static [ApplicationStatus] {
        match self {
            StatusCategory::Pending => &[ApplicationStatus::Applied],
            StatusCategory::InProgress => &[
                ApplicationStatus::Shortlisted,
                ApplicationStatus::InterviewScheduled,
            ],
            StatusCategory::Placed => &[ApplicationStatus::Selected],
            StatusCategory::Closed => &[ApplicationStatus::Rejected],
        }
    }

    pub fn contains(&self, status: ApplicationStatus) -> bool {
        self.statuses().contains(&status)
    }
}

/// Kind of interview round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewType {
    Technical,
    Hr,
    GroupDiscussion,
    Test,
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterviewType::Technical => write!(f, "Technical"),
            InterviewType::Hr => write!(f, "Hr"),
            InterviewType::GroupDiscussion => write!(f, "Group-discussion"),
            InterviewType::Test => write!(f, "Test"),
        }
    }
}

/// Which dashboard a caller is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    /// Training & Placement Office.
    #[default]
    Tpo,
}

/// A student's submission to a company/position pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    /// Id of the student who applied (a reference, not ownership).
    pub student_id: String,
    pub company: String,
    pub position: String,
    pub application_date: NaiveDate,
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A scheduled interview round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: String,
    pub student_id: String,
    pub company: String,
    pub position: String,
    #[serde(rename = "type")]
    pub kind: InterviewType,
    pub scheduled_date: NaiveDateTime,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// A company recruiting on campus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub positions: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Compensation as displayed (e.g. "₹25-30 LPA"); never parsed.
    pub package: String,
    pub deadline: NaiveDate,
}

/// A student together with the applications and interviews they own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roll_number: String,
    pub department: String,
    /// Grade point average on a 0-10 scale.
    pub cgpa: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Opaque reference to the resume document.
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub interviews: Vec<Interview>,
}

impl Student {
    /// Returns true if any application reached `selected`.
    pub fn is_placed(&self) -> bool {
        self.applications
            .iter()
            .any(|app| app.status == ApplicationStatus::Selected)
    }
}

/// An application joined with the name and roll number of its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    #[serde(flatten)]
    pub application: Application,
    pub student_name: String,
    pub student_roll: String,
}

impl AsRef<Application> for Application {
    fn as_ref(&self) -> &Application {
        self
    }
}

impl AsRef<Application> for ApplicationRecord {
    fn as_ref(&self) -> &Application {
        &self.application
    }
}

/// Anything that carries an application status.
///
/// Lets the status counters run over plain applications and joined
/// records alike.
pub trait HasStatus {
    fn status(&self) -> ApplicationStatus;
}

impl HasStatus for Application {
    fn status(&self) -> ApplicationStatus {
        self.status
    }
}

impl HasStatus for ApplicationRecord {
    fn status(&self) -> ApplicationStatus {
        self.application.status
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub fn application(id: &str, student_id: &str, status: ApplicationStatus) -> Application {
        Application {
            id: id.to_string(),
            student_id: student_id.to_string(),
            company: "Google".to_string(),
            position: "Software Engineer".to_string(),
            application_date: date("2024-01-15"),
            status,
            next_step: None,
            next_step_date: None,
            notes: None,
        }
    }

    pub fn student(id: &str, department: &str, statuses: &[ApplicationStatus]) -> Student {
        Student {
            id: id.to_string(),
            name: format!("Student {}", id),
            email: format!("student{}@example.com", id),
            roll_number: format!("R{}", id),
            department: department.to_string(),
            cgpa: 8.0,
            skills: vec!["Rust".to_string()],
            resume: format!("student_{}.pdf", id),
            applications: statuses
                .iter()
                .enumerate()
                .map(|(i, status)| application(&format!("{}-{}", id, i), id, *status))
                .collect(),
            interviews: Vec::new(),
        }
    }

    pub fn company(id: &str, name: &str) -> Company {
        Company {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("{} is hiring", name),
            positions: vec!["Software Engineer".to_string()],
            requirements: vec!["Problem-solving".to_string()],
            package: "₹20 LPA".to_string(),
            deadline: date("2024-02-15"),
        }
    }
}
