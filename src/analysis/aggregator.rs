//! Placement statistics aggregation.
//!
//! Pure functions that turn student and application records into the
//! counts, breakdowns and lists shown on the dashboards. Nothing here
//! mutates its input or formats values for display.

use crate::error::AggregateError;
use crate::models::{
    Application, ApplicationRecord, ApplicationStatus, Company, HasStatus, Student,
    StatusCategory,
};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// What to do with an application whose student id names no student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Stop at the first dangling reference.
    #[default]
    Fail,
    /// Drop dangling applications and carry on.
    Skip,
}

/// Placed-student counts per department, in first-seen order.
///
/// Only departments with at least one placed student are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentCounts {
    entries: Vec<(String, usize)>,
}

impl DepartmentCounts {
    fn increment(&mut self, department: &str) {
        match self.entries.iter_mut().find(|(name, _)| name == department) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((department.to_string(), 1)),
        }
    }

    #[allow(dead_code)] // Lookup helper for callers that need one department
    pub fn get(&self, department: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| name == department)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for DepartmentCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

/// Count applications with exactly the given status.
pub fn count_by_status<T: HasStatus>(applications: &[T], status: ApplicationStatus) -> usize {
    applications
        .iter()
        .filter(|app| app.status() == status)
        .count()
}

/// Count applications whose status falls in a derived category.
pub fn count_in_category<T: HasStatus>(applications: &[T], category: StatusCategory) -> usize {
    applications
        .iter()
        .filter(|app| category.contains(app.status()))
        .count()
}

/// Join every application with its owning student's name and roll number.
///
/// Order follows the student list, then each student's applications.
pub fn flatten_applications(students: &[Student]) -> Vec<ApplicationRecord> {
    students
        .iter()
        .flat_map(|student| {
            student.applications.iter().map(|app| ApplicationRecord {
                application: app.clone(),
                student_name: student.name.clone(),
                student_roll: student.roll_number.clone(),
            })
        })
        .collect()
}

/// Count placed students per department.
pub fn placements_by_department(students: &[Student]) -> DepartmentCounts {
    let mut counts = DepartmentCounts::default();

    for student in students.iter().filter(|s| s.is_placed()) {
        counts.increment(&student.department);
    }

    counts
}

/// Count applications for each requested status, keeping the request order.
///
/// Every requested status gets an entry, zero included.
pub fn status_breakdown<T: HasStatus>(
    applications: &[T],
    statuses: &[ApplicationStatus],
) -> Vec<(ApplicationStatus, usize)> {
    statuses
        .iter()
        .map(|status| (*status, count_by_status(applications, *status)))
        .collect()
}

/// The first `n` applications in their existing order.
pub fn recent_applications<T: Clone>(applications: &[T], n: usize) -> Vec<T> {
    applications.iter().take(n).cloned().collect()
}

/// Number of students with at least one selected application.
pub fn placed_students(students: &[Student]) -> usize {
    students.iter().filter(|s| s.is_placed()).count()
}

/// Fraction of students placed, in `[0, 1]`.
pub fn placement_rate(students: &[Student]) -> f64 {
    if students.is_empty() {
        return 0.0;
    }
    placed_students(students) as f64 / students.len() as f64
}

/// A department's placed count as a percentage of all students.
pub fn department_share(count: usize, total_students: usize) -> f64 {
    if total_students == 0 {
        return 0.0;
    }
    (count as f64 / total_students as f64) * 100.0
}

/// Applications naming one student, wherever they are stored.
#[allow(dead_code)] // Dashboards join on ownership instead
pub fn applications_for_student<'a>(
    applications: &'a [Application],
    student_id: &str,
) -> Vec<&'a Application> {
    applications
        .iter()
        .filter(|app| app.student_id == student_id)
        .collect()
}

/// Application count per company, in company order, zero included.
pub fn applications_per_company<T>(
    companies: &[Company],
    applications: &[T],
) -> Vec<(String, usize)>
where
    T: AsRef<Application>,
{
    companies
        .iter()
        .map(|company| {
            let count = applications
                .iter()
                .filter(|app| app.as_ref().company == company.name)
                .count();
            (company.name.clone(), count)
        })
        .collect()
}

/// Applications with the given status, order preserved.
pub fn filter_by_status<T: HasStatus + Clone>(
    applications: &[T],
    status: ApplicationStatus,
) -> Vec<T> {
    applications
        .iter()
        .filter(|app| app.status() == status)
        .cloned()
        .collect()
}

fn matches_term(term: &str, fields: &[&str]) -> bool {
    fields.iter().any(|field| field.to_lowercase().contains(term))
}

/// Case-insensitive search over name, email, roll number, department and skills.
pub fn search_students<'a>(students: &'a [Student], term: &str) -> Vec<&'a Student> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return students.iter().collect();
    }

    students
        .iter()
        .filter(|s| {
            matches_term(
                &term,
                &[
                    s.name.as_str(),
                    s.email.as_str(),
                    s.roll_number.as_str(),
                    s.department.as_str(),
                ],
            ) || s.skills.iter().any(|skill| skill.to_lowercase().contains(&term))
        })
        .collect()
}

/// Case-insensitive search over company name, description and positions.
pub fn search_companies<'a>(companies: &'a [Company], term: &str) -> Vec<&'a Company> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return companies.iter().collect();
    }

    companies
        .iter()
        .filter(|c| {
            matches_term(&term, &[c.name.as_str(), c.description.as_str()])
                || c.positions.iter().any(|p| p.to_lowercase().contains(&term))
        })
        .collect()
}

/// Check that every application names a student in the collection.
///
/// With [`ReferencePolicy::Fail`] the first dangling application is an
/// error. With [`ReferencePolicy::Skip`] dangling applications are dropped
/// from the returned copy.
pub fn check_references(
    students: &[Student],
    policy: ReferencePolicy,
) -> Result<Vec<Student>, AggregateError> {
    let known: HashSet<&str> = students.iter().map(|s| s.id.as_str()).collect();
    let mut checked = Vec::with_capacity(students.len());

    for student in students {
        let mut student = student.clone();
        let before = student.applications.len();

        let mut kept = Vec::with_capacity(before);
        for app in student.applications {
            if known.contains(app.student_id.as_str()) {
                kept.push(app);
                continue;
            }
            match policy {
                ReferencePolicy::Fail => {
                    return Err(AggregateError::DanglingReference {
                        application_id: app.id,
                        student_id: app.student_id,
                    });
                }
                ReferencePolicy::Skip => {
                    warn!(
                        "Skipping application {}: unknown student {}",
                        app.id, app.student_id
                    );
                }
            }
        }
        student.applications = kept;

        if student.applications.len() != before {
            debug!(
                "Dropped {} application(s) from student {}",
                before - student.applications.len(),
                student.id
            );
        }
        checked.push(student);
    }

    Ok(checked)
}
