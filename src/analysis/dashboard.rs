//! Dashboard views built from aggregator results.
//!
//! Each view bundles the stat tiles and lists one role sees. Views hold
//! raw values only; rendering is left to the report module.

use super::aggregator::{
    applications_per_company, count_by_status, count_in_category, filter_by_status,
    flatten_applications, placed_students, placement_rate, placements_by_department,
    recent_applications, search_companies, search_students, status_breakdown, DepartmentCounts,
};
use crate::error::AggregateError;
use crate::models::{
    Application, ApplicationRecord, ApplicationStatus, Company, Interview, Student,
    StatusCategory,
};
use serde::Serialize;
use tracing::debug;

/// Knobs a caller can turn on either view.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// How many entries the "recent applications" list shows.
    pub recent_limit: usize,
    /// Only list applications with this status.
    pub status_filter: Option<ApplicationStatus>,
    /// Narrow the students table (office) or company list (student).
    pub search: Option<String>,
}

impl ViewOptions {
    #[allow(dead_code)] // Shorthand for unfiltered views
    pub fn with_recent_limit(recent_limit: usize) -> Self {
        Self {
            recent_limit,
            status_filter: None,
            search: None,
        }
    }

    fn search_term(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}

/// A labelled number on a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatTile {
    pub label: &'static str,
    pub value: usize,
}

impl StatTile {
    fn new(label: &'static str, value: usize) -> Self {
        Self { label, value }
    }
}

/// Count of applications in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: usize,
}

/// A company with the number of applications it received.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRow {
    #[serde(flatten)]
    pub company: Company,
    pub application_count: usize,
}

/// One line of the office's students table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRow {
    pub id: String,
    pub name: String,
    pub roll_number: String,
    pub department: String,
    pub cgpa: f64,
    pub application_count: usize,
    pub placed: bool,
}

impl From<&Student> for StudentRow {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.clone(),
            name: student.name.clone(),
            roll_number: student.roll_number.clone(),
            department: student.department.clone(),
            cgpa: student.cgpa,
            application_count: student.applications.len(),
            placed: student.is_placed(),
        }
    }
}

/// What a student sees.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentOverview {
    pub student_id: String,
    pub name: String,
    pub roll_number: String,
    pub department: String,
    pub tiles: Vec<StatTile>,
    pub recent_applications: Vec<Application>,
    pub applications: Vec<Application>,
    pub interviews: Vec<Interview>,
    pub companies: Vec<Company>,
}

impl StudentOverview {
    /// Build the student view for `student_id`.
    pub fn build(
        students: &[Student],
        student_id: &str,
        companies: &[Company],
        options: &ViewOptions,
    ) -> Result<Self, AggregateError> {
        let student = students
            .iter()
            .find(|s| s.id == student_id)
            .ok_or_else(|| AggregateError::UnknownStudent(student_id.to_string()))?;

        // Ownership decides whose application it is, same join as the office view
        let own: Vec<Application> = student.applications.clone();

        let tiles = vec![
            StatTile::new("Applications", own.len()),
            StatTile::new(
                "Shortlisted",
                count_in_category(&own, StatusCategory::InProgress),
            ),
            StatTile::new("Interviews", student.interviews.len()),
            StatTile::new("Selected", count_by_status(&own, ApplicationStatus::Selected)),
        ];

        let applications = match options.status_filter {
            Some(status) => filter_by_status(&own, status),
            None => own.clone(),
        };

        let companies: Vec<Company> = search_companies(companies, options.search_term())
            .into_iter()
            .cloned()
            .collect();

        debug!(
            "Student view for {}: {} applications, {} companies",
            student.id,
            own.len(),
            companies.len()
        );

        Ok(Self {
            student_id: student.id.clone(),
            name: student.name.clone(),
            roll_number: student.roll_number.clone(),
            department: student.department.clone(),
            tiles,
            recent_applications: recent_applications(&own, options.recent_limit),
            applications,
            interviews: student.interviews.clone(),
            companies,
        })
    }
}

/// What the placement office sees.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeOverview {
    pub tiles: Vec<StatTile>,
    pub total_students: usize,
    pub placed_students: usize,
    pub placement_rate: f64,
    pub placements_by_department: DepartmentCounts,
    pub status_breakdown: Vec<StatusCount>,
    pub recent_applications: Vec<ApplicationRecord>,
    pub applications: Vec<ApplicationRecord>,
    pub students: Vec<StudentRow>,
    pub companies: Vec<CompanyRow>,
}

impl OfficeOverview {
    /// Build the office view over every student and company.
    pub fn build(students: &[Student], companies: &[Company], options: &ViewOptions) -> Self {
        let all_applications = flatten_applications(students);

        let tiles = vec![
            StatTile::new("Total Students", students.len()),
            StatTile::new("Active Companies", companies.len()),
            StatTile::new("Total Applications", all_applications.len()),
            StatTile::new(
                "Placements",
                count_by_status(&all_applications, ApplicationStatus::Selected),
            ),
        ];

        let status_breakdown = status_breakdown(&all_applications, &ApplicationStatus::ALL)
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect();

        let applications = match options.status_filter {
            Some(status) => filter_by_status(&all_applications, status),
            None => all_applications.clone(),
        };

        let company_rows = applications_per_company(companies, &all_applications)
            .into_iter()
            .zip(companies)
            .map(|((_, application_count), company)| CompanyRow {
                company: company.clone(),
                application_count,
            })
            .collect();

        let student_rows = search_students(students, options.search_term())
            .into_iter()
            .map(StudentRow::from)
            .collect::<Vec<_>>();

        debug!(
            "Office view: {} students ({} listed), {} applications",
            students.len(),
            student_rows.len(),
            all_applications.len()
        );

        Self {
            tiles,
            total_students: students.len(),
            placed_students: placed_students(students),
            placement_rate: placement_rate(students),
            placements_by_department: placements_by_department(students),
            status_breakdown,
            recent_applications: recent_applications(&all_applications, options.recent_limit),
            applications,
            students: student_rows,
            companies: company_rows,
        }
    }
}

/// Either role's dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum Dashboard {
    Student(StudentOverview),
    Office(OfficeOverview),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{company, student};
    use ApplicationStatus::*;

    fn campus() -> Vec<Student> {
        vec![
            student("1", "Computer Science", &[InterviewScheduled, Shortlisted]),
            student("2", "Computer Science", &[Selected]),
            student("3", "Mechanical Engineering", &[Applied]),
        ]
    }

    fn tile(tiles: &[StatTile], label: &str) -> usize {
        tiles
            .iter()
            .find(|t| t.label == label)
            .map(|t| t.value)
            .unwrap()
    }

    #[test]
    fn test_student_overview_tiles() {
        let students = campus();
        let companies = vec![company("1", "Apple"), company("2", "Meta")];
        let view =
            StudentOverview::build(&students, "1", &companies, &ViewOptions::with_recent_limit(3))
                .unwrap();

        assert_eq!(tile(&view.tiles, "Applications"), 2);
        assert_eq!(tile(&view.tiles, "Shortlisted"), 2);
        assert_eq!(tile(&view.tiles, "Interviews"), 0);
        assert_eq!(tile(&view.tiles, "Selected"), 0);
        assert_eq!(view.companies.len(), 2);
        assert_eq!(view.recent_applications.len(), 2);
    }

    #[test]
    fn test_student_overview_unknown_student() {
        let err = StudentOverview::build(&campus(), "99", &[], &ViewOptions::with_recent_limit(3))
            .unwrap_err();
        assert_eq!(err, AggregateError::UnknownStudent("99".to_string()));
    }

    #[test]
    fn test_student_overview_filters() {
        let students = campus();
        let companies = vec![company("1", "Apple"), company("2", "Meta")];
        let options = ViewOptions {
            recent_limit: 1,
            status_filter: Some(Shortlisted),
            search: Some("meta".to_string()),
        };

        let view = StudentOverview::build(&students, "1", &companies, &options).unwrap();

        assert_eq!(view.recent_applications.len(), 1);
        assert_eq!(view.applications.len(), 1);
        assert_eq!(view.applications[0].status, Shortlisted);
        assert_eq!(view.companies.len(), 1);
        assert_eq!(view.companies[0].name, "Meta");
        // Tiles always count everything
        assert_eq!(tile(&view.tiles, "Applications"), 2);
    }

    #[test]
    fn test_student_views_sum_to_office_total() {
        let mut students = vec![
            student("1", "Computer Science", &[Applied, Selected]),
            student("2", "Computer Science", &[]),
        ];
        // Stored under student 1 but naming student 2
        students[0].applications[1].student_id = "2".to_string();

        let options = ViewOptions::with_recent_limit(5);
        let office = OfficeOverview::build(&students, &[], &options);
        let first = StudentOverview::build(&students, "1", &[], &options).unwrap();
        let second = StudentOverview::build(&students, "2", &[], &options).unwrap();

        assert_eq!(tile(&first.tiles, "Applications"), 2);
        assert_eq!(tile(&first.tiles, "Selected"), 1);
        assert_eq!(tile(&second.tiles, "Applications"), 0);
        assert_eq!(
            tile(&first.tiles, "Applications") + tile(&second.tiles, "Applications"),
            tile(&office.tiles, "Total Applications")
        );
        assert_eq!(
            tile(&first.tiles, "Selected"),
            tile(&office.tiles, "Placements")
        );
    }

    #[test]
    fn test_office_overview() {
        let students = campus();
        let companies = vec![company("1", "Google"), company("2", "Microsoft")];
        let view = OfficeOverview::build(&students, &companies, &ViewOptions::with_recent_limit(5));

        assert_eq!(tile(&view.tiles, "Total Students"), 3);
        assert_eq!(tile(&view.tiles, "Active Companies"), 2);
        assert_eq!(tile(&view.tiles, "Total Applications"), 4);
        assert_eq!(tile(&view.tiles, "Placements"), 1);

        assert_eq!(view.placed_students, 1);
        assert_eq!(view.placements_by_department.get("Computer Science"), Some(1));
        assert_eq!(view.placements_by_department.get("Mechanical Engineering"), None);

        let counts: Vec<usize> = view.status_breakdown.iter().map(|s| s.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 1, 0]);

        assert_eq!(view.recent_applications.len(), 4);
        assert_eq!(view.recent_applications[0].student_name, "Student 1");

        // Every fixture application is for Google
        assert_eq!(view.companies[0].application_count, 4);
        assert_eq!(view.companies[1].application_count, 0);

        assert_eq!(view.students.len(), 3);
        assert!(view.students[1].placed);
        assert!(!view.students[0].placed);
    }

    #[test]
    fn test_office_overview_search_and_filter() {
        let students = campus();
        let options = ViewOptions {
            recent_limit: 2,
            status_filter: Some(Applied),
            search: Some("mechanical".to_string()),
        };

        let view = OfficeOverview::build(&students, &[], &options);

        assert_eq!(view.recent_applications.len(), 2);
        assert_eq!(view.applications.len(), 1);
        assert_eq!(view.applications[0].student_roll, "R3");
        assert_eq!(view.students.len(), 1);
        assert_eq!(view.students[0].id, "3");
        // Statistics ignore the search term
        assert_eq!(tile(&view.tiles, "Total Students"), 3);
    }

    #[test]
    fn test_dashboard_json_tag() {
        let view = OfficeOverview::build(&[], &[], &ViewOptions::with_recent_limit(5));
        let json = serde_json::to_value(Dashboard::Office(view)).unwrap();

        assert_eq!(json["view"], "office");
        assert_eq!(json["placementRate"], 0.0);
        assert_eq!(json["statusBreakdown"][2]["status"], "interview-scheduled");
    }
}
