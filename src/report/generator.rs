//! Markdown and JSON dashboard reports.
//!
//! This is the only place records are formatted for people: dates,
//! status labels, interview types and percentages.

use crate::analysis::aggregator::department_share;
use crate::analysis::dashboard::{OfficeOverview, StatTile, StudentOverview};
use crate::analysis::Dashboard;
use crate::models::{Application, ApplicationRecord, Company, Interview};
use anyhow::Result;
use chrono::NaiveDateTime;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Metadata printed at the top of a report.
#[derive(Debug, Clone)]
pub struct ReportMetadata {
    /// Where the records came from.
    pub source: String,
    /// When the report was generated.
    pub generated_at: NaiveDateTime,
}

/// Generate a complete Markdown report for either view.
pub fn generate_markdown_report(dashboard: &Dashboard, metadata: &ReportMetadata) -> String {
    match dashboard {
        Dashboard::Student(view) => generate_student_report(view, metadata),
        Dashboard::Office(view) => generate_office_report(view, metadata),
    }
}

/// Generate a JSON report.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).map_err(Into::into)
}

fn generate_student_report(view: &StudentOverview, metadata: &ReportMetadata) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Welcome, {}\n\n", view.name));
    output.push_str(&format!("*{} • {}*\n\n", view.roll_number, view.department));
    output.push_str(&generate_metadata_section(metadata));
    output.push_str(&generate_tiles_section(&view.tiles));

    output.push_str("## Recent Applications\n\n");
    if view.recent_applications.is_empty() {
        output.push_str("No applications yet.\n\n");
    } else {
        for app in &view.recent_applications {
            output.push_str(&format!(
                "- **{}** • {} ({})\n",
                app.company, app.position, app.status
            ));
        }
        output.push('\n');
    }

    output.push_str(&generate_student_applications_section(&view.applications));
    output.push_str(&generate_interviews_section(&view.interviews));
    output.push_str(&generate_companies_section(&view.companies));
    output.push_str(&generate_footer());

    output
}

fn generate_office_report(view: &OfficeOverview, metadata: &ReportMetadata) -> String {
    let mut output = String::new();

    output.push_str("# TPO Dashboard\n\n");
    output.push_str(&generate_metadata_section(metadata));
    output.push_str(&generate_tiles_section(&view.tiles));

    output.push_str(&format!(
        "**Placement Rate:** {:.1}% ({} of {} students placed)\n\n",
        view.placement_rate * 100.0,
        view.placed_students,
        view.total_students
    ));

    output.push_str("## Placement by Department\n\n");
    if view.placements_by_department.is_empty() {
        output.push_str("No placements yet.\n\n");
    } else {
        output.push_str("| Department | Placed | Share |\n");
        output.push_str("|:---|:---:|:---:|\n");
        for (department, count) in view.placements_by_department.iter() {
            output.push_str(&format!(
                "| {} | {} | {:.0}% |\n",
                department,
                count,
                department_share(count, view.total_students)
            ));
        }
        output.push('\n');
    }

    output.push_str("## Application Status Overview\n\n");
    output.push_str("| Status | Count |\n");
    output.push_str("|:---|:---:|\n");
    for entry in &view.status_breakdown {
        output.push_str(&format!("| {} | {} |\n", entry.status, entry.count));
    }
    output.push('\n');

    output.push_str("## Recent Applications\n\n");
    if view.recent_applications.is_empty() {
        output.push_str("No applications yet.\n\n");
    } else {
        for record in &view.recent_applications {
            output.push_str(&format!(
                "- **{}** • {} • {} ({})\n",
                record.student_name,
                record.application.company,
                record.application.position,
                record.application.status
            ));
        }
        output.push('\n');
    }

    output.push_str("## Students\n\n");
    if view.students.is_empty() {
        output.push_str("No matching students.\n\n");
    } else {
        output.push_str("| Student | Roll Number | Department | CGPA | Applications | Status |\n");
        output.push_str("|:---|:---|:---|:---:|:---:|:---|\n");
        for row in &view.students {
            output.push_str(&format!(
                "| {} | {} | {} | {:.1} | {} | {} |\n",
                row.name,
                row.roll_number,
                row.department,
                row.cgpa,
                row.application_count,
                if row.placed { "Placed" } else { "In Process" }
            ));
        }
        output.push('\n');
    }

    output.push_str(&generate_office_applications_section(&view.applications));

    output.push_str("## Companies\n\n");
    if view.companies.is_empty() {
        output.push_str("No companies registered.\n\n");
    } else {
        output.push_str("| Company | Package | Deadline | Applications |\n");
        output.push_str("|:---|:---|:---|:---:|\n");
        for row in &view.companies {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                row.company.name,
                row.company.package,
                row.company.deadline.format(DATE_FORMAT),
                row.application_count
            ));
        }
        output.push('\n');
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    section
}

/// Generate the stat tiles as a one-row table.
fn generate_tiles_section(tiles: &[StatTile]) -> String {
    let mut section = String::new();

    section.push_str("## Overview\n\n");

    let labels: Vec<&str> = tiles.iter().map(|t| t.label).collect();
    let values: Vec<String> = tiles.iter().map(|t| t.value.to_string()).collect();

    section.push_str(&format!("| {} |\n", labels.join(" | ")));
    section.push_str(&format!("|{}\n", ":---:|".repeat(tiles.len())));
    section.push_str(&format!("| {} |\n\n", values.join(" | ")));

    section
}

fn generate_student_applications_section(applications: &[Application]) -> String {
    let mut section = String::new();

    section.push_str("## My Applications\n\n");
    if applications.is_empty() {
        section.push_str("No matching applications.\n\n");
        return section;
    }

    section.push_str("| Company | Position | Applied | Status | Next Step |\n");
    section.push_str("|:---|:---|:---|:---|:---|\n");
    for app in applications {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            app.company,
            app.position,
            app.application_date.format(DATE_FORMAT),
            app.status,
            next_step(app)
        ));
    }
    section.push('\n');

    section
}

fn generate_office_applications_section(records: &[ApplicationRecord]) -> String {
    let mut section = String::new();

    section.push_str("## Applications\n\n");
    if records.is_empty() {
        section.push_str("No matching applications.\n\n");
        return section;
    }

    section.push_str("| Student | Company | Position | Applied | Status |\n");
    section.push_str("|:---|:---|:---|:---|:---|\n");
    for record in records {
        let app = &record.application;
        section.push_str(&format!(
            "| {} ({}) | {} | {} | {} | {} |\n",
            record.student_name,
            record.student_roll,
            app.company,
            app.position,
            app.application_date.format(DATE_FORMAT),
            app.status
        ));
    }
    section.push('\n');

    section
}

fn next_step(app: &Application) -> String {
    match (&app.next_step, app.next_step_date) {
        (Some(step), Some(date)) => format!("{} ({})", step, date.format(DATE_FORMAT)),
        (Some(step), None) => step.clone(),
        _ => "-".to_string(),
    }
}

fn generate_interviews_section(interviews: &[Interview]) -> String {
    let mut section = String::new();

    section.push_str("## Upcoming Interviews\n\n");
    if interviews.is_empty() {
        section.push_str("No interviews scheduled.\n\n");
        return section;
    }

    for interview in interviews {
        section.push_str(&format!(
            "### {} • {}\n\n",
            interview.company, interview.position
        ));
        section.push_str(&format!("- **Type:** {}\n", interview.kind));
        section.push_str(&format!(
            "- **Date:** {}\n",
            interview.scheduled_date.format(DATE_TIME_FORMAT)
        ));
        section.push_str(&format!("- **Location:** {}\n", interview.location));
        if let Some(ref instructions) = interview.instructions {
            section.push_str(&format!("\n> {}\n", instructions));
        }
        section.push('\n');
    }

    section
}

fn generate_companies_section(companies: &[Company]) -> String {
    let mut section = String::new();

    section.push_str("## Available Companies\n\n");
    if companies.is_empty() {
        section.push_str("No matching companies.\n\n");
        return section;
    }

    for company in companies {
        section.push_str(&format!("### {}\n\n", company.name));
        section.push_str(&format!("{}\n\n", company.description));
        if !company.positions.is_empty() {
            section.push_str(&format!(
                "- **Positions:** {}\n",
                company.positions.join(", ")
            ));
        }
        if !company.requirements.is_empty() {
            section.push_str(&format!(
                "- **Requirements:** {}\n",
                company.requirements.join(", ")
            ));
        }
        section.push_str(&format!("- **Package:** {}\n", company.package));
        section.push_str(&format!(
            "- **Deadline:** {}\n\n",
            company.deadline.format(DATE_FORMAT)
        ));
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by Placetrack*\n".to_string()
}
