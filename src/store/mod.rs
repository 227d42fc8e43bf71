//! Record store for placement data.
//!
//! Supplies the student and company collections the dashboards are built
//! from, either from the built-in campus fixtures or from JSON datasets
//! on disk.

use crate::models::{Company, Student};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Built-in campus dataset.
const CAMPUS_FIXTURES: &str = include_str!("../../fixtures/campus.json");

/// Source of placement records.
pub trait RecordStore {
    /// Students, each owning their applications and interviews.
    fn students(&self) -> &[Student];
    /// Companies recruiting this season.
    fn companies(&self) -> &[Company];
}

/// An in-memory collection of students and companies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub companies: Vec<Company>,
}

impl RecordStore for Dataset {
    fn students(&self) -> &[Student] {
        &self.students
    }

    fn companies(&self) -> &[Company] {
        &self.companies
    }
}

impl Dataset {
    /// The built-in campus dataset.
    pub fn fixtures() -> Result<Self> {
        Self::parse(CAMPUS_FIXTURES).context("Failed to parse built-in campus fixtures")
    }

    /// Parse a dataset from JSON text.
    pub fn parse(content: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(content)?;
        Ok(dataset)
    }

    /// Load a dataset from a JSON file, or merge every JSON file in a directory.
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Self::load_dir(path);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse dataset: {}", path.display()))
    }

    /// Merge every `*.json` file under `dir`, in file name order.
    fn load_dir(dir: &Path) -> Result<Self> {
        let files = dataset_files(dir)?;
        info!("Found {} dataset file(s) in {}", files.len(), dir.display());

        let mut merged = Dataset::default();
        for file in files {
            let part = Self::load(&file)?;
            debug!(
                "{}: {} students, {} companies",
                file.display(),
                part.students.len(),
                part.companies.len()
            );
            merged.extend(part);
        }

        Ok(merged)
    }

    /// Append another dataset's records after this one's.
    pub fn extend(&mut self, other: Dataset) {
        self.students.extend(other.students);
        self.companies.extend(other.companies);
    }
}

/// List the JSON files under `dir`, skipping hidden entries.
fn dataset_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to read directory: {}", dir.display()))?;
        let path = entry.path();
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");

        if entry.file_type().is_file() && is_json {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map(|n| n.starts_with('.')).unwrap_or(false)
}
