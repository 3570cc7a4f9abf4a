//! YAML configuration for fixture generation.
//!
//! Every field is optional in the file; missing values fall back to the
//! defaults of the shared development database (300 students, 10 tutors,
//! one admin, 10 sheets with 3 tasks each).

use crate::renderer::Quoting;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Cost bounds accepted by bcrypt
const MIN_PASSWORD_COST: u32 = 4;
const MAX_PASSWORD_COST: u32 = 31;

/// How many rows of each kind to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Counts {
    pub admins: usize,
    pub tutors: usize,
    pub students: usize,
    pub sheets: usize,
    pub tasks_per_sheet: usize,
    /// Number of exercise groups; one per tutor when unset
    pub groups: Option<usize>,
    pub materials: usize,
}

impl Default for Counts {
    fn default() -> Self {
        Self {
            admins: 1,
            tutors: 10,
            students: 300,
            sheets: 10,
            tasks_per_sheet: 3,
            groups: None,
            materials: 10,
        }
    }
}

impl Counts {
    pub fn users(&self) -> usize {
        self.admins + self.tutors + self.students
    }

    pub fn tasks(&self) -> usize {
        self.sheets * self.tasks_per_sheet
    }

    pub fn groups(&self) -> usize {
        self.groups.unwrap_or(self.tutors)
    }
}

/// Complete fixture configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureConfig {
    /// Seed for the single RNG driving all generated values
    pub seed: u64,
    pub counts: Counts,
    /// Course names, assigned IDs 1.. in order
    pub courses: Vec<String>,
    /// Exam names, all held in the first course
    pub exams: Vec<String>,
    /// 1-based position in `courses` of the course owning the materials
    pub material_course: usize,
    /// 1-based position in `courses` of the course owning the groups
    pub group_course: usize,
    /// String literal quoting of the rendered script
    pub quoting: Quoting,
    /// Plain password shared by every generated account
    pub password: String,
    /// bcrypt cost used to hash `password`
    pub password_cost: u32,
    /// Address of the first admin, used to log into the dev instance
    pub login_email: Option<String>,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            counts: Counts::default(),
            courses: vec!["Info2".to_string(), "Info3".to_string()],
            exams: vec!["main".to_string(), "second".to_string()],
            material_course: 1,
            group_course: 1,
            quoting: Quoting::Escaped,
            password: "test".to_string(),
            password_cost: 10,
            login_email: Some("test@uni-tuebingen.de".to_string()),
        }
    }
}

impl FixtureConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: FixtureConfig = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Reject settings the generator cannot satisfy
    pub fn validate(&self) -> anyhow::Result<()> {
        let counts = &self.counts;

        if self.courses.is_empty() {
            bail!("At least one course is required");
        }
        for (setting, position) in [
            ("material_course", self.material_course),
            ("group_course", self.group_course),
        ] {
            if !(1..=self.courses.len()).contains(&position) {
                bail!(
                    "{} must be between 1 and {} (number of courses), got {}",
                    setting,
                    self.courses.len(),
                    position
                );
            }
        }

        let enrollments = counts
            .admins
            .checked_add(counts.tutors)
            .and_then(|n| n.checked_add(counts.students))
            .and_then(|n| n.checked_mul(self.courses.len()));
        let tasks = counts.sheets.checked_mul(counts.tasks_per_sheet);
        let per_student = tasks.and_then(|t| t.checked_add(counts.groups()));
        let rows = per_student.and_then(|n| n.checked_mul(counts.students));
        if enrollments.is_none() || rows.is_none() {
            bail!("Counts are too large");
        }

        if counts.tutors == 0 && counts.students > 0 && counts.tasks() > 0 {
            bail!("Submissions need at least one tutor to grade them");
        }
        if counts.tutors == 0 && counts.groups() > 0 {
            bail!("Groups need at least one tutor");
        }
        if !(MIN_PASSWORD_COST..=MAX_PASSWORD_COST).contains(&self.password_cost) {
            bail!(
                "password_cost must be between {} and {}",
                MIN_PASSWORD_COST,
                MAX_PASSWORD_COST
            );
        }

        Ok(())
    }
}
