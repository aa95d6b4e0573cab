use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::records::values::has_information;

/// A flat job posting. Absent text fields carry the "no information" sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub code: String,
    pub title: String,
    pub client: String,
    pub requester: String,
    pub division: String,
    pub analyst: String,
    pub contract_type: String,
    pub hiring_deadline: String,
    pub objective: String,
    pub priority: String,
    pub origin: String,
    pub manager: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub requested_on: NaiveDate,
    pub expected_hire_by: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub country: String,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub region: String,
    pub workplace: String,
    pub disability_specific: String,
    pub age_range: String,
    pub work_hours: String,
    pub professional_level: String,
    pub academic_level: String,
    pub english_level: String,
    pub spanish_level: String,
    pub other_language: String,
    pub areas: String,
    pub description: String,
    pub requirements: String,
    pub notes: String,
    pub travel: String,
    pub equipment: String,
    pub sale_value: String,
    pub purchase_value: String,
    pub purchase_value_2: String,
}

impl Job {
    /// Text the analysis prompts evaluate resumes against: the description
    /// when present, the title otherwise.
    pub fn analysis_brief(&self) -> String {
        let mut parts = Vec::new();
        if has_information(&self.description) {
            parts.push(self.description.as_str());
        } else {
            parts.push(self.title.as_str());
        }
        if has_information(&self.requirements) {
            parts.push(self.requirements.as_str());
        }
        parts.join("\n\n")
    }
}
