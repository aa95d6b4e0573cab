use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::records::values::has_information;

/// Self-declared yes/no answer that may be missing in the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disclosure {
    Yes,
    No,
    #[default]
    Unknown,
}

impl Disclosure {
    pub fn from_text(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "sim" | "s" | "yes" | "true" => Disclosure::Yes,
            "não" | "nao" | "n" | "no" | "false" => Disclosure::No,
            _ => Disclosure::Unknown,
        }
    }
}

/// A flat, fully populated applicant record.
///
/// Every text field holds real data or the "no information" sentinel; dates
/// fall back to 1900-01-01.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub professional_code: String,
    pub name: String,
    pub email: String,
    pub sex: String,
    pub marital_status: String,
    pub birth_date: NaiveDate,
    pub phone: String,
    pub mobile_phone: String,
    pub location: String,
    pub address: String,
    pub disability: Disclosure,
    pub current_role: String,
    pub objective: String,
    pub linkedin_url: String,
    pub title: String,
    pub domain: String,
    pub technical_skills: String,
    pub academic_level: String,
    pub courses: String,
    pub certifications: String,
    pub remuneration: f64,
    pub professional_level: String,
    pub english_level: String,
    pub spanish_level: String,
    pub other_language: String,
    pub resume_text: String,
    pub institution: String,
    pub qualifications: String,
    pub experience: String,
    pub other_course: String,
    pub current_project: String,
    pub unit: String,
    pub resume_file: String,
    pub registered_on: NaiveDate,
    pub updated_on: NaiveDate,
    /// Professional fields joined for embedding-based matching.
    pub searchable_text: String,
}

impl Candidate {
    /// The resume file reference, if the source carried one.
    pub fn resume_path(&self) -> Option<&str> {
        has_information(&self.resume_file).then_some(self.resume_file.as_str())
    }

    pub fn field(&self, field: CandidateField) -> &str {
        match field {
            CandidateField::Name => &self.name,
            CandidateField::Email => &self.email,
            CandidateField::CurrentRole => &self.current_role,
            CandidateField::Objective => &self.objective,
            CandidateField::Title => &self.title,
            CandidateField::Domain => &self.domain,
            CandidateField::TechnicalSkills => &self.technical_skills,
            CandidateField::Qualifications => &self.qualifications,
            CandidateField::Experience => &self.experience,
            CandidateField::EnglishLevel => &self.english_level,
            CandidateField::AcademicLevel => &self.academic_level,
            CandidateField::ResumeText => &self.resume_text,
            CandidateField::ResumeFile => &self.resume_file,
        }
    }
}

/// Text fields that callers may require to be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateField {
    Name,
    Email,
    CurrentRole,
    Objective,
    Title,
    Domain,
    TechnicalSkills,
    Qualifications,
    Experience,
    EnglishLevel,
    AcademicLevel,
    ResumeText,
    ResumeFile,
}

impl FromStr for CandidateField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_string()))
            .map_err(|_| format!("unknown candidate field '{}'", s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disclosure_from_text() {
        assert_eq!(Disclosure::from_text("Sim"), Disclosure::Yes);
        assert_eq!(Disclosure::from_text("Não"), Disclosure::No);
        assert_eq!(Disclosure::from_text("sem informacao"), Disclosure::Unknown);
        assert_eq!(Disclosure::from_text(""), Disclosure::Unknown);
    }

    #[test]
    fn test_candidate_field_from_str() {
        assert_eq!(
            "technical_skills".parse::<CandidateField>().unwrap(),
            CandidateField::TechnicalSkills
        );
        assert!("salary".parse::<CandidateField>().is_err());
    }

    #[test]
    fn test_disclosure_serializes_without_null() {
        let json = serde_json::to_string(&Disclosure::Unknown).unwrap();
        assert_eq!(json, "\"unknown\"");
    }
}
