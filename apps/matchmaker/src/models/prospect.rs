use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An applicant linked to a job through the recruiting funnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    pub job_code: String,
    pub job_title: String,
    pub candidate_code: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub comment: String,
    pub recruiter: String,
    pub applied_on: NaiveDate,
    pub last_updated: NaiveDate,
}
