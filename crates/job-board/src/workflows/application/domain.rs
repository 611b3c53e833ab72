use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::steps::{deserialize_known_steps, StepId};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Job posting as served by `GET /jobs/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(flatten)]
    pub location: JobLocation,
    #[serde(flatten)]
    pub salary: SalaryRange,
    pub employer: Employer,
    #[serde(default)]
    pub category: Option<JobCategory>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_known_steps")]
    pub application_steps: Vec<StepId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLocation {
    #[serde(default)]
    pub location_state: Option<String>,
    #[serde(default)]
    pub location_city: Option<String>,
    #[serde(default)]
    pub location_state_ref: Option<StateRef>,
}

impl JobLocation {
    /// "City, State" using the state's display name when the backend includes it.
    pub fn label(&self) -> String {
        let state = self
            .location_state_ref
            .as_ref()
            .map(|state| state.name.as_str())
            .or(self.location_state.as_deref());
        match (self.location_city.as_deref(), state) {
            (Some(city), Some(state)) => format!("{city}, {state}"),
            (Some(city), None) => city.to_string(),
            (None, Some(state)) => state.to_string(),
            (None, None) => "Location not specified".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRef {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRange {
    #[serde(default)]
    pub salary_min: Option<u32>,
    #[serde(default)]
    pub salary_max: Option<u32>,
}

impl SalaryRange {
    pub fn label(&self) -> String {
        match (self.salary_min, self.salary_max) {
            (None, None) => "Salary not specified".to_string(),
            (None, Some(max)) => format!("Up to ${}", thousands(max)),
            (Some(min), None) => format!("${}+", thousands(min)),
            (Some(min), Some(max)) => format!("${} - ${}", thousands(min), thousands(max)),
        }
    }
}

fn thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employer {
    pub company_name: String,
    #[serde(default)]
    pub company_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCategory {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    JobSeeker,
    Employer,
}

/// Signed-in user's profile from `GET /auth/profile`, used for pre-fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location_state: Option<String>,
    #[serde(default)]
    pub location_city: Option<String>,
}

/// Digits-only phone value. Anything else typed by the applicant is stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn from_input(raw: &str) -> Self {
        Self(raw.chars().filter(char::is_ascii_digit).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn digit_count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Self::from_input(&raw))
    }
}

impl From<&str> for PhoneNumber {
    fn from(raw: &str) -> Self {
        Self::from_input(raw)
    }
}

/// Fields collected on the `personal_info` step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: PhoneNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl PersonalInfo {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile
                .phone
                .as_deref()
                .map(PhoneNumber::from_input)
                .unwrap_or_default(),
            date_of_birth: None,
            address: None,
        }
    }
}

/// Free text collected on the `technical_assessment` step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalAssessment {
    #[serde(default)]
    pub technical_assessment: String,
}

/// Optional note entered on the review page; prior steps stay read-only there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewNotes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
}

/// Typed record for one step, keyed by the step it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StepData {
    PersonalInfo(PersonalInfo),
    TechnicalAssessment(TechnicalAssessment),
    ReviewSubmit(ReviewNotes),
}

impl StepData {
    pub const fn step(&self) -> StepId {
        match self {
            StepData::PersonalInfo(_) => StepId::PersonalInfo,
            StepData::TechnicalAssessment(_) => StepId::TechnicalAssessment,
            StepData::ReviewSubmit(_) => StepId::ReviewSubmit,
        }
    }

    pub fn empty(step: StepId) -> Self {
        match step {
            StepId::PersonalInfo => StepData::PersonalInfo(PersonalInfo::default()),
            StepId::TechnicalAssessment => {
                StepData::TechnicalAssessment(TechnicalAssessment::default())
            }
            StepId::ReviewSubmit => StepData::ReviewSubmit(ReviewNotes::default()),
        }
    }
}

impl From<PersonalInfo> for StepData {
    fn from(value: PersonalInfo) -> Self {
        StepData::PersonalInfo(value)
    }
}

impl From<TechnicalAssessment> for StepData {
    fn from(value: TechnicalAssessment) -> Self {
        StepData::TechnicalAssessment(value)
    }
}

impl From<ReviewNotes> for StepData {
    fn from(value: ReviewNotes) -> Self {
        StepData::ReviewSubmit(value)
    }
}

/// Body of `POST /jobs/{id}/apply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationPayload {
    pub cover_letter: String,
    pub application_data: BTreeMap<StepId, StepData>,
}

impl ApplicationPayload {
    pub fn from_step_data(step_data: &BTreeMap<StepId, StepData>) -> Self {
        let cover_letter = match step_data.get(&StepId::ReviewSubmit) {
            Some(StepData::ReviewSubmit(notes)) => notes.cover_letter.clone().unwrap_or_default(),
            _ => String::new(),
        };

        Self {
            cover_letter,
            application_data: step_data.clone(),
        }
    }
}

/// Status reported by the backend for a stored application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Reviewed,
    Interview,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }
}

/// Created application returned by the apply endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReceipt {
    pub id: String,
    pub job_posting_id: JobId,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
}
