use job_board::error::AppError;
use job_board::workflows::application::{
    PersonalInfo, ReviewNotes, StepData, StepId, TechnicalAssessment,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Applicant answers keyed by step id, e.g.
/// `{"personal_info": {"name": "...", "email": "...", "phone": "..."}}`.
/// Steps left out keep whatever the workflow already holds (profile pre-fill).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AnswerSheet {
    #[serde(default)]
    personal_info: Option<PersonalInfo>,
    #[serde(default)]
    technical_assessment: Option<TechnicalAssessment>,
    #[serde(default)]
    review_submit: Option<ReviewNotes>,
}

impl AnswerSheet {
    pub(crate) fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub(crate) fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub(crate) fn for_step(&self, step: StepId) -> Option<StepData> {
        match step {
            StepId::PersonalInfo => self.personal_info.clone().map(StepData::from),
            StepId::TechnicalAssessment => self.technical_assessment.clone().map(StepData::from),
            StepId::ReviewSubmit => self.review_submit.clone().map(StepData::from),
        }
    }
}
