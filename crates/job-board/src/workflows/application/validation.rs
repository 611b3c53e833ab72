use std::fmt;

use super::domain::{PersonalInfo, StepData, TechnicalAssessment};
use super::steps::StepId;

/// Minimum number of digits a phone number must carry.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Form field a validation issue points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
    TechnicalAssessment,
}

impl Field {
    pub const fn label(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::TechnicalAssessment => "technicalAssessment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    Missing(Field),
    PhoneTooShort { digits: usize },
}

impl FieldIssue {
    pub const fn field(&self) -> Field {
        match self {
            FieldIssue::Missing(field) => *field,
            FieldIssue::PhoneTooShort { .. } => Field::Phone,
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssue::Missing(field) => write!(f, "{} is required", field.label()),
            FieldIssue::PhoneTooShort { digits } => write!(
                f,
                "phone must contain at least {MIN_PHONE_DIGITS} digits (found {digits})"
            ),
        }
    }
}

/// Step-scoped validation failure listing every violated field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{step} is incomplete: {}", summarize(.issues))]
pub struct StepValidationError {
    pub step: StepId,
    pub issues: Vec<FieldIssue>,
}

impl StepValidationError {
    pub fn fields(&self) -> Vec<Field> {
        self.issues.iter().map(FieldIssue::field).collect()
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks the record held for `step`. A missing record is validated as empty.
pub fn validate_step(step: StepId, data: Option<&StepData>) -> Result<(), StepValidationError> {
    let issues = match (step, data) {
        (StepId::PersonalInfo, Some(StepData::PersonalInfo(info))) => personal_info_issues(info),
        (StepId::PersonalInfo, _) => personal_info_issues(&PersonalInfo::default()),
        (StepId::TechnicalAssessment, Some(StepData::TechnicalAssessment(answer))) => {
            assessment_issues(answer)
        }
        (StepId::TechnicalAssessment, _) => assessment_issues(&TechnicalAssessment::default()),
        (StepId::ReviewSubmit, _) => Vec::new(),
    };

    if issues.is_empty() {
        Ok(())
    } else {
        Err(StepValidationError { step, issues })
    }
}

fn personal_info_issues(info: &PersonalInfo) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    if info.name.trim().is_empty() {
        issues.push(FieldIssue::Missing(Field::Name));
    }
    if info.email.trim().is_empty() {
        issues.push(FieldIssue::Missing(Field::Email));
    }
    if info.phone.is_empty() {
        issues.push(FieldIssue::Missing(Field::Phone));
    } else if info.phone.digit_count() < MIN_PHONE_DIGITS {
        issues.push(FieldIssue::PhoneTooShort {
            digits: info.phone.digit_count(),
        });
    }
    issues
}

fn assessment_issues(answer: &TechnicalAssessment) -> Vec<FieldIssue> {
    if answer.technical_assessment.trim().is_empty() {
        vec![FieldIssue::Missing(Field::TechnicalAssessment)]
    } else {
        Vec::new()
    }
}
