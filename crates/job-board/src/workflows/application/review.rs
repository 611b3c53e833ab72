use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::StepData;
use super::steps::StepId;

pub const NOT_PROVIDED: &str = "Not provided";
pub const NO_TECHNICAL_INFORMATION: &str = "No technical information provided";

/// Read-only summary rendered on the review step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub sections: Vec<ReviewSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSection {
    pub step: StepId,
    pub title: &'static str,
    pub entries: Vec<ReviewEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    pub label: &'static str,
    pub value: String,
}

impl ReviewSummary {
    /// One section per non-review step, in the posting's order. Values are
    /// shown exactly as entered.
    pub fn build(steps: &[StepId], step_data: &BTreeMap<StepId, StepData>) -> Self {
        let sections = steps
            .iter()
            .filter(|step| **step != StepId::ReviewSubmit)
            .map(|step| ReviewSection {
                step: *step,
                title: step.definition().title,
                entries: entries_for(*step, step_data.get(step)),
            })
            .collect();

        Self { sections }
    }

    pub fn value(&self, step: StepId, label: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|section| section.step == step)?
            .entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.value.as_str())
    }
}

fn entries_for(step: StepId, data: Option<&StepData>) -> Vec<ReviewEntry> {
    match (step, data) {
        (StepId::PersonalInfo, Some(StepData::PersonalInfo(info))) => vec![
            entry("Name", &info.name),
            entry("Email", &info.email),
            entry("Phone", info.phone.as_str()),
            entry(
                "Date of Birth",
                &info
                    .date_of_birth
                    .map(|date| date.to_string())
                    .unwrap_or_default(),
            ),
            entry("Address", info.address.as_deref().unwrap_or_default()),
        ],
        (StepId::PersonalInfo, _) => ["Name", "Email", "Phone", "Date of Birth", "Address"]
            .into_iter()
            .map(|label| entry(label, ""))
            .collect(),
        (StepId::TechnicalAssessment, data) => {
            let text = match data {
                Some(StepData::TechnicalAssessment(answer)) => answer.technical_assessment.as_str(),
                _ => "",
            };
            let value = if text.is_empty() {
                NO_TECHNICAL_INFORMATION.to_string()
            } else {
                text.to_string()
            };
            vec![ReviewEntry {
                label: "Technical Background",
                value,
            }]
        }
        (StepId::ReviewSubmit, _) => Vec::new(),
    }
}

fn entry(label: &'static str, value: &str) -> ReviewEntry {
    let value = if value.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        value.to_string()
    };
    ReviewEntry { label, value }
}
