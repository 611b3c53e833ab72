use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of one page of the multi-part application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    PersonalInfo,
    TechnicalAssessment,
    ReviewSubmit,
}

impl StepId {
    pub const fn ordered() -> [Self; 3] {
        [
            Self::PersonalInfo,
            Self::TechnicalAssessment,
            Self::ReviewSubmit,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::PersonalInfo => "personal_info",
            Self::TechnicalAssessment => "technical_assessment",
            Self::ReviewSubmit => "review_submit",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|step| step.key() == raw.trim())
    }

    pub const fn definition(self) -> StepDefinition {
        match self {
            Self::PersonalInfo => StepDefinition {
                id: self,
                title: "Personal Information",
                description: "Basic contact and personal details",
            },
            Self::TechnicalAssessment => StepDefinition {
                id: self,
                title: "Technical Assessment",
                description: "Skills, experience, and technical background",
            },
            Self::ReviewSubmit => StepDefinition {
                id: self,
                title: "Review & Submit",
                description: "Review your application and submit",
            },
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Display metadata for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepDefinition {
    pub id: StepId,
    pub title: &'static str,
    pub description: &'static str,
}

/// Registry lookup for a posting's ordered step list.
pub fn definitions_for(steps: &[StepId]) -> Vec<StepDefinition> {
    steps.iter().map(|step| step.definition()).collect()
}

/// Decodes a posting's step list, dropping identifiers this client does not
/// know and repeated entries while keeping the backend's order.
pub(crate) fn deserialize_known_steps<'de, D>(deserializer: D) -> Result<Vec<StepId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(known_steps(raw.iter().map(String::as_str)))
}

pub(crate) fn known_steps<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<StepId> {
    let mut steps = Vec::new();
    for step in raw.into_iter().filter_map(StepId::parse) {
        if !steps.contains(&step) {
            steps.push(step);
        }
    }
    steps
}
