use serde::{Deserialize, Serialize};

use super::{wire, RecordId};

/// Profile of the signed-in agent who owns a dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentProfile {
    #[serde(deserialize_with = "wire::record_id")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// snake_case, e.g. "real_estate_agent"
    #[serde(default)]
    pub agent_type: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default = "onboarded", deserialize_with = "wire::null_as_default")]
    pub onboarding_complete: bool,
}

fn onboarded() -> bool {
    true
}

impl AgentProfile {
    /// "real_estate_agent" -> "Real Estate Agent"
    pub fn agent_type_label(&self) -> String {
        self.agent_type
            .as_deref()
            .unwrap_or_default()
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
