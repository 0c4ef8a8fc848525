use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Alert id shared by both detectors.
pub const ALERT_ID: &str = "FORTA-1";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FindingSeverity {
    Unknown,
    Info,
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FindingType {
    Unknown,
    Exploit,
    Suspicious,
    Degraded,
    Info,
}

/// One detected condition, ready for the alert emitter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub name: String,
    pub description: String,
    pub alert_id: String,
    pub protocol: String,
    pub severity: FindingSeverity,
    #[serde(rename = "type")]
    pub finding_type: FindingType,
    pub metadata: BTreeMap<String, String>,
}

impl Finding {
    /// Informational finding with no metadata yet.
    pub fn info(
        name: impl Into<String>,
        description: impl Into<String>,
        alert_id: impl Into<String>,
        protocol: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            alert_id: alert_id.into(),
            protocol: protocol.into(),
            severity: FindingSeverity::Info,
            finding_type: FindingType::Info,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }
}
