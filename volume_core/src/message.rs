use crate::version::Version;
use serde::{Deserialize, Serialize};

/// Page to worker wire contract. The worker uses the reported version for
/// its own cache invalidation and never answers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerMessage {
    #[serde(rename = "version")]
    VersionReport { value: Version },
}

impl WorkerMessage {
    pub fn version_report(version: Version) -> WorkerMessage {
        WorkerMessage::VersionReport { value: version }
    }

    /// Tag string carried in the message's `type` field.
    pub fn tag(&self) -> &'static str {
        match self {
            WorkerMessage::VersionReport { .. } => "version",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_version_report_wire_shape() {
        let message = WorkerMessage::version_report(Version::new("660731-1515").unwrap());
        let wire = serde_json::to_value(&message).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({"type": "version", "value": "660731-1515"})
        );
    }

    #[test]
    fn test_version_report_round_trips() {
        let message = WorkerMessage::version_report(Version::new("abc").unwrap());
        let wire = serde_json::to_string(&message).unwrap();
        let parsed: WorkerMessage = serde_json::from_str(&wire).unwrap();
        assert_eq!(parsed, message);
    }
}
