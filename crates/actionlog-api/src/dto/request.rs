//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One client-reported UI interaction.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ActionLogPayload {
    /// Behaviour type (e.g. `"read"`, `"create"`).
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type is required"))]
    pub event_type: String,
    /// The UI element or action the behaviour applies to.
    #[validate(length(min = 1, message = "target is required"))]
    pub target: String,
}

/// Body of `POST /action-log`.
///
/// Deployments send either a single event object or an array of them;
/// both shapes are accepted through the same endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionLogBody {
    /// A single event object.
    One(ActionLogPayload),
    /// An array of event objects.
    Many(Vec<ActionLogPayload>),
}

impl ActionLogBody {
    /// Normalize both body shapes into a payload list.
    pub fn into_payloads(self) -> Vec<ActionLogPayload> {
        match self {
            Self::One(payload) => vec![payload],
            Self::Many(payloads) => payloads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_object_body() {
        let body: ActionLogBody =
            serde_json::from_str(r#"{"type": "read", "target": "letter-card"}"#).unwrap();
        let payloads = body.into_payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].event_type, "read");
        assert_eq!(payloads[0].target, "letter-card");
    }

    #[test]
    fn test_array_body() {
        let body: ActionLogBody = serde_json::from_str(
            r#"[{"type": "read", "target": "a"}, {"type": "create", "target": "b"}]"#,
        )
        .unwrap();
        let payloads = body.into_payloads();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[1].event_type, "create");
    }

    #[test]
    fn test_blank_fields_fail_validation() {
        use validator::Validate;

        let payload = ActionLogPayload {
            event_type: String::new(),
            target: "a".to_string(),
        };
        assert!(payload.validate().is_err());
    }
}
