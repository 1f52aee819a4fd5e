use std::fmt;

use serde_json::Value;

use crate::sdk::HookPayload;

/// Which hook an observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Allowance,
    Intent,
}

/// Outcome reported by the allowance hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowanceOutcome {
    Success { transaction_hash: Option<String> },
    Error { message: Option<String> },
    /// A status this crate does not know yet.
    Other { status: String },
}

/// Lifecycle step reported by the intent hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentLifecycle {
    Created { intent_id: Option<String> },
    Processing { intent_id: Option<String> },
    Processed { intent_id: Option<String> },
    Completed { transaction_hash: Option<String> },
    Error { message: Option<String> },
    Other { status: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    Allowance(AllowanceOutcome),
    Intent(IntentLifecycle),
}

/// Classifies a raw hook payload.
pub fn classify(kind: HookKind, payload: &HookPayload) -> StatusEvent {
    let data = &payload.data;
    let status = payload.status.as_str();
    match kind {
        HookKind::Allowance => StatusEvent::Allowance(match status {
            "success" | "completed" => AllowanceOutcome::Success {
                transaction_hash: transaction_hash(data),
            },
            "error" | "failed" => AllowanceOutcome::Error {
                message: text_field(data, &["message", "error"]),
            },
            other => AllowanceOutcome::Other {
                status: other.to_string(),
            },
        }),
        HookKind::Intent => StatusEvent::Intent(match status {
            "created" => IntentLifecycle::Created {
                intent_id: intent_id(data),
            },
            "processing" => IntentLifecycle::Processing {
                intent_id: intent_id(data),
            },
            "processed" => IntentLifecycle::Processed {
                intent_id: intent_id(data),
            },
            "completed" | "success" => IntentLifecycle::Completed {
                transaction_hash: transaction_hash(data),
            },
            "error" | "failed" => IntentLifecycle::Error {
                message: text_field(data, &["message", "error"]),
            },
            other => IntentLifecycle::Other {
                status: other.to_string(),
            },
        }),
    }
}

fn transaction_hash(data: &Value) -> Option<String> {
    text_field(data, &["transactionHash", "txHash", "hash"])
}

fn intent_id(data: &Value) -> Option<String> {
    text_field(data, &["intentId", "id"])
}

/// First non-empty string or number among `keys`.
fn text_field(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match data.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

impl fmt::Display for AllowanceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { transaction_hash } => write!(
                f,
                "Allowance set successfully: {}",
                transaction_hash.as_deref().unwrap_or("Confirmed")
            ),
            Self::Error { message } => write!(
                f,
                "Allowance failed: {}",
                message.as_deref().unwrap_or("Unknown error")
            ),
            Self::Other { status } => write!(f, "Allowance status: {}", status),
        }
    }
}

impl fmt::Display for IntentLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { intent_id } => write!(
                f,
                "Intent created: {}",
                intent_id.as_deref().unwrap_or("Pending")
            ),
            Self::Processing { intent_id } => write!(
                f,
                "Intent processing: {}",
                intent_id.as_deref().unwrap_or("In progress")
            ),
            Self::Processed { intent_id } => write!(
                f,
                "Intent processed: {}",
                intent_id.as_deref().unwrap_or("In progress")
            ),
            Self::Completed { transaction_hash } => write!(
                f,
                "Intent completed: {}",
                transaction_hash.as_deref().unwrap_or("Confirmed")
            ),
            Self::Error { message } => write!(
                f,
                "Intent failed: {}",
                message.as_deref().unwrap_or("Unknown error")
            ),
            Self::Other { status } => write!(f, "Intent status: {}", status),
        }
    }
}

/// Latest observation per hook kind. Never a history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSlots {
    allowance: Option<AllowanceOutcome>,
    intent: Option<IntentLifecycle>,
}

impl StatusSlots {
    pub fn record(&mut self, event: StatusEvent) {
        match event {
            StatusEvent::Allowance(outcome) => self.allowance = Some(outcome),
            StatusEvent::Intent(step) => self.intent = Some(step),
        }
    }

    pub fn allowance(&self) -> Option<&AllowanceOutcome> {
        self.allowance.as_ref()
    }

    pub fn intent(&self) -> Option<&IntentLifecycle> {
        self.intent.as_ref()
    }

    pub fn clear(&mut self) {
        self.allowance = None;
        self.intent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn allowance_success_carries_hash() {
        let event = classify(
            HookKind::Allowance,
            &HookPayload::new("success", json!({ "transactionHash": "0xabc" })),
        );
        assert_eq!(
            event,
            StatusEvent::Allowance(AllowanceOutcome::Success {
                transaction_hash: Some("0xabc".to_string())
            })
        );
    }

    #[test]
    fn allowance_error_without_message_renders_unknown() {
        let event = classify(HookKind::Allowance, &HookPayload::new("error", Value::Null));
        let StatusEvent::Allowance(outcome) = event else {
            panic!("expected allowance outcome");
        };
        assert_eq!(outcome.to_string(), "Allowance failed: Unknown error");
    }

    #[test]
    fn intent_lifecycle_states_are_classified() {
        let cases = [
            ("created", json!({ "intentId": 42 }), "Intent created: 42"),
            ("processing", json!({}), "Intent processing: In progress"),
            ("processed", json!({ "intentId": "i-1" }), "Intent processed: i-1"),
            ("completed", json!({ "transactionHash": "0x1" }), "Intent completed: 0x1"),
            ("error", json!({ "message": "slippage" }), "Intent failed: slippage"),
        ];
        for (status, data, expected) in cases {
            let StatusEvent::Intent(step) =
                classify(HookKind::Intent, &HookPayload::new(status, data))
            else {
                panic!("expected intent event");
            };
            assert_eq!(step.to_string(), expected);
        }
    }

    #[test]
    fn unknown_status_is_passed_through() {
        let event = classify(
            HookKind::Intent,
            &HookPayload::new("awaiting_signature", json!({})),
        );
        assert_eq!(
            event,
            StatusEvent::Intent(IntentLifecycle::Other {
                status: "awaiting_signature".to_string()
            })
        );
        let StatusEvent::Intent(step) = event else {
            unreachable!()
        };
        assert_eq!(step.to_string(), "Intent status: awaiting_signature");
    }

    #[test]
    fn slots_keep_only_latest_per_kind() {
        let mut slots = StatusSlots::default();
        slots.record(StatusEvent::Intent(IntentLifecycle::Created { intent_id: None }));
        slots.record(StatusEvent::Intent(IntentLifecycle::Completed {
            transaction_hash: None,
        }));
        slots.record(StatusEvent::Allowance(AllowanceOutcome::Other {
            status: "pending".to_string(),
        }));

        assert_eq!(
            slots.intent(),
            Some(&IntentLifecycle::Completed {
                transaction_hash: None
            })
        );
        assert!(slots.allowance().is_some());

        slots.clear();
        assert_eq!(slots, StatusSlots::default());
    }
}
