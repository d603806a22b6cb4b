use serde::{Deserialize, Serialize};

/// Plans whose users receive purchase-confirmation pushes.
const PRIVILEGED_PLANS: [&str; 2] = ["pro", "experto"];

/// User record read from the external document store.
///
/// The store is owned by another system; this service only consults the
/// push token and the subscription plan and never writes the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "pushToken", skip_serializing_if = "Option::is_none")]
    pub push_token: Option<String>,
    #[serde(default)]
    pub plan: String,
}

impl UserRecord {
    pub fn has_privileged_plan(&self) -> bool {
        PRIVILEGED_PLANS.contains(&self.plan.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pro_and_experto_plans_are_privileged() {
        for plan in ["pro", "experto"] {
            let record = UserRecord {
                push_token: Some("token".to_string()),
                plan: plan.to_string(),
            };
            assert!(record.has_privileged_plan(), "plan {} should be privileged", plan);
        }
    }

    #[test]
    fn other_plans_are_not_privileged() {
        for plan in ["free", "basic", "PRO", ""] {
            let record = UserRecord {
                push_token: Some("token".to_string()),
                plan: plan.to_string(),
            };
            assert!(!record.has_privileged_plan(), "plan {:?} should not be privileged", plan);
        }
    }
}
