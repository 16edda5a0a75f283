//! Order Status Policy
//!
//! The status pipeline is `unconfirmed → cooking → delivering →
//! arrived`. Which transitions a vendor admin may actually perform is a
//! named policy, selected by config (`STATUS_POLICY`), not hard-coded
//! into the update handler.

use shared::models::OrderStatus;

/// Transition rule applied on status updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Any state is reachable from any state via an explicit update.
    /// Matches the historical behavior of the service.
    #[default]
    Permissive,
    /// Only single forward steps along the pipeline are allowed.
    ForwardOnly,
}

impl StatusPolicy {
    /// Whether this policy allows an explicit `from → to` update
    pub fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
        match self {
            StatusPolicy::Permissive => true,
            StatusPolicy::ForwardOnly => to.step() == from.step() + 1,
        }
    }
}

impl std::str::FromStr for StatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permissive" => Ok(StatusPolicy::Permissive),
            "forward_only" => Ok(StatusPolicy::ForwardOnly),
            other => Err(format!("unknown status policy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderStatus::*;

    #[test]
    fn test_permissive_allows_everything() {
        let policy = StatusPolicy::Permissive;
        for from in [Unconfirmed, Cooking, Delivering, Arrived] {
            for to in [Unconfirmed, Cooking, Delivering, Arrived] {
                assert!(policy.allows(from, to));
            }
        }
    }

    #[test]
    fn test_forward_only_allows_single_steps() {
        let policy = StatusPolicy::ForwardOnly;
        assert!(policy.allows(Unconfirmed, Cooking));
        assert!(policy.allows(Cooking, Delivering));
        assert!(policy.allows(Delivering, Arrived));
    }

    #[test]
    fn test_forward_only_rejects_skips_and_backwards() {
        let policy = StatusPolicy::ForwardOnly;
        assert!(!policy.allows(Unconfirmed, Delivering)); // skip
        assert!(!policy.allows(Cooking, Unconfirmed)); // backwards
        assert!(!policy.allows(Arrived, Cooking)); // out of terminal
        assert!(!policy.allows(Cooking, Cooking)); // no-op
    }

    #[test]
    fn test_policy_parses_from_config_strings() {
        assert_eq!(
            "permissive".parse::<StatusPolicy>().unwrap(),
            StatusPolicy::Permissive
        );
        assert_eq!(
            "forward_only".parse::<StatusPolicy>().unwrap(),
            StatusPolicy::ForwardOnly
        );
        assert!("strict".parse::<StatusPolicy>().is_err());
    }
}
