use crate::models::RoleSet;

/// Whether a user may read or download a guide. Pure predicate; the caller
/// is responsible for rejecting unauthenticated requests and for filtering
/// unpublished guides before this point.
///
/// Precedence, first match wins:
/// 1. staff role (Uploader/Admin/SuperAdmin)
/// 2. active subscription
/// 3. free guide (price 0)
pub fn can_access(roles: &RoleSet, has_active_subscription: bool, price_cents: i64) -> bool {
    if roles.is_staff() {
        return true;
    }
    if has_active_subscription {
        return true;
    }
    if price_cents == 0 {
        return true;
    }
    false
}

/// User-facing reason for a denied access attempt, re-derived from the
/// branch that failed. Presentation concern, kept out of `can_access`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// Paid guide, caller has no active subscription.
    SubscriptionRequired,
}

pub fn denial_reason(
    roles: &RoleSet,
    has_active_subscription: bool,
    price_cents: i64,
) -> Option<DenialReason> {
    if can_access(roles, has_active_subscription, price_cents) {
        None
    } else {
        Some(DenialReason::SubscriptionRequired)
    }
}

impl DenialReason {
    pub fn message(&self, price_cents: i64) -> String {
        match self {
            DenialReason::SubscriptionRequired => format!(
                "This magazine requires a subscription or a one-time purchase of ${}.{:02}. Subscribe for unlimited access",
                price_cents / 100,
                price_cents % 100
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn roles(names: &[&str]) -> RoleSet {
        RoleSet::from_names(names.iter().copied())
    }

    #[test]
    fn test_staff_bypass_any_price() {
        for role in ["Uploader", "Admin", "SuperAdmin"] {
            assert!(can_access(&roles(&[role]), false, 50_000));
        }
    }

    #[test]
    fn test_subscriber_access_any_price() {
        assert!(can_access(&roles(&["Customer"]), true, 50_000));
    }

    #[test]
    fn test_free_guide_without_subscription() {
        assert!(can_access(&roles(&["Customer"]), false, 0));
        assert!(can_access(&RoleSet::new(), false, 0));
    }

    #[test]
    fn test_paid_guide_without_subscription_denied() {
        assert!(!can_access(&roles(&["Customer"]), false, 500));
        assert_eq!(
            denial_reason(&roles(&["Customer"]), false, 500),
            Some(DenialReason::SubscriptionRequired)
        );
    }

    #[test]
    fn test_customer_role_is_not_staff() {
        let mut set = RoleSet::new();
        set.insert(Role::Customer);
        assert!(!can_access(&set, false, 100));
    }

    #[test]
    fn test_access_after_activation() {
        use crate::models::subscription::{SubscriptionPlan, has_active_subscription};
        use chrono::{TimeZone, Utc};

        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let customer = roles(&["Customer"]);

        // Paid guide, no subscription: denied.
        assert!(!can_access(&customer, has_active_subscription(false, None, now), 500));

        // Activate a monthly subscription, then the same guide is readable.
        let end = SubscriptionPlan::Monthly.end_date_from(now);
        assert!(can_access(
            &customer,
            has_active_subscription(true, Some(end), now),
            500
        ));

        // Expire it (end date set to now): access revoked immediately.
        assert!(!can_access(
            &customer,
            has_active_subscription(false, Some(now), now),
            500
        ));
    }
}
