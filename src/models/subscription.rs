use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum SubscriptionPlan {
    Monthly,
    Yearly,
    Lifetime,
}

impl SubscriptionPlan {
    /// Unknown plan names fall back to Monthly.
    pub fn parse(name: &str) -> Self {
        match name {
            "Yearly" => SubscriptionPlan::Yearly,
            "Lifetime" => SubscriptionPlan::Lifetime,
            _ => SubscriptionPlan::Monthly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Monthly => "Monthly",
            SubscriptionPlan::Yearly => "Yearly",
            SubscriptionPlan::Lifetime => "Lifetime",
        }
    }

    /// End of the subscription window opened at `now`. Lifetime maps to
    /// +100 years so the end date is always set and comparable.
    pub fn end_date_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let months = match self {
            SubscriptionPlan::Monthly => 1,
            SubscriptionPlan::Yearly => 12,
            SubscriptionPlan::Lifetime => 1200,
        };
        now.checked_add_months(Months::new(months))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl std::fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The subscription flag and the end date can drift apart (expiry is not
/// actively swept), so active status is always derived, never stored.
/// Strict `>`: a subscription expired at `now` is already inactive.
pub fn has_active_subscription(
    is_subscribed: bool,
    end_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    is_subscribed && end_date.is_some_and(|end| end > now)
}

/// Whole days left on an active subscription, 0 otherwise.
pub fn days_until_expiry(
    is_subscribed: bool,
    end_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i64 {
    if !has_active_subscription(is_subscribed, end_date, now) {
        return 0;
    }
    match end_date {
        Some(end) => (end - now).num_days(),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_defaults_to_monthly() {
        assert_eq!(SubscriptionPlan::parse("Monthly"), SubscriptionPlan::Monthly);
        assert_eq!(SubscriptionPlan::parse("Yearly"), SubscriptionPlan::Yearly);
        assert_eq!(SubscriptionPlan::parse("Lifetime"), SubscriptionPlan::Lifetime);
        assert_eq!(SubscriptionPlan::parse("Weekly"), SubscriptionPlan::Monthly);
        assert_eq!(SubscriptionPlan::parse(""), SubscriptionPlan::Monthly);
    }

    #[test]
    fn test_end_date_from_plan() {
        let now = now();
        assert_eq!(
            SubscriptionPlan::Monthly.end_date_from(now),
            Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
        );
        assert_eq!(
            SubscriptionPlan::Yearly.end_date_from(now),
            Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
        );
        assert_eq!(
            SubscriptionPlan::Lifetime.end_date_from(now),
            Utc.with_ymd_and_hms(2124, 6, 15, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_has_active_subscription_strict_comparison() {
        let now = now();
        // End date equal to now means already inactive.
        assert!(!has_active_subscription(true, Some(now), now));
        assert!(has_active_subscription(
            true,
            Some(now + chrono::Duration::seconds(1)),
            now
        ));
        assert!(!has_active_subscription(false, Some(now + chrono::Duration::days(30)), now));
        assert!(!has_active_subscription(true, None, now));
    }

    #[test]
    fn test_days_until_expiry() {
        let now = now();
        let end = now + chrono::Duration::days(30) + chrono::Duration::hours(5);
        assert_eq!(days_until_expiry(true, Some(end), now), 30);
        assert_eq!(days_until_expiry(true, Some(now), now), 0);
        assert_eq!(days_until_expiry(false, Some(end), now), 0);
        assert_eq!(days_until_expiry(true, None, now), 0);
    }
}
