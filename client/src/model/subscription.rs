use super::decimal;
use crate::billing;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a subscription is billed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Yearly,
    /// Every `custom_interval_value` days or months
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnit {
    Days,
    Months,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Streaming,
    Productivity,
    Gaming,
    Cloud,
    Education,
    Fitness,
    Finance,
    /// Named by the subscription's `custom_category`
    Custom,
}

impl BillingCycle {
    pub const ALL: [BillingCycle; 3] = [
        BillingCycle::Monthly,
        BillingCycle::Yearly,
        BillingCycle::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
            BillingCycle::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "Monthly",
            BillingCycle::Yearly => "Yearly",
            BillingCycle::Custom => "Custom",
        }
    }
}

impl IntervalUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalUnit::Days => "days",
            IntervalUnit::Months => "months",
        }
    }
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Streaming => "streaming",
            Category::Productivity => "productivity",
            Category::Gaming => "gaming",
            Category::Cloud => "cloud",
            Category::Education => "education",
            Category::Fitness => "fitness",
            Category::Finance => "finance",
            Category::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Streaming => "Streaming",
            Category::Productivity => "Productivity",
            Category::Gaming => "Gaming",
            Category::Cloud => "Cloud / Dev",
            Category::Education => "Education",
            Category::Fitness => "Fitness/Health",
            Category::Finance => "Finance",
            Category::Custom => "Custom",
        }
    }
}

macro_rules! impl_display_from_str {
    ($ty:ty, $what:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|candidate| candidate.as_str() == wanted)
                    .ok_or_else(|| format!("unknown {} '{}'", $what, s))
            }
        }
    };
}

impl_display_from_str!(
    BillingCycle,
    "billing cycle",
    [BillingCycle::Monthly, BillingCycle::Yearly, BillingCycle::Custom]
);
impl_display_from_str!(
    IntervalUnit,
    "interval unit",
    [IntervalUnit::Days, IntervalUnit::Months]
);
impl_display_from_str!(
    Category,
    "category",
    [
        Category::Streaming,
        Category::Productivity,
        Category::Gaming,
        Category::Cloud,
        Category::Education,
        Category::Fitness,
        Category::Finance,
        Category::Custom,
    ]
);

/// A subscription record as returned by the backend.
///
/// `renewal_date` and `in_trial_now` are computed server side and are
/// read-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub id: u64,
    pub service_name: String,
    #[serde(with = "decimal")]
    pub cost: f64,
    pub billing_cycle: BillingCycle,
    #[serde(default)]
    pub custom_interval_unit: Option<IntervalUnit>,
    #[serde(default)]
    pub custom_interval_value: Option<u32>,
    pub start_date: NaiveDate,
    pub renewal_date: NaiveDate,
    pub is_active: bool,
    pub category: Category,
    #[serde(default)]
    pub custom_category: String,
    #[serde(default)]
    pub has_free_trial: bool,
    #[serde(default)]
    pub trial_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub in_trial_now: bool,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Cost expressed per month, used for ranking and totals.
    pub fn normalized_monthly_cost(&self) -> f64 {
        billing::normalized_monthly_cost(
            self.cost,
            self.billing_cycle,
            self.custom_interval_unit,
            self.custom_interval_value,
        )
    }

    /// The category name shown to users: the custom name for custom
    /// categories, the category key otherwise.
    pub fn category_key(&self) -> &str {
        if self.category == Category::Custom && !self.custom_category.is_empty() {
            &self.custom_category
        } else {
            self.category.as_str()
        }
    }

    pub fn in_trial_on(&self, today: NaiveDate) -> bool {
        billing::in_trial(self.has_free_trial, self.trial_end_date, today)
    }
}

/// Partial subscription record used for create (POST) and update (PATCH).
///
/// `None` fields are omitted from the request body. The nullable fields use
/// `Option<Option<_>>` so an update can explicitly send `null`, for example
/// to drop the custom interval when switching back to a monthly cycle.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SubscriptionDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "decimal::serialize_option"
    )]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_cycle: Option<BillingCycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_interval_unit: Option<Option<IntervalUnit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_interval_value: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_free_trial: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_end_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SubscriptionDraft {
    /// Draft carrying the fields the backend requires on create.
    pub fn new(service_name: impl Into<String>, cost: f64, start_date: NaiveDate) -> Self {
        Self {
            service_name: Some(service_name.into()),
            cost: Some(cost),
            start_date: Some(start_date),
            ..Self::default()
        }
    }

    pub fn billing_cycle(mut self, cycle: BillingCycle) -> Self {
        self.billing_cycle = Some(cycle);
        if cycle != BillingCycle::Custom {
            self.custom_interval_unit = Some(None);
            self.custom_interval_value = Some(None);
        }
        self
    }

    pub fn custom_interval(mut self, unit: IntervalUnit, value: u32) -> Self {
        self.billing_cycle = Some(BillingCycle::Custom);
        self.custom_interval_unit = Some(Some(unit));
        self.custom_interval_value = Some(Some(value));
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        if category != Category::Custom {
            self.custom_category = Some(String::new());
        }
        self
    }

    pub fn custom_category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(Category::Custom);
        self.custom_category = Some(name.into());
        self
    }

    pub fn free_trial_until(mut self, trial_end: NaiveDate) -> Self {
        self.has_free_trial = Some(true);
        self.trial_end_date = Some(Some(trial_end));
        self
    }

    pub fn without_free_trial(mut self) -> Self {
        self.has_free_trial = Some(false);
        self.trial_end_date = Some(None);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Aggregate spending statistics computed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionStats {
    pub total_subscriptions: u32,
    pub monthly_subscriptions: u32,
    pub yearly_subscriptions: u32,
    pub custom_subscriptions: u32,
    #[serde(with = "decimal")]
    pub raw_monthly_total: f64,
    #[serde(with = "decimal")]
    pub raw_yearly_total: f64,
    #[serde(with = "decimal")]
    pub normalized_monthly_total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> serde_json::Value {
        json!({
            "id": 7,
            "service_name": "Netflix",
            "cost": "15.49",
            "billing_cycle": "monthly",
            "custom_interval_unit": null,
            "custom_interval_value": null,
            "start_date": "2025-01-31",
            "renewal_date": "2025-02-28",
            "is_active": true,
            "category": "streaming",
            "custom_category": "",
            "has_free_trial": false,
            "trial_end_date": null,
            "in_trial_now": false,
            "notes": "",
            "created_at": "2025-01-31T10:15:00.123456Z",
            "updated_at": "2025-01-31T10:15:00.123456+03:00"
        })
    }

    #[test]
    fn test_subscription_parses_backend_payload() {
        let subscription: Subscription = serde_json::from_value(sample_payload()).unwrap();

        assert_eq!(subscription.id, 7);
        assert_eq!(subscription.cost, 15.49);
        assert_eq!(subscription.billing_cycle, BillingCycle::Monthly);
        assert_eq!(subscription.custom_interval_unit, None);
        assert_eq!(
            subscription.renewal_date,
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert_eq!(subscription.category_key(), "streaming");
    }

    #[test]
    fn test_subscription_accepts_numeric_cost() {
        let mut payload = sample_payload();
        payload["cost"] = json!(120);
        payload["billing_cycle"] = json!("yearly");

        let subscription: Subscription = serde_json::from_value(payload).unwrap();
        assert_eq!(subscription.cost, 120.0);
        assert_eq!(subscription.normalized_monthly_cost(), 10.0);
    }

    #[test]
    fn test_unknown_billing_cycle_is_rejected() {
        let mut payload = sample_payload();
        payload["billing_cycle"] = json!("weekly");
        assert!(serde_json::from_value::<Subscription>(payload).is_err());
    }

    #[test]
    fn test_custom_category_key_uses_name() {
        let mut payload = sample_payload();
        payload["category"] = json!("custom");
        payload["custom_category"] = json!("music");

        let subscription: Subscription = serde_json::from_value(payload).unwrap();
        assert_eq!(subscription.category_key(), "music");
    }

    #[test]
    fn test_draft_serializes_only_set_fields() {
        let draft = SubscriptionDraft::new(
            "Spotify",
            9.99,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        );

        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            body,
            json!({
                "service_name": "Spotify",
                "cost": "9.99",
                "start_date": "2025-03-01"
            })
        );
    }

    #[test]
    fn test_draft_switching_to_monthly_nulls_custom_interval() {
        let draft = SubscriptionDraft::default().billing_cycle(BillingCycle::Monthly);
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            body,
            json!({
                "billing_cycle": "monthly",
                "custom_interval_unit": null,
                "custom_interval_value": null
            })
        );
    }

    #[test]
    fn test_draft_custom_interval_sets_cycle() {
        let draft = SubscriptionDraft::default().custom_interval(IntervalUnit::Days, 14);
        assert_eq!(draft.billing_cycle, Some(BillingCycle::Custom));
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["custom_interval_unit"], json!("days"));
        assert_eq!(body["custom_interval_value"], json!(14));
    }

    #[test]
    fn test_stats_parse_decimal_strings() {
        let stats: SubscriptionStats = serde_json::from_value(json!({
            "total_subscriptions": 3,
            "monthly_subscriptions": 2,
            "yearly_subscriptions": 1,
            "custom_subscriptions": 0,
            "raw_monthly_total": "25.48",
            "raw_yearly_total": "120.00",
            "normalized_monthly_total": "35.48"
        }))
        .unwrap();

        assert_eq!(stats.total_subscriptions, 3);
        assert_eq!(stats.normalized_monthly_total, 35.48);
    }

    #[test]
    fn test_enum_from_str_is_case_insensitive() {
        assert_eq!("Yearly".parse::<BillingCycle>(), Ok(BillingCycle::Yearly));
        assert_eq!("MONTHS".parse::<IntervalUnit>(), Ok(IntervalUnit::Months));
        assert_eq!("cloud".parse::<Category>(), Ok(Category::Cloud));
        assert!("weekly".parse::<BillingCycle>().is_err());
    }
}
