//! Aggregations behind the dashboard view.

use crate::model::{BillingCycle, Subscription};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct CycleBucket {
    pub cycle: BillingCycle,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedSubscription {
    pub id: u64,
    pub service_name: String,
    pub cost: f64,
    pub billing_cycle: BillingCycle,
    pub monthly_cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingRenewal {
    pub id: u64,
    pub service_name: String,
    pub renewal_date: NaiveDate,
    pub cost: f64,
}

/// Summary of a user's subscriptions.
///
/// Only active subscriptions feed the breakdowns, the ranking and the
/// monthly total; inactive ones are just counted.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub active: usize,
    pub inactive: usize,
    /// Active subscriptions per billing cycle; empty cycles are omitted
    pub billing_cycles: Vec<CycleBucket>,
    /// Active subscriptions per category, largest first
    pub categories: Vec<CategoryBucket>,
    /// Most expensive active subscriptions by normalized monthly cost
    pub most_expensive: Vec<RankedSubscription>,
    /// Active subscriptions renewing soonest, earliest first
    pub upcoming_renewals: Vec<UpcomingRenewal>,
    pub normalized_monthly_total: f64,
}

impl DashboardSummary {
    pub const DEFAULT_TOP: usize = 3;

    pub fn from_subscriptions(subscriptions: &[Subscription], top: usize) -> Self {
        let (active, inactive): (Vec<&Subscription>, Vec<&Subscription>) =
            subscriptions.iter().partition(|s| s.is_active);

        let billing_cycles = BillingCycle::ALL
            .into_iter()
            .map(|cycle| CycleBucket {
                cycle,
                count: active.iter().filter(|s| s.billing_cycle == cycle).count(),
            })
            .filter(|bucket| bucket.count > 0)
            .collect();

        let mut ranked: Vec<RankedSubscription> = active
            .iter()
            .map(|s| RankedSubscription {
                id: s.id,
                service_name: s.service_name.clone(),
                cost: s.cost,
                billing_cycle: s.billing_cycle,
                monthly_cost: s.normalized_monthly_cost(),
            })
            .collect();
        let normalized_monthly_total = ranked.iter().map(|r| r.monthly_cost).sum();
        ranked.sort_by(|a, b| b.monthly_cost.total_cmp(&a.monthly_cost));
        ranked.truncate(top);

        Self {
            upcoming_renewals: upcoming_renewals(&active, top),
            active: active.len(),
            inactive: inactive.len(),
            billing_cycles,
            categories: category_counts(&active),
            most_expensive: ranked,
            normalized_monthly_total,
        }
    }

    pub fn next_renewal(&self) -> Option<&UpcomingRenewal> {
        self.upcoming_renewals.first()
    }
}

fn upcoming_renewals(active: &[&Subscription], top: usize) -> Vec<UpcomingRenewal> {
    let mut upcoming: Vec<UpcomingRenewal> = active
        .iter()
        .map(|s| UpcomingRenewal {
            id: s.id,
            service_name: s.service_name.clone(),
            renewal_date: s.renewal_date,
            cost: s.cost,
        })
        .collect();
    upcoming.sort_by_key(|r| r.renewal_date);
    upcoming.truncate(top);
    upcoming
}

fn category_counts(active: &[&Subscription]) -> Vec<CategoryBucket> {
    // first-seen order is kept for equal counts
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for subscription in active {
        let key = subscription.category_key();
        match counts.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(key, count)| CategoryBucket {
            label: capitalize(key),
            count,
        })
        .collect()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
