//! Plain-text rendering of backend records for the terminal.

use chrono::NaiveDate;
use client::ClientError;
use client::dashboard::DashboardSummary;
use client::model::{BillingCycle, Subscription, SubscriptionStats, User};
use std::fmt::Write;

pub fn money(amount: f64, currency: &str) -> String {
    format!("{currency}{amount:.2}")
}

pub fn cycle_label(subscription: &Subscription) -> String {
    match (
        subscription.billing_cycle,
        subscription.custom_interval_unit,
        subscription.custom_interval_value,
    ) {
        (BillingCycle::Custom, Some(unit), Some(value)) => format!("every {value} {unit}"),
        (cycle, _, _) => cycle.label().to_string(),
    }
}

fn status_label(subscription: &Subscription, today: NaiveDate) -> &'static str {
    match (subscription.is_active, subscription.in_trial_on(today)) {
        (true, true) => "trial",
        (true, false) => "active",
        (false, _) => "inactive",
    }
}

pub fn user_line(user: &User) -> String {
    if user.email.is_empty() {
        format!("{} (#{})", user.username, user.id)
    } else {
        format!("{} <{}> (#{})", user.username, user.email, user.id)
    }
}

pub fn subscription_table(
    subscriptions: &[Subscription],
    currency: &str,
    today: NaiveDate,
) -> String {
    if subscriptions.is_empty() {
        return "No subscriptions yet.\n".to_string();
    }

    let name_width = subscriptions
        .iter()
        .map(|s| s.service_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Service".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<name_width$}  {:>10}  {:<16}  {:<14}  {:<10}  Status",
        "ID", "Service", "Cost", "Cycle", "Category", "Renews"
    );
    for s in subscriptions {
        let _ = writeln!(
            out,
            "{:>5}  {:<name_width$}  {:>10}  {:<16}  {:<14}  {:<10}  {}",
            s.id,
            s.service_name,
            money(s.cost, currency),
            cycle_label(s),
            s.category_key(),
            s.renewal_date,
            status_label(s, today)
        );
    }
    out
}

pub fn subscription_detail(subscription: &Subscription, currency: &str, today: NaiveDate) -> String {
    let s = subscription;
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", s.service_name, s.id);
    let _ = writeln!(out, "  Cost:        {} {}", money(s.cost, currency), cycle_label(s));
    let _ = writeln!(
        out,
        "  Per month:   {}",
        money(s.normalized_monthly_cost(), currency)
    );
    let _ = writeln!(out, "  Category:    {}", s.category_key());
    let _ = writeln!(out, "  Started:     {}", s.start_date);
    let _ = writeln!(out, "  Renews:      {}", s.renewal_date);
    if let Some(trial_end) = s.trial_end_date.filter(|_| s.has_free_trial) {
        let _ = writeln!(out, "  Trial until: {trial_end}");
    }
    let _ = writeln!(out, "  Status:      {}", status_label(s, today));
    if !s.notes.is_empty() {
        let _ = writeln!(out, "  Notes:       {}", s.notes);
    }
    out
}

pub fn stats_report(stats: &SubscriptionStats, currency: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Subscriptions:        {}", stats.total_subscriptions);
    let _ = writeln!(
        out,
        "  monthly / yearly / custom: {} / {} / {}",
        stats.monthly_subscriptions, stats.yearly_subscriptions, stats.custom_subscriptions
    );
    let _ = writeln!(
        out,
        "Monthly plans:        {}",
        money(stats.raw_monthly_total, currency)
    );
    let _ = writeln!(
        out,
        "Yearly plans:         {}",
        money(stats.raw_yearly_total, currency)
    );
    let _ = writeln!(
        out,
        "Total per month:      {}",
        money(stats.normalized_monthly_total, currency)
    );
    out
}

pub fn summary_report(summary: &DashboardSummary, currency: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Active: {}   Inactive: {}",
        summary.active, summary.inactive
    );
    let _ = writeln!(
        out,
        "Total per month: {}",
        money(summary.normalized_monthly_total, currency)
    );
    match summary.next_renewal() {
        Some(next) => {
            let _ = writeln!(
                out,
                "Next renewal: {} ({})",
                next.renewal_date, next.service_name
            );
        }
        None => {
            let _ = writeln!(out, "Next renewal: none");
        }
    }

    if !summary.billing_cycles.is_empty() {
        let _ = writeln!(out, "\nBilling cycles");
        for bucket in &summary.billing_cycles {
            let _ = writeln!(out, "  {:<14} {}", bucket.cycle.label(), bucket.count);
        }
    }

    if !summary.categories.is_empty() {
        let _ = writeln!(out, "\nCategories");
        for bucket in &summary.categories {
            let _ = writeln!(out, "  {:<14} {}", bucket.label, bucket.count);
        }
    }

    if !summary.most_expensive.is_empty() {
        let _ = writeln!(out, "\nMost expensive");
        for (rank, entry) in summary.most_expensive.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} - {}/month ({} {})",
                rank + 1,
                entry.service_name,
                money(entry.monthly_cost, currency),
                money(entry.cost, currency),
                entry.billing_cycle
            );
        }
    }

    if !summary.upcoming_renewals.is_empty() {
        let _ = writeln!(out, "\nUpcoming renewals");
        for entry in &summary.upcoming_renewals {
            let _ = writeln!(
                out,
                "  {}  {:<20} {}",
                entry.renewal_date,
                entry.service_name,
                money(entry.cost, currency)
            );
        }
    }
    out
}

/// Per-field messages carried by an error, for inline display.
pub fn field_messages(error: &ClientError) -> Vec<String> {
    match error {
        ClientError::Validation(errors) => errors
            .errors()
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect(),
        ClientError::Api(api) => api
            .field_errors()
            .into_iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use client::model::{Category, IntervalUnit};
    use client::validation::Validator;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn gym() -> Subscription {
        let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Subscription {
            id: 4,
            service_name: "Gym".to_string(),
            cost: 40.0,
            billing_cycle: BillingCycle::Custom,
            custom_interval_unit: Some(IntervalUnit::Days),
            custom_interval_value: Some(28),
            start_date: date(2025, 1, 1),
            renewal_date: date(2025, 1, 29),
            is_active: true,
            category: Category::Fitness,
            custom_category: String::new(),
            has_free_trial: true,
            trial_end_date: Some(date(2025, 1, 14)),
            in_trial_now: false,
            notes: String::new(),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn test_custom_cycle_label() {
        assert_eq!(cycle_label(&gym()), "every 28 days");
    }

    #[test]
    fn test_table_marks_trials() {
        let table = subscription_table(&[gym()], "$", date(2025, 1, 10));
        let row = table.lines().nth(1).unwrap();
        assert!(row.contains("$40.00"));
        assert!(row.ends_with("trial"));

        let later = subscription_table(&[gym()], "$", date(2025, 2, 1));
        assert!(later.lines().nth(1).unwrap().ends_with("active"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(
            subscription_table(&[], "$", date(2025, 1, 1)),
            "No subscriptions yet.\n"
        );
    }

    #[test]
    fn test_detail_shows_monthly_equivalent() {
        let detail = subscription_detail(&gym(), "€", date(2025, 2, 1));
        assert!(detail.contains("Per month:   €43.49"));
        assert!(detail.contains("Trial until: 2025-01-14"));
    }

    #[test]
    fn test_summary_lists_upcoming_renewals() {
        let mut netflix = gym();
        netflix.id = 5;
        netflix.service_name = "Netflix".to_string();
        netflix.cost = 15.49;
        netflix.renewal_date = date(2025, 1, 20);

        let summary = DashboardSummary::from_subscriptions(&[gym(), netflix], 3);
        let report = summary_report(&summary, "$");
        assert!(report.contains("Next renewal: 2025-01-20 (Netflix)"));
        let section: Vec<&str> = report
            .split("Upcoming renewals\n")
            .nth(1)
            .unwrap()
            .lines()
            .collect();
        assert!(section[0].starts_with("  2025-01-20  Netflix"));
        assert!(section[0].ends_with("$15.49"));
        assert!(section[1].starts_with("  2025-01-29  Gym"));
    }

    #[test]
    fn test_summary_without_active_subscriptions() {
        let report = summary_report(&DashboardSummary::from_subscriptions(&[], 3), "$");
        assert!(report.contains("Next renewal: none"));
        assert!(!report.contains("Upcoming renewals"));
    }

    #[test]
    fn test_validation_field_messages() {
        let error = client::validation::PasswordValidator
            .validate("abc")
            .map_err(ClientError::from)
            .unwrap_err();
        let lines = field_messages(&error);
        assert_eq!(lines[0], "password: Must be at least 8 characters long.");
    }
}
