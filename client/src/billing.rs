//! Billing-cycle math shared by the dashboard and the CLI.
//!
//! The backend is authoritative for `renewal_date`; [`compute_renewal`] only
//! previews it for a draft before it is saved.

use crate::model::{BillingCycle, IntervalUnit};
use chrono::{Days, Months, NaiveDate};

/// Average month length used to convert day-based intervals to monthly cost.
pub const AVERAGE_DAYS_PER_MONTH: f64 = 30.44;

/// Normalizes a cost to its per-month equivalent.
///
/// Custom cycles with a missing or zero interval value count as one unit, and
/// a missing unit counts as months.
pub fn normalized_monthly_cost(
    cost: f64,
    cycle: BillingCycle,
    unit: Option<IntervalUnit>,
    value: Option<u32>,
) -> f64 {
    match cycle {
        BillingCycle::Monthly => cost,
        BillingCycle::Yearly => cost / 12.0,
        BillingCycle::Custom => {
            let value = f64::from(value.filter(|v| *v > 0).unwrap_or(1));
            match unit.unwrap_or(IntervalUnit::Months) {
                IntervalUnit::Months => cost / value,
                IntervalUnit::Days => cost / value * AVERAGE_DAYS_PER_MONTH,
            }
        }
    }
}

/// Adds calendar months, clamping the day to the length of the target month
/// (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Previews the first renewal date the backend will assign.
///
/// A subscription on a free trial renews the day after the trial ends; pass
/// `trial_end` only when the draft has a free trial. Otherwise the start date
/// is advanced by one billing cycle. Returns `None` for an incomplete custom
/// cycle or a date overflow.
pub fn compute_renewal(
    start: NaiveDate,
    cycle: BillingCycle,
    unit: Option<IntervalUnit>,
    value: Option<u32>,
    trial_end: Option<NaiveDate>,
) -> Option<NaiveDate> {
    if let Some(trial_end) = trial_end {
        return trial_end.succ_opt();
    }

    match cycle {
        BillingCycle::Monthly => add_months(start, 1),
        BillingCycle::Yearly => add_months(start, 12),
        BillingCycle::Custom => match (unit?, value?) {
            (IntervalUnit::Months, value) => add_months(start, value),
            (IntervalUnit::Days, value) => start.checked_add_days(Days::new(u64::from(value))),
        },
    }
}

/// Whether a subscription is still inside its free trial on `today`.
///
/// The trial end date is the last free day.
pub fn in_trial(has_free_trial: bool, trial_end: Option<NaiveDate>, today: NaiveDate) -> bool {
    if !has_free_trial && trial_end.is_none() {
        return false;
    }
    trial_end.is_some_and(|end| today <= end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalization_per_cycle() {
        assert_eq!(
            normalized_monthly_cost(10.0, BillingCycle::Monthly, None, None),
            10.0
        );
        assert_eq!(
            normalized_monthly_cost(120.0, BillingCycle::Yearly, None, None),
            10.0
        );
        assert_eq!(
            normalized_monthly_cost(
                30.0,
                BillingCycle::Custom,
                Some(IntervalUnit::Months),
                Some(3)
            ),
            10.0
        );
        let days = normalized_monthly_cost(
            14.0,
            BillingCycle::Custom,
            Some(IntervalUnit::Days),
            Some(14),
        );
        assert!((days - 30.44).abs() < 1e-9);
    }

    #[test]
    fn test_custom_cycle_defaults() {
        // missing value counts as 1, missing unit as months
        assert_eq!(
            normalized_monthly_cost(9.0, BillingCycle::Custom, None, None),
            9.0
        );
        assert_eq!(
            normalized_monthly_cost(9.0, BillingCycle::Custom, Some(IntervalUnit::Months), Some(0)),
            9.0
        );
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(date(2025, 1, 31), 1), Some(date(2025, 2, 28)));
        assert_eq!(add_months(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
        assert_eq!(add_months(date(2025, 11, 15), 3), Some(date(2026, 2, 15)));
        assert_eq!(add_months(date(2024, 2, 29), 12), Some(date(2025, 2, 28)));
    }

    #[test]
    fn test_compute_renewal() {
        let start = date(2025, 3, 10);
        assert_eq!(
            compute_renewal(start, BillingCycle::Monthly, None, None, None),
            Some(date(2025, 4, 10))
        );
        assert_eq!(
            compute_renewal(start, BillingCycle::Yearly, None, None, None),
            Some(date(2026, 3, 10))
        );
        assert_eq!(
            compute_renewal(
                start,
                BillingCycle::Custom,
                Some(IntervalUnit::Days),
                Some(14),
                None
            ),
            Some(date(2025, 3, 24))
        );
        assert_eq!(
            compute_renewal(start, BillingCycle::Custom, None, Some(2), None),
            None
        );
    }

    #[test]
    fn test_trial_renews_day_after_trial_end() {
        assert_eq!(
            compute_renewal(
                date(2025, 3, 1),
                BillingCycle::Yearly,
                None,
                None,
                Some(date(2025, 3, 31))
            ),
            Some(date(2025, 4, 1))
        );
    }

    #[test]
    fn test_in_trial() {
        let end = Some(date(2025, 3, 31));
        assert!(in_trial(true, end, date(2025, 3, 31)));
        assert!(!in_trial(true, end, date(2025, 4, 1)));
        assert!(!in_trial(false, None, date(2025, 3, 1)));
        assert!(!in_trial(true, None, date(2025, 3, 1)));
    }
}
