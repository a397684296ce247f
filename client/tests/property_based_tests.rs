use chrono::{Datelike, NaiveDate};
use client::billing::{add_months, compute_renewal, normalized_monthly_cost};
use client::http::response::extract_api_error;
use client::model::{BillingCycle, IntervalUnit};
use proptest::prelude::*;
use reqwest::StatusCode;

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (1990i32..2100, 1u32..=12, 1u32..=31).prop_map(|(y, m, d)| {
        // clamp to the last valid day of the month
        (0..4)
            .find_map(|back| NaiveDate::from_ymd_opt(y, m, d - back))
            .unwrap()
    })
}

#[cfg(test)]
mod billing_property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_add_months_lands_in_target_month(date in any_date(), months in 0u32..240) {
            let shifted = add_months(date, months).unwrap();

            let total = date.year() * 12 + date.month0() as i32 + months as i32;
            prop_assert_eq!(shifted.year(), total.div_euclid(12));
            prop_assert_eq!(shifted.month0() as i32, total.rem_euclid(12));

            // the day is kept unless the target month is shorter
            prop_assert!(shifted.day() <= date.day());
            if shifted.day() < date.day() {
                prop_assert!(shifted.succ_opt().unwrap().month() != shifted.month());
            }
        }

        #[test]
        fn test_renewal_is_after_start(
            start in any_date(),
            value in 1u32..400,
            days in any::<bool>()
        ) {
            let unit = if days { IntervalUnit::Days } else { IntervalUnit::Months };
            for (cycle, unit, value) in [
                (BillingCycle::Monthly, None, None),
                (BillingCycle::Yearly, None, None),
                (BillingCycle::Custom, Some(unit), Some(value)),
            ] {
                let renewal = compute_renewal(start, cycle, unit, value, None).unwrap();
                prop_assert!(renewal > start);
            }
        }

        #[test]
        fn test_normalized_cost_scales_linearly(
            cost in 0.01f64..10_000.0,
            value in 1u32..365,
            days in any::<bool>()
        ) {
            let unit = Some(if days { IntervalUnit::Days } else { IntervalUnit::Months });
            let single = normalized_monthly_cost(cost, BillingCycle::Custom, unit, Some(value));
            let double = normalized_monthly_cost(cost * 2.0, BillingCycle::Custom, unit, Some(value));

            prop_assert!(single > 0.0);
            prop_assert!((double - 2.0 * single).abs() <= 1e-9 * double.max(1.0));
            prop_assert!(
                normalized_monthly_cost(cost, BillingCycle::Yearly, None, None)
                    < normalized_monthly_cost(cost, BillingCycle::Monthly, None, None)
            );
        }
    }
}

#[cfg(test)]
mod error_extraction_property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_text_bodies_never_lose_status(code in 400u16..600, body in ".{0,64}") {
            let status = StatusCode::from_u16(code).unwrap();
            let error = extract_api_error(status, false, &body);

            prop_assert_eq!(error.status, code);
            prop_assert!(!error.message.is_empty() || body.is_empty());
            if !body.is_empty() {
                prop_assert_eq!(&error.message, &body);
            }
        }

        #[test]
        fn test_detail_field_is_the_message(code in 400u16..600, detail in "[a-zA-Z ]{1,40}") {
            let status = StatusCode::from_u16(code).unwrap();
            let body = serde_json::json!({ "detail": detail }).to_string();
            let error = extract_api_error(status, true, &body);

            prop_assert_eq!(error.message, detail);
            prop_assert!(error.data.is_some());
        }
    }
}
