//! Client-side validation for subscription drafts.
//!
//! The rules mirror the backend serializer so forms can report problems
//! before a round trip. The backend still validates everything; these checks
//! only save a request. Unlike the backend, which stops at the first failing
//! rule group, every violated rule is reported at once.
//!
//! [`PasswordValidator`] holds the registration password policy, which the
//! backend leaves to the client.

use crate::model::{BillingCycle, Category, IntervalUnit, Subscription, SubscriptionDraft};
use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Core validation trait.
///
/// # Examples
///
/// ```
/// use client::validation::Validator;
///
/// struct NonEmpty;
/// impl Validator<str> for NonEmpty {
///     type Error = String;
///
///     fn validate(&self, input: &str) -> Result<(), Self::Error> {
///         if input.trim().is_empty() {
///             Err("Input cannot be empty".to_string())
///         } else {
///             Ok(())
///         }
///     }
/// }
/// ```
pub trait Validator<T: ?Sized> {
    type Error;

    fn validate(&self, input: &T) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All rule violations found in a draft, keyed by field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "Validation failed: {}", rendered.join("; "))
    }
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// Validates a [`SubscriptionDraft`], optionally as a PATCH on top of an
/// existing record.
///
/// Fields absent from the draft fall back to the existing record, or to the
/// backend defaults on create (monthly cycle, streaming category, no trial).
#[derive(Debug, Default, Clone, Copy)]
pub struct DraftValidator<'a> {
    existing: Option<&'a Subscription>,
}

impl<'a> DraftValidator<'a> {
    pub fn for_create() -> Self {
        Self { existing: None }
    }

    pub fn for_update(existing: &'a Subscription) -> Self {
        Self {
            existing: Some(existing),
        }
    }
}

// The draft merged with the record it would update.
struct Resolved<'d> {
    service_name: Option<&'d str>,
    cost: Option<f64>,
    cycle: BillingCycle,
    unit: Option<IntervalUnit>,
    value: Option<u32>,
    start: Option<NaiveDate>,
    category: Category,
    custom_category: &'d str,
    has_trial: bool,
    trial_end: Option<NaiveDate>,
}

impl<'d> Resolved<'d> {
    fn new(draft: &'d SubscriptionDraft, existing: Option<&'d Subscription>) -> Self {
        Self {
            service_name: draft
                .service_name
                .as_deref()
                .or(existing.map(|s| s.service_name.as_str())),
            cost: draft.cost.or(existing.map(|s| s.cost)),
            cycle: draft
                .billing_cycle
                .or(existing.map(|s| s.billing_cycle))
                .unwrap_or_default(),
            unit: draft
                .custom_interval_unit
                .unwrap_or_else(|| existing.and_then(|s| s.custom_interval_unit)),
            value: draft
                .custom_interval_value
                .unwrap_or_else(|| existing.and_then(|s| s.custom_interval_value)),
            start: draft.start_date.or(existing.map(|s| s.start_date)),
            category: draft
                .category
                .or(existing.map(|s| s.category))
                .unwrap_or_default(),
            custom_category: draft
                .custom_category
                .as_deref()
                .or(existing.map(|s| s.custom_category.as_str()))
                .unwrap_or(""),
            has_trial: draft
                .has_free_trial
                .or(existing.map(|s| s.has_free_trial))
                .unwrap_or(false),
            trial_end: draft
                .trial_end_date
                .unwrap_or_else(|| existing.and_then(|s| s.trial_end_date)),
        }
    }
}

impl Validator<SubscriptionDraft> for DraftValidator<'_> {
    type Error = ValidationErrors;

    fn validate(&self, draft: &SubscriptionDraft) -> Result<(), Self::Error> {
        let r = Resolved::new(draft, self.existing);
        let mut errors = Vec::new();
        let mut push = |field: &'static str, message: &str| {
            errors.push(FieldError {
                field,
                message: message.to_string(),
            })
        };

        if r.service_name.is_none_or(|name| name.trim().is_empty()) {
            push("service_name", "Service name is required.");
        }

        match r.cost {
            None => push("cost", "Cost is required."),
            Some(cost) if !cost.is_finite() || cost <= 0.0 => {
                push("cost", "Cost must be positive.")
            }
            Some(_) => {}
        }

        if r.start.is_none() {
            push("start_date", "Start date is required.");
        }

        match (r.has_trial, r.trial_end) {
            (true, None) => push("trial_end_date", "Required when has_free_trial is true."),
            (false, Some(_)) => push(
                "trial_end_date",
                "Must be empty when has_free_trial is false.",
            ),
            _ => {}
        }
        if let (Some(trial_end), Some(start)) = (r.trial_end, r.start) {
            if trial_end < start {
                push("trial_end_date", "Cannot be before start_date.");
            }
        }

        if r.cycle == BillingCycle::Custom {
            if r.unit.is_none() || r.value.is_none() {
                push(
                    "custom_interval_unit",
                    "Required when billing_cycle is 'custom'.",
                );
                push(
                    "custom_interval_value",
                    "Required when billing_cycle is 'custom'.",
                );
            } else if r.value == Some(0) {
                push("custom_interval_value", "Must be a positive integer.");
            }
        } else if r.unit.is_some() || r.value.is_some() {
            push(
                "custom_interval_unit",
                "Use only when billing_cycle is 'custom'.",
            );
            push(
                "custom_interval_value",
                "Use only when billing_cycle is 'custom'.",
            );
        }

        if r.category == Category::Custom {
            if r.custom_category.trim().is_empty() {
                push(
                    "custom_category",
                    "Provide a name when category is 'custom'.",
                );
            }
        } else if !r.custom_category.is_empty() {
            push("custom_category", "Use only when category is 'custom'.");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }
}

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Password rules enforced before registration: at least
/// [`MIN_PASSWORD_LENGTH`] characters with at least one letter and one digit.
#[derive(Debug, Default, Clone, Copy)]
pub struct PasswordValidator;

impl Validator<str> for PasswordValidator {
    type Error = ValidationErrors;

    fn validate(&self, password: &str) -> Result<(), Self::Error> {
        let mut errors = Vec::new();
        let mut push = |message: String| {
            errors.push(FieldError {
                field: "password",
                message,
            })
        };

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            push(format!(
                "Must be at least {MIN_PASSWORD_LENGTH} characters long."
            ));
        }
        if !password.chars().any(|c| c.is_ascii_alphabetic()) {
            push("Must contain a letter.".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            push("Must contain a number.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }
}
