//! Leaf derivations: line aggregation, overtime, GOSI and mileage.
//!
//! Every function here is pure and total over non-negative inputs.
//! Callers are expected to have already defaulted invalid entries to
//! zero (see [`sanitize_amount`]); nothing in this module validates.

use crate::mileage::{MileageJourney, MileageTotals};
use crate::models::{LineAmount, OvertimeInput};
use crate::policy::{PayrollPolicy, SocialInsurance};

/// Sum of the `amount` fields.  An empty list sums to zero.
pub fn sum_amounts(lines: &[LineAmount]) -> f64 {
    lines.iter().map(|l| l.amount).sum()
}

/// Overtime pay, rounded to the nearest whole currency unit.
///
/// The hourly rate is the basic salary spread over the policy's
/// standard month (8 h x 22 days by default), regardless of the
/// working days recorded on the pay period.
pub fn overtime_amount(basic_salary: f64, overtime: &OvertimeInput, policy: &PayrollPolicy) -> f64 {
    let hourly_rate = basic_salary / policy.standard_monthly_hours();
    (overtime.hours * hourly_rate * overtime.rate_multiplier).round()
}

/// Statutory social-insurance deduction, rounded to a whole unit.
pub fn gosi_deduction(basic_salary: f64, is_national: bool, scheme: &dyn SocialInsurance) -> f64 {
    scheme.contribution(basic_salary, is_national).round()
}

/// Total distance (round trips doubled) and the reimbursement at the
/// given rate.
pub fn mileage_reimbursement(journeys: &[MileageJourney], rate_per_km: f64) -> MileageTotals {
    let total_distance: f64 = journeys.iter().map(MileageJourney::effective_distance).sum();
    MileageTotals {
        total_distance,
        amount: total_distance * rate_per_km,
    }
}

/// Defaults negative and non-finite input to zero.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
