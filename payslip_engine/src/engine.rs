//! Salary slip computation engine.
//!
//! The `engine` module combines the leaf derivations in [`crate::calc`]
//! into the figures shown on a slip: total earnings, total deductions
//! and net pay.  Recomputation is explicit and dependency ordered:
//! line aggregates and overtime first, then the earnings and deduction
//! totals, then net pay.  Nothing is cached between calls, so running
//! it twice on the same draft always yields the same figures.
//!
//! [`preview_batch`] uses [`rayon`] to compute many drafts in parallel,
//! for example when previewing a whole payroll run.

use crate::calc::{overtime_amount, sum_amounts};
use crate::draft::SalarySlipDraft;
use crate::models::SlipTotals;
use crate::policy::PayrollPolicy;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Net pay is earnings minus deductions.  It is not floored at zero.
pub fn net_pay(total_earnings: f64, total_deductions: f64) -> f64 {
    total_earnings - total_deductions
}

/// Derives every total for a draft from its current state.
pub fn compute_totals(draft: &SalarySlipDraft, policy: &PayrollPolicy) -> SlipTotals {
    let total_allowances = sum_amounts(&draft.allowances);
    let overtime_amount = draft
        .overtime
        .map(|ot| overtime_amount(draft.basic_salary, &ot, policy))
        .unwrap_or(0.0);
    let total_earnings = draft.basic_salary + total_allowances + overtime_amount;

    let total_other_deductions = sum_amounts(&draft.deductions);
    let total_deductions = draft.effective_gosi(policy) + total_other_deductions;

    SlipTotals {
        total_allowances,
        overtime_amount,
        total_earnings,
        total_other_deductions,
        total_deductions,
        net_pay: net_pay(total_earnings, total_deductions),
    }
}

/// Totals for a set of drafts, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPreview {
    pub slips: Vec<SlipTotals>,
    pub total_net_pay: f64,
    /// Indices into `slips` whose net pay is below zero.  Reported,
    /// never rejected.
    pub negative_net_pay: Vec<usize>,
}

/// Computes totals for many drafts in parallel.
pub fn preview_batch(drafts: &[SalarySlipDraft], policy: &PayrollPolicy) -> BatchPreview {
    let slips: Vec<SlipTotals> = drafts.par_iter().map(|draft| compute_totals(draft, policy)).collect();

    let negative_net_pay: Vec<usize> = slips
        .iter()
        .enumerate()
        .filter(|(_, totals)| totals.net_pay < 0.0)
        .map(|(idx, _)| idx)
        .collect();
    if !negative_net_pay.is_empty() {
        warn!(count = negative_net_pay.len(), "batch contains slips with negative net pay");
    }

    let total_net_pay: f64 = slips.iter().map(|t| t.net_pay).sum();
    debug!(slips = slips.len(), total_net_pay, "computed batch preview");
    BatchPreview {
        slips,
        total_net_pay,
        negative_net_pay,
    }
}
