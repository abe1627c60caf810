//! Data models for the Payslip Engine.
//!
//! The `models` module defines the serialisable value objects that
//! make up a salary slip: line amounts, pay periods, overtime input,
//! payment details and the derived totals.  It also describes the
//! snapshots supplied by external collaborators (the employee record
//! and a previously persisted slip) which are used to pre-populate a
//! draft.  None of these types are persisted by this crate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Overtime multiplier applied when a draft is first opened.
pub const DEFAULT_OVERTIME_MULTIPLIER: f64 = 1.5;

/// Working days assumed for a fresh pay period.
pub const DEFAULT_WORKING_DAYS: u32 = 22;

/// A named amount used for both allowances and deductions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAmount {
    /// Client-side identifier, unique within its list.
    pub id: String,
    /// English name, usually one of the presets.
    pub name: String,
    /// Localised (Arabic) display name.
    #[serde(alias = "nameAr", default)]
    pub name_localized: String,
    /// Non-negative amount in the payroll currency.
    pub amount: f64,
}

impl LineAmount {
    pub fn new(id: impl Into<String>, name: impl Into<String>, name_localized: impl Into<String>, amount: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            name_localized: name_localized.into(),
            amount,
        }
    }
}

/// Hours of overtime and the multiplier they are paid at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeInput {
    pub hours: f64,
    /// Typically 1.25, 1.5 or 2.0.
    #[serde(alias = "rate")]
    pub rate_multiplier: f64,
}

impl Default for OvertimeInput {
    fn default() -> Self {
        Self {
            hours: 0.0,
            rate_multiplier: DEFAULT_OVERTIME_MULTIPLIER,
        }
    }
}

/// The month being paid and the attendance figures for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPeriod {
    /// Calendar month, 1 through 12.
    pub month: u32,
    pub year: i32,
    pub working_days: u32,
    /// Must not exceed `working_days`.
    pub days_worked: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
}

impl PayPeriod {
    pub fn new(month: u32, year: i32) -> Self {
        Self {
            month,
            year,
            working_days: DEFAULT_WORKING_DAYS,
            days_worked: DEFAULT_WORKING_DAYS,
            payment_date: None,
        }
    }
}

/// How the net pay is disbursed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    BankTransfer,
    Cash,
    Check,
}

/// Payment instructions carried on the slip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    #[serde(rename = "paymentMethod", default)]
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
}

/// Bank account stored on the employee's compensation record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub iban: String,
}

/// Standing monthly allowances on the employee's compensation record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingAllowances {
    #[serde(default)]
    pub housing_allowance: Option<f64>,
    #[serde(default)]
    pub transportation_allowance: Option<f64>,
    #[serde(default)]
    pub food_allowance: Option<f64>,
}

/// Read-only snapshot of an employee, as supplied by the employee
/// record source.  Used to pre-populate a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Saudi nationals contribute to GOSI; expatriates do not.
    #[serde(default)]
    pub is_saudi: bool,
    #[serde(default)]
    pub basic_salary: f64,
    #[serde(default)]
    pub allowances: StandingAllowances,
    #[serde(default)]
    pub bank_details: Option<BankDetails>,
}

/// Earnings section of a persisted slip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEarnings {
    pub basic_salary: f64,
    #[serde(default)]
    pub allowances: Vec<PayloadLine>,
    #[serde(default)]
    pub overtime: Option<OvertimeInput>,
}

/// A previously persisted slip, fetched for edit mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSlip {
    pub employee_id: String,
    pub pay_period: PayPeriod,
    pub earnings: PersistedEarnings,
    pub deductions: DeductionBreakdown,
    pub payment: PaymentDetails,
}

/// A line as it appears on the wire: no client id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadLine {
    pub name: String,
    #[serde(rename = "nameAr", default)]
    pub name_localized: String,
    pub amount: f64,
}

impl From<&LineAmount> for PayloadLine {
    fn from(line: &LineAmount) -> Self {
        Self {
            name: line.name.clone(),
            name_localized: line.name_localized.clone(),
            amount: line.amount,
        }
    }
}

/// Deductions grouped into the categories the persistence endpoint
/// stores separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionBreakdown {
    #[serde(default)]
    pub gosi: f64,
    #[serde(default)]
    pub loans: f64,
    #[serde(default)]
    pub advances: f64,
    #[serde(default)]
    pub absences: f64,
    #[serde(default)]
    pub late_deductions: f64,
    #[serde(default)]
    pub violations: f64,
    #[serde(default)]
    pub other_deductions: f64,
}

/// Overtime as the persistence endpoint stores it: `{ hours, rate }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OvertimePayload {
    pub hours: f64,
    /// The multiplier, e.g. 1.5.
    #[serde(alias = "rateMultiplier")]
    pub rate: f64,
}

impl From<OvertimeInput> for OvertimePayload {
    fn from(input: OvertimeInput) -> Self {
        Self {
            hours: input.hours,
            rate: input.rate_multiplier,
        }
    }
}

/// Earnings section of the submission payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsPayload {
    pub basic_salary: f64,
    pub allowances: Vec<PayloadLine>,
    /// Present only when overtime hours were entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overtime: Option<OvertimePayload>,
}

/// The complete body sent to the slip creation/update endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalarySlipPayload {
    pub employee_id: String,
    pub pay_period: PayPeriod,
    pub earnings: EarningsPayload,
    pub deductions: DeductionBreakdown,
    pub payment: PaymentDetails,
}

/// Figures derived from a draft.  Always recomputed, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlipTotals {
    /// Sum of the allowance lines.
    pub total_allowances: f64,
    /// Rounded overtime pay.
    pub overtime_amount: f64,
    /// Basic salary plus allowances plus overtime.
    pub total_earnings: f64,
    /// Sum of the free deduction lines, excluding GOSI.
    pub total_other_deductions: f64,
    /// GOSI plus the other deductions.
    pub total_deductions: f64,
    /// May be negative; not clamped.
    pub net_pay: f64,
}
