//! The salary slip draft: the in-memory slip a user is creating or
//! editing.
//!
//! A draft is created when the payroll form opens.  It is
//! pre-populated from an [`EmployeeRecord`] or, in edit mode, from a
//! [`PersistedSlip`].  User edits then mutate it, and on submission it
//! becomes a [`SalarySlipPayload`].  Derived figures are never stored on
//! the draft; they are recomputed from its current state by
//! [`engine::compute_totals`](crate::engine::compute_totals).

use crate::calc::{gosi_deduction, sanitize_amount};
use crate::engine::compute_totals;
use crate::error::SubmissionError;
use crate::models::{
    DeductionBreakdown, EarningsPayload, EmployeeRecord, LineAmount, OvertimeInput, OvertimePayload, PayPeriod,
    PaymentDetails, PayloadLine, PersistedSlip, SalarySlipPayload, SlipTotals,
};
use crate::policy::PayrollPolicy;
use crate::presets::{self, find_allowance_preset, find_deduction_preset, localized_or_empty};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// The employee a draft is for, reduced to what the derivations need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedEmployee {
    /// Employee identifier, sent as `employeeId` on submission.
    pub id: String,
    /// Drives the GOSI rate.
    #[serde(default)]
    pub is_saudi: bool,
}

/// A salary slip being created or edited.  Holds only inputs; totals
/// are derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalarySlipDraft {
    /// `None` until an employee is chosen.  Submission requires one.
    #[serde(default)]
    pub employee: Option<SelectedEmployee>,
    pub pay_period: PayPeriod,
    /// Monthly basic salary; the base for overtime and GOSI.
    #[serde(default)]
    pub basic_salary: f64,
    /// Allowance lines, in display order.
    #[serde(default)]
    pub allowances: Vec<LineAmount>,
    #[serde(default)]
    pub overtime: Option<OvertimeInput>,
    /// When on, GOSI follows the basic salary and nationality.
    #[serde(default = "default_true")]
    pub auto_calculate_gosi: bool,
    /// Manually entered value; superseded while auto-calculation is on
    /// and an employee is selected.
    #[serde(default)]
    pub gosi_deduction: f64,
    /// Deduction lines other than GOSI.
    #[serde(default)]
    pub deductions: Vec<LineAmount>,
    #[serde(default)]
    pub payment: PaymentDetails,
}

fn default_true() -> bool {
    true
}

impl SalarySlipDraft {
    /// An empty draft for the given month: no employee, no lines, GOSI
    /// auto-calculation on.
    pub fn new(month: u32, year: i32) -> Self {
        Self {
            employee: None,
            pay_period: PayPeriod::new(month, year),
            basic_salary: 0.0,
            allowances: Vec::new(),
            overtime: None,
            auto_calculate_gosi: true,
            gosi_deduction: 0.0,
            deductions: Vec::new(),
            payment: PaymentDetails::default(),
        }
    }

    /// Pre-populates the draft from the employee's compensation record.
    ///
    /// Replaces the allowances with the employee's standing housing,
    /// transportation and food allowances (zero amounts are skipped).
    pub fn select_employee(&mut self, employee: &EmployeeRecord, policy: &PayrollPolicy) {
        debug!(employee_id = %employee.id, "selecting employee for salary slip");
        self.employee = Some(SelectedEmployee {
            id: employee.id.clone(),
            is_saudi: employee.is_saudi,
        });
        self.basic_salary = sanitize_amount(employee.basic_salary);

        let bank = employee.bank_details.clone().unwrap_or_default();
        self.payment.bank_name = Some(bank.bank_name);
        self.payment.iban = Some(bank.iban);

        let standing = &employee.allowances;
        self.allowances = [
            ("housing", presets::HOUSING_ALLOWANCE, standing.housing_allowance),
            ("transport", presets::TRANSPORTATION_ALLOWANCE, standing.transportation_allowance),
            ("food", presets::FOOD_ALLOWANCE, standing.food_allowance),
        ]
        .into_iter()
        .filter_map(|(id, name, amount)| {
            let amount = sanitize_amount(amount?);
            (amount > 0.0).then(|| LineAmount::new(id, name, localized_or_empty(find_allowance_preset(name)), amount))
        })
        .collect();

        self.recompute_gosi(policy);
    }

    /// Re-hydrates the draft from a persisted slip for editing.
    ///
    /// The slip's own figures win over the employee record; the record,
    /// when given, only supplies the nationality for GOSI.
    pub fn hydrate(persisted: &PersistedSlip, employee: Option<&EmployeeRecord>, policy: &PayrollPolicy) -> Self {
        debug!(employee_id = %persisted.employee_id, "hydrating salary slip draft");
        let is_saudi = employee
            .filter(|e| e.id == persisted.employee_id)
            .map(|e| e.is_saudi);

        let allowances = persisted
            .earnings
            .allowances
            .iter()
            .map(|line| LineAmount::new(fresh_id(), &line.name, &line.name_localized, line.amount))
            .collect();

        let breakdown = &persisted.deductions;
        let deductions = [
            (presets::LOAN_REPAYMENT, breakdown.loans),
            (presets::ADVANCE_RECOVERY, breakdown.advances),
            (presets::ABSENCE, breakdown.absences),
            (presets::LATE_DEDUCTION, breakdown.late_deductions),
            (presets::VIOLATION, breakdown.violations),
            (presets::OTHER, breakdown.other_deductions),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount > 0.0)
        .map(|(name, amount)| LineAmount::new(fresh_id(), name, localized_or_empty(find_deduction_preset(name)), amount))
        .collect();

        let mut draft = Self {
            employee: Some(SelectedEmployee {
                id: persisted.employee_id.clone(),
                is_saudi: is_saudi.unwrap_or(false),
            }),
            pay_period: persisted.pay_period.clone(),
            basic_salary: persisted.earnings.basic_salary,
            allowances,
            overtime: persisted.earnings.overtime,
            // Without the employee record the nationality is unknown, so
            // the persisted GOSI value is kept as entered.
            auto_calculate_gosi: is_saudi.is_some(),
            gosi_deduction: breakdown.gosi,
            deductions,
            payment: persisted.payment.clone(),
        };
        draft.sanitize();
        draft.recompute_gosi(policy);
        draft
    }

    /// Clamps every amount the mutators would have filtered: negative or
    /// non-finite salary, line amounts, manual GOSI and overtime hours
    /// become 0.  Drafts that arrive whole (deserialized from a request
    /// or a persisted slip) go through here before any derivation.
    pub fn sanitize(&mut self) {
        self.basic_salary = sanitize_amount(self.basic_salary);
        self.gosi_deduction = sanitize_amount(self.gosi_deduction);
        for line in self.allowances.iter_mut().chain(self.deductions.iter_mut()) {
            line.amount = sanitize_amount(line.amount);
        }
        if let Some(overtime) = self.overtime.as_mut() {
            overtime.hours = sanitize_amount(overtime.hours);
        }
    }

    /// GOSI as it currently applies: derived while auto-calculation is
    /// on and an employee is selected, otherwise the manual value.
    pub fn effective_gosi(&self, policy: &PayrollPolicy) -> f64 {
        match (&self.employee, self.auto_calculate_gosi) {
            (Some(employee), true) => {
                gosi_deduction(self.basic_salary, employee.is_saudi, policy.social_insurance())
            }
            _ => self.gosi_deduction,
        }
    }

    fn recompute_gosi(&mut self, policy: &PayrollPolicy) {
        self.gosi_deduction = self.effective_gosi(policy);
    }

    /// Sets the basic salary (negative or non-finite becomes 0) and
    /// refreshes GOSI.
    pub fn set_basic_salary(&mut self, value: f64, policy: &PayrollPolicy) {
        self.basic_salary = sanitize_amount(value);
        self.recompute_gosi(policy);
    }

    /// Toggles GOSI auto-calculation.  Turning it on overwrites the
    /// manual value.
    pub fn set_auto_calculate_gosi(&mut self, enabled: bool, policy: &PayrollPolicy) {
        self.auto_calculate_gosi = enabled;
        self.recompute_gosi(policy);
    }

    /// Sets GOSI by hand.  Returns `false`, leaving the value untouched,
    /// while auto-calculation is on.
    pub fn set_gosi_deduction(&mut self, value: f64) -> bool {
        if self.auto_calculate_gosi {
            return false;
        }
        self.gosi_deduction = sanitize_amount(value);
        true
    }

    /// Sets overtime hours and multiplier.  Hours are sanitised; the
    /// multiplier is checked by [`validate`](Self::validate).
    pub fn set_overtime(&mut self, hours: f64, rate_multiplier: f64) {
        self.overtime = Some(OvertimeInput {
            hours: sanitize_amount(hours),
            rate_multiplier,
        });
    }

    /// Sets overtime hours, keeping the current multiplier (1.5 if none
    /// has been chosen yet).
    pub fn set_overtime_hours(&mut self, hours: f64) {
        let mut overtime = self.overtime.unwrap_or_default();
        overtime.hours = sanitize_amount(hours);
        self.overtime = Some(overtime);
    }

    /// Sets the attendance figures.  `days_worked <= working_days` is
    /// enforced at submission, not here.
    pub fn set_working_days(&mut self, working_days: u32, days_worked: u32) {
        self.pay_period.working_days = working_days;
        self.pay_period.days_worked = days_worked;
    }

    /// Appends a blank allowance line and returns its id.
    pub fn add_allowance(&mut self) -> String {
        push_blank(&mut self.allowances)
    }

    /// Renames a line, filling the localised name from a matching
    /// preset.  Returns `false` for an unknown id.
    pub fn update_allowance_name(&mut self, id: &str, name: &str) -> bool {
        rename_line(&mut self.allowances, id, name, find_allowance_preset(name))
    }

    pub fn update_allowance_amount(&mut self, id: &str, amount: f64) -> bool {
        set_line_amount(&mut self.allowances, id, amount)
    }

    pub fn remove_allowance(&mut self, id: &str) {
        self.allowances.retain(|l| l.id != id);
    }

    /// Appends a blank deduction line and returns its id.
    pub fn add_deduction(&mut self) -> String {
        push_blank(&mut self.deductions)
    }

    pub fn update_deduction_name(&mut self, id: &str, name: &str) -> bool {
        rename_line(&mut self.deductions, id, name, find_deduction_preset(name))
    }

    pub fn update_deduction_amount(&mut self, id: &str, amount: f64) -> bool {
        set_line_amount(&mut self.deductions, id, amount)
    }

    pub fn remove_deduction(&mut self, id: &str) {
        self.deductions.retain(|l| l.id != id);
    }

    pub fn totals(&self, policy: &PayrollPolicy) -> SlipTotals {
        compute_totals(self, policy)
    }

    /// Submission checks.  Negative net pay passes.
    pub fn validate(&self) -> Result<(), SubmissionError> {
        if self.employee.as_ref().map_or(true, |e| e.id.trim().is_empty()) {
            return Err(SubmissionError::MissingEmployee);
        }
        let period = &self.pay_period;
        if !(1..=12).contains(&period.month) {
            return Err(SubmissionError::InvalidMonth(period.month));
        }
        if period.days_worked > period.working_days {
            return Err(SubmissionError::DaysWorkedExceedWorkingDays {
                days_worked: period.days_worked,
                working_days: period.working_days,
            });
        }
        if let Some(ot) = self.overtime.filter(|ot| ot.hours > 0.0) {
            if !(ot.rate_multiplier.is_finite() && ot.rate_multiplier > 0.0) {
                return Err(SubmissionError::InvalidOvertimeMultiplier(ot.rate_multiplier));
            }
        }
        Ok(())
    }

    /// Builds the body for the slip creation/update endpoint.
    pub fn to_payload(&self, policy: &PayrollPolicy) -> Result<SalarySlipPayload, SubmissionError> {
        self.validate()?;
        let employee_id = self
            .employee
            .as_ref()
            .map(|e| e.id.clone())
            .ok_or(SubmissionError::MissingEmployee)?;

        let totals = self.totals(policy);
        if totals.net_pay < 0.0 {
            warn!(%employee_id, net_pay = totals.net_pay, "submitting salary slip with negative net pay");
        }

        Ok(SalarySlipPayload {
            employee_id,
            pay_period: self.pay_period.clone(),
            earnings: EarningsPayload {
                basic_salary: self.basic_salary,
                allowances: self.allowances.iter().map(PayloadLine::from).collect(),
                overtime: self.overtime.filter(|ot| ot.hours > 0.0).map(OvertimePayload::from),
            },
            deductions: self.deduction_breakdown(policy),
            payment: PaymentDetails {
                method: self.payment.method,
                bank_name: non_empty(&self.payment.bank_name),
                iban: non_empty(&self.payment.iban),
            },
        })
    }

    /// Groups the free deduction lines by preset category.  Lines whose
    /// name is not a known category are summed into `other_deductions`.
    pub fn deduction_breakdown(&self, policy: &PayrollPolicy) -> DeductionBreakdown {
        let mut breakdown = DeductionBreakdown {
            gosi: self.effective_gosi(policy),
            ..DeductionBreakdown::default()
        };
        for line in &self.deductions {
            let bucket = match line.name.as_str() {
                presets::LOAN_REPAYMENT => &mut breakdown.loans,
                presets::ADVANCE_RECOVERY => &mut breakdown.advances,
                presets::ABSENCE => &mut breakdown.absences,
                presets::LATE_DEDUCTION => &mut breakdown.late_deductions,
                presets::VIOLATION => &mut breakdown.violations,
                _ => &mut breakdown.other_deductions,
            };
            *bucket += line.amount;
        }
        breakdown
    }
}

fn fresh_id() -> String {
    Uuid::now_v7().to_string()
}

fn push_blank(lines: &mut Vec<LineAmount>) -> String {
    let id = fresh_id();
    lines.push(LineAmount::new(id.clone(), "", "", 0.0));
    id
}

fn rename_line(lines: &mut [LineAmount], id: &str, name: &str, preset: Option<&'static presets::Preset>) -> bool {
    let Some(line) = lines.iter_mut().find(|l| l.id == id) else {
        return false;
    };
    line.name = name.to_string();
    if let Some(preset) = preset {
        line.name_localized = preset.name_localized.to_string();
    }
    true
}

fn set_line_amount(lines: &mut [LineAmount], id: &str, amount: f64) -> bool {
    let Some(line) = lines.iter_mut().find(|l| l.id == id) else {
        return false;
    };
    line.amount = sanitize_amount(amount);
    true
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BankDetails, PaymentMethod, PersistedEarnings, StandingAllowances};

    fn saudi_employee() -> EmployeeRecord {
        EmployeeRecord {
            id: "emp-1".into(),
            name: "Sara".into(),
            is_saudi: true,
            basic_salary: 10_000.0,
            allowances: StandingAllowances {
                housing_allowance: Some(2500.0),
                transportation_allowance: Some(0.0),
                food_allowance: Some(300.0),
            },
            bank_details: Some(BankDetails {
                bank_name: "Al Rajhi".into(),
                iban: "SA0380000000608010167519".into(),
            }),
        }
    }

    #[test]
    fn selecting_employee_prefills_salary_allowances_and_gosi() {
        let policy = PayrollPolicy::default();
        let mut draft = SalarySlipDraft::new(3, 2025);
        draft.select_employee(&saudi_employee(), &policy);

        assert_eq!(draft.basic_salary, 10_000.0);
        assert_eq!(draft.gosi_deduction, 975.0);
        let ids: Vec<_> = draft.allowances.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["housing", "food"]);
        assert_eq!(draft.allowances[0].name_localized, "بدل سكن");
        assert_eq!(draft.payment.bank_name.as_deref(), Some("Al Rajhi"));
    }

    #[test]
    fn salary_change_recomputes_gosi_only_when_auto() {
        let policy = PayrollPolicy::default();
        let mut draft = SalarySlipDraft::new(3, 2025);
        draft.select_employee(&saudi_employee(), &policy);

        draft.set_basic_salary(8000.0, &policy);
        assert_eq!(draft.gosi_deduction, 780.0);

        assert!(!draft.set_gosi_deduction(100.0));
        assert_eq!(draft.gosi_deduction, 780.0);

        draft.set_auto_calculate_gosi(false, &policy);
        assert!(draft.set_gosi_deduction(100.0));
        draft.set_basic_salary(9000.0, &policy);
        assert_eq!(draft.gosi_deduction, 100.0);
        assert_eq!(draft.effective_gosi(&policy), 100.0);
    }

    #[test]
    fn no_employee_means_no_auto_gosi() {
        let policy = PayrollPolicy::default();
        let mut draft = SalarySlipDraft::new(1, 2025);
        draft.set_basic_salary(10_000.0, &policy);
        assert_eq!(draft.gosi_deduction, 0.0);
    }

    #[test]
    fn preset_name_fills_localized_name() {
        let mut draft = SalarySlipDraft::new(1, 2025);
        let id = draft.add_deduction();
        assert!(draft.update_deduction_name(&id, presets::ABSENCE));
        assert!(draft.update_deduction_amount(&id, -50.0));
        assert_eq!(draft.deductions[0].name_localized, "غياب");
        assert_eq!(draft.deductions[0].amount, 0.0);

        let custom = draft.add_allowance();
        assert!(draft.update_allowance_name(&custom, "Shift bonus"));
        assert_eq!(draft.allowances[0].name_localized, "");
        draft.remove_allowance(&custom);
        assert!(draft.allowances.is_empty());
        assert!(!draft.update_allowance_amount(&custom, 1.0));
    }

    #[test]
    fn validation_catches_bad_periods() {
        let policy = PayrollPolicy::default();
        let mut draft = SalarySlipDraft::new(13, 2025);
        assert_eq!(draft.validate(), Err(SubmissionError::MissingEmployee));

        draft.select_employee(&saudi_employee(), &policy);
        assert_eq!(draft.validate(), Err(SubmissionError::InvalidMonth(13)));

        draft.pay_period.month = 12;
        draft.set_working_days(20, 21);
        assert!(matches!(
            draft.validate(),
            Err(SubmissionError::DaysWorkedExceedWorkingDays { .. })
        ));

        draft.set_working_days(22, 21);
        draft.set_overtime(4.0, 0.0);
        assert_eq!(draft.validate(), Err(SubmissionError::InvalidOvertimeMultiplier(0.0)));

        draft.set_overtime(0.0, 0.0);
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn payload_groups_deductions_and_drops_empty_bank_fields() {
        let policy = PayrollPolicy::default();
        let mut draft = SalarySlipDraft::new(5, 2025);
        draft.select_employee(&saudi_employee(), &policy);
        draft.payment.iban = Some("  ".into());
        draft.payment.method = PaymentMethod::Cash;
        draft.set_overtime(10.0, 1.5);

        for (name, amount) in [
            (presets::LOAN_REPAYMENT, 500.0),
            (presets::LOAN_REPAYMENT, 250.0),
            (presets::LATE_DEDUCTION, 40.0),
            ("Parking fine", 60.0),
            (presets::OTHER, 15.0),
        ] {
            let id = draft.add_deduction();
            draft.update_deduction_name(&id, name);
            draft.update_deduction_amount(&id, amount);
        }

        let payload = draft.to_payload(&policy).unwrap();
        assert_eq!(payload.employee_id, "emp-1");
        assert_eq!(payload.deductions.gosi, 975.0);
        assert_eq!(payload.deductions.loans, 750.0);
        assert_eq!(payload.deductions.late_deductions, 40.0);
        assert_eq!(payload.deductions.other_deductions, 75.0);
        assert_eq!(payload.deductions.advances, 0.0);
        assert_eq!(payload.payment.method, PaymentMethod::Cash);
        assert_eq!(payload.payment.iban, None);
        assert_eq!(payload.payment.bank_name.as_deref(), Some("Al Rajhi"));
        assert_eq!(payload.earnings.allowances.len(), 2);
        assert_eq!(payload.earnings.overtime.map(|o| o.hours), Some(10.0));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["payment"]["paymentMethod"], "cash");
        assert_eq!(json["deductions"]["lateDeductions"], 40.0);
        assert_eq!(json["earnings"]["allowances"][0]["nameAr"], "بدل سكن");
        assert!(json["payment"].get("iban").is_none());
        assert_eq!(json["earnings"]["overtime"]["hours"], 10.0);
        assert_eq!(json["earnings"]["overtime"]["rate"], 1.5);
        assert!(json["earnings"]["overtime"].get("rateMultiplier").is_none());
    }

    #[test]
    fn overtime_hours_default_to_standard_multiplier() {
        let policy = PayrollPolicy::default();
        let mut draft = SalarySlipDraft::new(5, 2025);
        draft.set_basic_salary(4400.0, &policy);
        draft.set_overtime_hours(10.0);
        assert_eq!(draft.overtime.map(|o| o.rate_multiplier), Some(1.5));
        assert_eq!(draft.totals(&policy).overtime_amount, 375.0);

        draft.set_overtime(10.0, 2.0);
        draft.set_overtime_hours(5.0);
        assert_eq!(draft.totals(&policy).overtime_amount, 250.0);
    }

    #[test]
    fn payload_omits_zero_hour_overtime() {
        let policy = PayrollPolicy::default();
        let mut draft = SalarySlipDraft::new(5, 2025);
        draft.select_employee(&saudi_employee(), &policy);
        draft.set_overtime(0.0, 2.0);
        assert_eq!(draft.to_payload(&policy).unwrap().earnings.overtime, None);
    }

    #[test]
    fn negative_net_pay_does_not_block_submission() {
        let policy = PayrollPolicy::default();
        let mut draft = SalarySlipDraft::new(5, 2025);
        draft.select_employee(&saudi_employee(), &policy);
        let id = draft.add_deduction();
        draft.update_deduction_amount(&id, 50_000.0);
        assert!(draft.totals(&policy).net_pay < 0.0);
        assert!(draft.to_payload(&policy).is_ok());
    }

    fn persisted() -> PersistedSlip {
        PersistedSlip {
            employee_id: "emp-1".into(),
            pay_period: PayPeriod {
                month: 2,
                year: 2025,
                working_days: 20,
                days_worked: 18,
                payment_date: None,
            },
            earnings: PersistedEarnings {
                basic_salary: 12_000.0,
                allowances: vec![PayloadLine {
                    name: "Bonus".into(),
                    name_localized: "مكافأة".into(),
                    amount: 1000.0,
                }],
                overtime: Some(OvertimeInput { hours: 2.0, rate_multiplier: 2.0 }),
            },
            deductions: DeductionBreakdown {
                gosi: 500.0,
                loans: 300.0,
                other_deductions: 20.0,
                ..DeductionBreakdown::default()
            },
            payment: PaymentDetails {
                method: PaymentMethod::Check,
                bank_name: None,
                iban: None,
            },
        }
    }

    #[test]
    fn hydrate_without_employee_keeps_persisted_gosi() {
        let policy = PayrollPolicy::default();
        let draft = SalarySlipDraft::hydrate(&persisted(), None, &policy);
        assert!(!draft.auto_calculate_gosi);
        assert_eq!(draft.gosi_deduction, 500.0);
        assert_eq!(draft.pay_period.days_worked, 18);
        assert_eq!(draft.allowances.len(), 1);
        let names: Vec<_> = draft.deductions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec![presets::LOAN_REPAYMENT, presets::OTHER]);

        let breakdown = draft.deduction_breakdown(&policy);
        assert_eq!(breakdown, persisted().deductions);
    }

    #[test]
    fn sanitize_zeroes_negative_and_non_finite_amounts() {
        let policy = PayrollPolicy::default();
        let mut draft = SalarySlipDraft::new(5, 2025);
        draft.employee = Some(SelectedEmployee { id: "emp-1".into(), is_saudi: true });
        draft.basic_salary = -10_000.0;
        draft.gosi_deduction = f64::NAN;
        draft.allowances = vec![LineAmount::new("a", "Bonus", "", -500.0)];
        draft.deductions = vec![
            LineAmount::new("d1", presets::LOAN_REPAYMENT, "", 400.0),
            LineAmount::new("d2", presets::OTHER, "", f64::INFINITY),
        ];
        draft.overtime = Some(OvertimeInput { hours: -10.0, rate_multiplier: 1.5 });

        draft.sanitize();
        assert_eq!(draft.basic_salary, 0.0);
        assert_eq!(draft.gosi_deduction, 0.0);
        assert_eq!(draft.allowances[0].amount, 0.0);
        assert_eq!(draft.deductions[1].amount, 0.0);
        assert_eq!(draft.overtime.map(|o| o.hours), Some(0.0));

        let totals = draft.totals(&policy);
        assert_eq!(totals.total_earnings, 0.0);
        assert_eq!(totals.overtime_amount, 0.0);
        assert_eq!(totals.total_deductions, 400.0);
        assert_eq!(totals.net_pay, -400.0);
    }

    #[test]
    fn hydrate_clamps_negative_persisted_overtime() {
        let policy = PayrollPolicy::default();
        let mut slip = persisted();
        slip.earnings.overtime = Some(OvertimeInput { hours: -3.0, rate_multiplier: 2.0 });
        slip.earnings.basic_salary = -1.0;
        let draft = SalarySlipDraft::hydrate(&slip, None, &policy);
        assert_eq!(draft.overtime.map(|o| o.hours), Some(0.0));
        assert_eq!(draft.basic_salary, 0.0);
        assert_eq!(draft.totals(&policy).overtime_amount, 0.0);
    }

    #[test]
    fn hydrate_with_employee_recomputes_gosi() {
        let policy = PayrollPolicy::default();
        let draft = SalarySlipDraft::hydrate(&persisted(), Some(&saudi_employee()), &policy);
        assert!(draft.auto_calculate_gosi);
        assert_eq!(draft.gosi_deduction, 1170.0);
        assert_eq!(draft.basic_salary, 12_000.0);
    }
}
