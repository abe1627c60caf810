//! Payroll policy: the business constants behind the derivations.
//!
//! Overtime hours, the social-insurance rate and the mileage rates are
//! jurisdiction specific.  Rather than hard-coding them, the engine
//! reads them from a [`PayrollPolicy`] which may be loaded from
//! versioned JSON files.  The built-in default reflects the Saudi
//! rules: an 8 hour day, 22 working days per month and a 9.75% GOSI
//! contribution for Saudi nationals.

use crate::error::PolicyError;
use crate::mileage::MileageRateTable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Standard working hours in a day.
pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;
/// Fixed monthly basis of the overtime hourly rate.
pub const DEFAULT_WORKING_DAYS_PER_MONTH: f64 = 22.0;
/// GOSI employee share for Saudi nationals, in percent.
pub const GOSI_NATIONAL_RATE: f64 = 9.75;

/// A social-insurance scheme determines the statutory deduction taken
/// from an employee's basic salary.
///
/// Implementations must be thread-safe (`Send + Sync`) because batch
/// previews invoke them from several threads at once.
pub trait SocialInsurance: Send + Sync {
    /// Returns the region code the scheme applies to (e.g. `"SA"`).
    fn region_code(&self) -> &str;
    /// The unrounded contribution for the given basic salary.
    fn contribution(&self, basic_salary: f64, is_national: bool) -> f64;
}

/// GOSI style scheme: a flat percentage of basic salary that depends
/// only on nationality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GosiScheme {
    /// Region code, e.g. `"SA"`.
    pub region: String,
    /// Percent of basic salary for nationals.
    pub national_rate: f64,
    /// Percent of basic salary for expatriates.
    pub expatriate_rate: f64,
}

impl Default for GosiScheme {
    fn default() -> Self {
        Self {
            region: "SA".to_string(),
            national_rate: GOSI_NATIONAL_RATE,
            expatriate_rate: 0.0,
        }
    }
}

impl SocialInsurance for GosiScheme {
    fn region_code(&self) -> &str {
        &self.region
    }

    fn contribution(&self, basic_salary: f64, is_national: bool) -> f64 {
        let rate = if is_national {
            self.national_rate
        } else {
            self.expatriate_rate
        };
        basic_salary * (rate / 100.0)
    }
}

/// All configurable constants used by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayrollPolicy {
    /// Region code, e.g. `"SA"`.
    pub region: String,
    /// Version string, e.g. `"2025"`.
    pub version: String,
    /// Standard working hours per day, used for the overtime hourly rate.
    pub hours_per_day: f64,
    /// Used only to derive the hourly overtime rate.  Independent of the
    /// working days entered on a pay period.
    pub working_days_per_month: f64,
    /// Statutory deduction scheme.
    pub social_insurance: GosiScheme,
    /// Reimbursement rates for mileage claims.
    pub mileage: MileageRateTable,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            region: "SA".to_string(),
            version: "default".to_string(),
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            working_days_per_month: DEFAULT_WORKING_DAYS_PER_MONTH,
            social_insurance: GosiScheme::default(),
            mileage: MileageRateTable::default(),
        }
    }
}

impl PayrollPolicy {
    /// Hours in the standard month used for the hourly rate.
    pub fn standard_monthly_hours(&self) -> f64 {
        self.hours_per_day * self.working_days_per_month
    }

    pub fn social_insurance(&self) -> &dyn SocialInsurance {
        &self.social_insurance
    }

    /// Rejects policies that would break the derivations' totality.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !(self.hours_per_day > 0.0) || !(self.working_days_per_month > 0.0) {
            return Err(PolicyError::Invalid(format!(
                "standard month must be positive, got {} hours x {} days",
                self.hours_per_day, self.working_days_per_month
            )));
        }
        let si = &self.social_insurance;
        if !(si.national_rate >= 0.0) || !(si.expatriate_rate >= 0.0) {
            return Err(PolicyError::Invalid("social insurance rates must be non-negative".into()));
        }
        if let Some((vehicle, rate)) = self.mileage.rates.iter().find(|(_, r)| !(**r >= 0.0)) {
            return Err(PolicyError::Invalid(format!("mileage rate for {vehicle:?} is negative: {rate}")));
        }
        if !(self.mileage.default_rate >= 0.0) {
            return Err(PolicyError::Invalid("default mileage rate must be non-negative".into()));
        }
        Ok(())
    }
}

/// Load a single policy from a JSON file.  Keys missing from the file
/// take their default values.
pub fn load_policy(path: &Path) -> Result<PayrollPolicy, PolicyError> {
    let data = std::fs::read_to_string(path).map_err(|source| PolicyError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let policy: PayrollPolicy = serde_json::from_str(&data).map_err(|source| PolicyError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    policy.validate()?;
    debug!(path = %path.display(), region = %policy.region, version = %policy.version, "loaded payroll policy");
    Ok(policy)
}

/// Load all policy definitions from a directory.
///
/// Every `.json` file is parsed as a [`PayrollPolicy`].  Files that
/// fail to parse or validate are skipped with a warning.  Duplicate
/// region/version combinations are not checked.
pub fn load_policies_from_dir(path: &Path) -> Result<Vec<PayrollPolicy>, PolicyError> {
    let read_err = |source| PolicyError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut policies = Vec::new();
    if path.is_dir() {
        for entry in std::fs::read_dir(path).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let file = entry.path();
            if file.is_file() && file.extension().is_some_and(|ext| ext == "json") {
                match load_policy(&file) {
                    Ok(policy) => policies.push(policy),
                    Err(err) => warn!(error = %err, "skipping policy file"),
                }
            }
        }
    }
    Ok(policies)
}
