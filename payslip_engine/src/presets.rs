//! Catalogue of commonly used allowance and deduction lines.
//!
//! Choosing one of these names for a line also fills in its localised
//! name.  The deduction names double as the categories used when a
//! draft is turned into a submission payload.

use serde::Serialize;

/// A catalogued line name with its Arabic display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// English name; also the key lines are matched on.
    pub name: &'static str,
    /// Arabic display name.
    #[serde(rename = "nameAr")]
    pub name_localized: &'static str,
}

pub const HOUSING_ALLOWANCE: &str = "Housing Allowance";
pub const TRANSPORTATION_ALLOWANCE: &str = "Transportation Allowance";
pub const FOOD_ALLOWANCE: &str = "Food Allowance";

pub const GOSI: &str = "GOSI";
pub const LOAN_REPAYMENT: &str = "Loan Repayment";
pub const ADVANCE_RECOVERY: &str = "Advance Recovery";
pub const ABSENCE: &str = "Absence";
pub const LATE_DEDUCTION: &str = "Late Deduction";
pub const VIOLATION: &str = "Violation";
pub const OTHER: &str = "Other";

pub const ALLOWANCE_PRESETS: &[Preset] = &[
    Preset { name: HOUSING_ALLOWANCE, name_localized: "بدل سكن" },
    Preset { name: TRANSPORTATION_ALLOWANCE, name_localized: "بدل نقل" },
    Preset { name: FOOD_ALLOWANCE, name_localized: "بدل طعام" },
    Preset { name: "Phone Allowance", name_localized: "بدل هاتف" },
    Preset { name: "Medical Allowance", name_localized: "بدل طبي" },
    Preset { name: "Overtime", name_localized: "أجر إضافي" },
    Preset { name: "Bonus", name_localized: "مكافأة" },
    Preset { name: "Commission", name_localized: "عمولة" },
];

pub const DEDUCTION_PRESETS: &[Preset] = &[
    Preset { name: GOSI, name_localized: "التأمينات الاجتماعية" },
    Preset { name: LOAN_REPAYMENT, name_localized: "سداد قرض" },
    Preset { name: ADVANCE_RECOVERY, name_localized: "استرداد سلفة" },
    Preset { name: ABSENCE, name_localized: "غياب" },
    Preset { name: LATE_DEDUCTION, name_localized: "خصم تأخير" },
    Preset { name: VIOLATION, name_localized: "مخالفة" },
    Preset { name: OTHER, name_localized: "أخرى" },
];

pub fn find_allowance_preset(name: &str) -> Option<&'static Preset> {
    ALLOWANCE_PRESETS.iter().find(|p| p.name == name)
}

pub fn find_deduction_preset(name: &str) -> Option<&'static Preset> {
    DEDUCTION_PRESETS.iter().find(|p| p.name == name)
}

/// Deduction presets a user may pick for a free line.  GOSI has its
/// own dedicated field and is left out.
pub fn selectable_deduction_presets() -> impl Iterator<Item = &'static Preset> {
    DEDUCTION_PRESETS.iter().filter(|p| p.name != GOSI)
}

/// Localised name for a preset, or an empty string for custom names.
pub(crate) fn localized_or_empty(preset: Option<&'static Preset>) -> String {
    preset.map(|p| p.name_localized.to_string()).unwrap_or_default()
}
