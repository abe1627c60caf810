//! Payslip Engine library crate.
//!
//! This crate exposes the salary slip derivations (allowance and
//! deduction aggregation, overtime, GOSI, net pay) and mileage
//! reimbursement as reusable modules.  External applications may call
//! into `engine::compute_totals` directly, drive a
//! `draft::SalarySlipDraft` through its lifecycle, or embed the API via
//! `api::build_router`.

pub mod api;
pub mod calc;
pub mod config;
pub mod draft;
pub mod engine;
pub mod error;
pub mod logging;
pub mod mileage;
pub mod models;
pub mod policy;
pub mod presets;
