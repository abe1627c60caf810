//! Process configuration read from the environment.
//!
//! | Variable              | Default          |
//! |-----------------------|------------------|
//! | `PAYSLIP_BIND_ADDR`   | `127.0.0.1:3000` |
//! | `PAYSLIP_POLICY_FILE` | built-in policy  |
//! | `PAYSLIP_REGION`      | `SA`             |
//! | `PAYSLIP_LOG_JSON`    | unset            |
//!
//! `PAYSLIP_POLICY_FILE` may name a single JSON policy or a directory
//! of them; with a directory, the policy whose region matches
//! `PAYSLIP_REGION` is used.

use crate::error::{ConfigError, PolicyError};
use crate::policy::{load_policies_from_dir, load_policy, PayrollPolicy};
use std::net::SocketAddr;
use std::path::Path;
use tracing::info;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_REGION: &str = "SA";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub policy: PayrollPolicy,
}

/// Loads `.env` into the process environment if present.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Reads the configuration from the process environment.
pub fn load() -> Result<Config, ConfigError> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Whether `PAYSLIP_LOG_JSON` asks for JSON log lines.  Read on its own,
/// ahead of [`load`], because the subscriber must exist before the
/// policy is loaded.
pub fn json_logs(lookup: impl Fn(&str) -> Option<String>) -> bool {
    lookup("PAYSLIP_LOG_JSON").is_some_and(|v| matches!(v.as_str(), "1" | "true"))
}

/// Builds the configuration from an arbitrary variable lookup.
pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
    let addr = lookup("PAYSLIP_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let bind_addr = addr.parse().map_err(|_| ConfigError::InvalidAddress {
        var: "PAYSLIP_BIND_ADDR",
        value: addr.clone(),
    })?;

    let region = lookup("PAYSLIP_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
    let policy = match lookup("PAYSLIP_POLICY_FILE") {
        Some(path) => {
            info!(%path, %region, "loading payroll policy");
            resolve_policy(Path::new(&path), &region)?
        }
        None => PayrollPolicy::default(),
    };

    Ok(Config { bind_addr, policy })
}

fn resolve_policy(path: &Path, region: &str) -> Result<PayrollPolicy, PolicyError> {
    if !path.is_dir() {
        return load_policy(path);
    }
    load_policies_from_dir(path)?
        .into_iter()
        .find(|p| p.region == region)
        .ok_or_else(|| PolicyError::Invalid(format!("no policy for region {region} in {}", path.display())))
}
