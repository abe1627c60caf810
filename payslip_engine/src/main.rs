//! Entry point for the Payslip Engine binary.
//!
//! Running this binary starts an HTTP server exposing the slip and
//! mileage derivations.  See [`payslip_engine::config`] for the
//! environment variables it reads.

use anyhow::Context;
use payslip_engine::{api, config, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    logging::init(config::json_logs(|key| std::env::var(key).ok()));

    let config = config::load().context("invalid configuration")?;
    tracing::info!(
        region = %config.policy.region,
        version = %config.policy.version,
        "starting payslip engine"
    );
    api::serve(config.bind_addr, config.policy).await
}
