//! # Red Connect Runtime
//!
//! Entry point for the Red Connect coordination core.
//!
//! ## Startup Sequence
//!
//! 1. Initialise telemetry (`RC_LOG_LEVEL`, `RC_JSON_LOGS`, ...)
//! 2. Load configuration from the environment
//! 3. Build the service container (store, registry seed, OTP, relay hub)
//! 4. Start the SOS notifier and run the initial stock sweep
//! 5. Run until Ctrl+C, then shut down gracefully

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use rc_01_otp_verification::TracingMailbox;
use rc_runtime::{RedConnectRuntime, RuntimeConfig, ServiceContainer};
use rc_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("Failed to initialise telemetry")?;

    let config = RuntimeConfig::from_env().context("Invalid runtime configuration")?;
    info!(
        storage = ?config.storage,
        otp_ttl_secs = config.otp.code_ttl.as_secs(),
        otp_cooldown_secs = config.otp.resend_cooldown.as_secs(),
        otp_max_attempts = config.otp.max_attempts,
        "Configuration loaded"
    );

    // Codes go to the log until a mail gateway is wired in.
    let container = ServiceContainer::new(config, Arc::new(TracingMailbox))
        .context("Failed to build service container")?;

    let runtime = RedConnectRuntime::new(container).context("Failed to attach to relay")?;
    runtime.start().await.context("Failed to start runtime")?;

    info!("Red Connect is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    Ok(())
}
