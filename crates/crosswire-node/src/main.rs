//! crosswire node binary.
//!
//! `crosswire-node [config.yaml] [config.json]`
//! - loads and validates the node config (default `crosswire.yaml`)
//! - builds registries, dispatcher and services
//! - optionally creates the `NotificationConfig` in the JSON document and
//!   prints its id and binary frame

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use crosswire_core::{Result, WireError};
use crosswire_messages::notifications::{CreateNotificationConfigRequest, NotificationConfig};
use crosswire_node::{config, NodeState};

const DEFAULT_CONFIG: &str = "crosswire.yaml";

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "crosswire-node failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    let cfg = config::load_from_file(&config_path)?;
    let state = NodeState::new(cfg)?;
    tracing::info!(node = %state.cfg().node.name, config = %config_path, "crosswire-node ready");

    let Some(doc_path) = args.next() else {
        return Ok(());
    };
    let doc = tokio::fs::read_to_string(&doc_path)
        .await
        .map_err(|e| WireError::Config(format!("read {doc_path} failed: {e}")))?;

    let codec = state.codec();
    let notification: NotificationConfig = codec.from_json(&doc)?;
    let frame = codec.encode(&notification)?;

    let resp = state
        .client()
        .create_notification_config(CreateNotificationConfigRequest {
            config_id: None,
            config: notification,
        })
        .await?;

    println!("config_id: {}", resp.config_id);
    println!("frame: {}", hex::encode(&frame));
    Ok(())
}
