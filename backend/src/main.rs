//! Settlement worker
//!
//! Polls for finished games that have not been through payout authorization,
//! runs each through the validation pipeline, and logs the decision. The
//! actual on-chain transfer is executed elsewhere from the approved
//! distribution; this process never touches funds directly.

use anyhow::Context;
use backend::payout::{self, PayoutDecision};
use backend::storage::Store;
use std::time::Duration;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    dotenv::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:stakechess.db".to_string());
    let poll_secs: u64 = std::env::var("SETTLEMENT_POLL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30);
    let run_once = std::env::var("SETTLEMENT_RUN_ONCE").as_deref() == Ok("1");

    let store = Store::connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    store
        .init_schema()
        .await
        .context("Failed to initialize database schema")?;

    info!(%database_url, poll_secs, "settlement worker started");

    let mut ticker = tokio::time::interval(Duration::from_secs(poll_secs));
    loop {
        ticker.tick().await;

        let pending = match store.pending_settlements().await {
            Ok(ids) => ids,
            Err(err) => {
                error!(error = %err, "failed to query pending settlements");
                continue;
            }
        };

        if !pending.is_empty() {
            info!(count = pending.len(), "processing pending settlements");
        }

        for game_id in pending {
            match payout::authorize_payout(&store, game_id).await {
                PayoutDecision::Approved(validation) => {
                    info!(
                        %game_id,
                        approved_by = validation.approved_by.as_deref().unwrap_or("unknown"),
                        payouts = %serde_json::json!(validation.payouts),
                        "payout approved"
                    );
                }
                PayoutDecision::HumanReview(validation) => {
                    warn!(
                        %game_id,
                        triggers = ?validation.risk_factors,
                        "payout awaiting human review"
                    );
                }
                PayoutDecision::Rejected { reason, detail } => {
                    warn!(
                        %game_id,
                        reason = reason.as_str(),
                        detail = detail.as_deref().unwrap_or(""),
                        "payout rejected"
                    );
                }
            }
        }

        if run_once {
            break;
        }
    }

    Ok(())
}
