// risto-client/examples/kitchen_board.rs
// Kitchen board that polls the order service and prints each refresh

use chrono::Utc;
use risto_client::logging::init_logger_with_file;
use risto_client::{BoardKind, ClientConfig, RistoClient, ViewSynchronizer};
use shared::order::KitchenPreset;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    let client = Arc::new(RistoClient::new(&config)?);
    tracing::info!(url = %client.order_service_url(), "Connecting to order service");

    let board = ViewSynchronizer::from_config(client, BoardKind::Kitchen, &config);
    if let Err(e) = board.start().await {
        tracing::error!("Initial load failed: {}", e.user_message());
    }

    let mut ticker = tokio::time::interval(board.interval());
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let now = Utc::now();
                for count in board.preset_counts(now) {
                    println!("{:<8} {}", count.preset.label(), count.count);
                }
                for order in board.preset_orders(KitchenPreset::Active, now) {
                    let timing = order.timing(now);
                    println!(
                        "#{} {} [{}] {}{}",
                        order.order_number,
                        order.table_label(),
                        order.status.label(),
                        timing.elapsed_label(),
                        if timing.is_overdue { " (in ritardo)" } else { "" },
                    );
                }
                if let Some(e) = board.last_error() {
                    println!("! {}", e.user_message());
                }
            }
        }
    }

    board.stop();
    Ok(())
}
