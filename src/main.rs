use admin_dashboard::clients::ResourceApi;
use admin_dashboard::lifecycle::{setup_tracing, AdminSystem};
use admin_dashboard::monitor::NotificationKind;
use admin_dashboard::stats::{recent, DashboardStats, RECENT_ORDERS};
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let system = AdminSystem::from_env().map_err(|e| e.to_string())?;

    let span = tracing::info_span!("warmup");
    let outcome = async { system.warmup.wake_up().await }
        .instrument(span)
        .await;
    if !outcome.is_awake() {
        warn!("Continuing without a confirmed backend");
    }

    let orders = system.orders.list().await;
    let stats = DashboardStats::from_orders(&orders);
    info!(?stats, "Dashboard loaded");
    for order in recent(&orders, RECENT_ORDERS) {
        info!(id = %order.id, customer = %order.customer, amount = order.amount, status = %order.status, "Recent order");
    }

    let dashboard = system.watch_dashboard();
    let orders_view = system.watch_orders();
    let mut dashboard_alerts = dashboard.notifications();
    let mut orders_alerts = orders_view.notifications();
    let mut snapshots = dashboard.subscribe_snapshot();

    info!("Watching for changes, press Ctrl-C to stop");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Ok(()) = snapshots.changed() => {
                let stats = DashboardStats::from_orders(&snapshots.borrow_and_update());
                info!(?stats, "Dashboard refreshed");
            }
            Ok(()) = dashboard_alerts.changed() => {
                if let Some(alert) = dashboard_alerts.borrow_and_update().get(NotificationKind::NewRecord) {
                    info!(message = %alert.message(), "Dashboard alert");
                }
            }
            Ok(()) = orders_alerts.changed() => {
                if let Some(alert) = orders_alerts.borrow_and_update().get(NotificationKind::Cancelled) {
                    warn!(message = %alert.message(), "Orders alert");
                }
            }
        }
    }

    // Shutdown watches gracefully
    dashboard.shutdown().await;
    orders_view.shutdown().await;

    info!("Application completed successfully");
    Ok(())
}
