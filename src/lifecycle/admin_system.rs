use std::sync::Arc;

use tracing::info;

use crate::clients::{BannerClient, OrderClient, ProductClient, ResourceApi};
use crate::config::{ClientConfig, ConfigError};
use crate::framework::{Backend, HttpBackend, ResourceClient, RetryingTransport};
use crate::model::Order;
use crate::monitor::{PollConfig, PollHandle, Poller};
use crate::stats::DashboardStats;
use crate::warmup::Warmup;

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// The composition root of the dashboard's backend access.
///
/// `AdminSystem` is responsible for:
/// - **Wiring**: one [`RetryingTransport`] shared by every client, so they all use the same
///   timeout and retry policy
/// - **Views**: starting the polling watches of the dashboard and orders views
///
/// # Example
///
/// ```ignore
/// let system = AdminSystem::new(ClientConfig::from_env()?);
/// system.warmup.wake_up().await;
///
/// let orders = system.orders.list().await;
/// let dashboard = system.watch_dashboard();
/// // ...
/// dashboard.shutdown().await;
/// ```
pub struct AdminSystem {
    pub orders: OrderClient,
    pub products: ProductClient,
    pub banners: BannerClient,
    pub warmup: Warmup,
    config: ClientConfig,
}

impl AdminSystem {
    /// Builds the system against the real backend at `config.base_url`.
    pub fn new(config: ClientConfig) -> Self {
        let backend = Arc::new(HttpBackend::new(config.base_url.clone()));
        Self::with_backend(config, backend)
    }

    /// Reads [`ClientConfig`] from the environment and builds the system.
    pub fn from_env() -> Result<Self, SystemError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    /// Builds the system on any [`Backend`], typically a mock in tests.
    pub fn with_backend(config: ClientConfig, backend: Arc<dyn Backend>) -> Self {
        let transport = RetryingTransport::new(backend, config.retry_policy(), config.timeout);
        info!(
            base_url = %config.base_url,
            timeout = ?config.timeout,
            attempts = config.retry_policy().max_attempts(),
            "Backend client ready"
        );

        let warmup = Warmup::new(transport.clone(), config.warmup_config());
        let transport = Arc::new(transport);

        Self {
            orders: OrderClient::new(ResourceClient::new(transport.clone())),
            products: ProductClient::new(ResourceClient::new(transport.clone())),
            banners: BannerClient::new(ResourceClient::new(transport)),
            warmup,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Starts the dashboard watch: new-order alerts only.
    ///
    /// Every call starts an independent poller with its own snapshot.
    pub fn watch_dashboard(&self) -> PollHandle<Order> {
        Poller::spawn(
            self.orders.inner().clone(),
            PollConfig::dashboard(self.config.dashboard_poll),
        )
    }

    /// Starts the orders-view watch: new-order and cancellation alerts.
    pub fn watch_orders(&self) -> PollHandle<Order> {
        Poller::spawn(
            self.orders.inner().clone(),
            PollConfig::orders(self.config.orders_poll),
        )
    }

    /// One-off statistics over the current order list.
    pub async fn dashboard_stats(&self) -> DashboardStats {
        DashboardStats::from_orders(&self.orders.list().await)
    }
}
