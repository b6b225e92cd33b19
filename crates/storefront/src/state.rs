//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::email::Mailer;
use crate::services::razorpay::RazorpayClient;

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog: &'static Catalog,
    razorpay: RazorpayClient,
    mailer: Option<Mailer>,
}

impl AppState {
    /// Assemble the application state.
    ///
    /// The mailer is present only when SMTP configuration was provided.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        pool: PgPool,
        razorpay: RazorpayClient,
        mailer: Option<Mailer>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                pool,
                catalog: Catalog::shared(),
                razorpay,
                mailer,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn catalog(&self) -> &'static Catalog {
        self.inner.catalog
    }

    #[must_use]
    pub fn razorpay(&self) -> &RazorpayClient {
        &self.inner.razorpay
    }

    /// Order email delivery, if configured.
    #[must_use]
    pub fn mailer(&self) -> Option<&Mailer> {
        self.inner.mailer.as_ref()
    }
}
