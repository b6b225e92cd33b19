//! Order repository for database operations.
//!
//! Queries use the runtime sqlx API (the storefront builds without a live
//! database); row-to-domain conversion validates emails, statuses and item
//! snapshots and reports bad rows as `DataCorruption`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use aroura_core::{Email, OrderId, OrderStatus, Price};

use super::RepositoryError;
use crate::models::{NewOrder, Order, ShippingInfo};

const SELECT_COLUMNS: &str = r"
    SELECT id, items, total,
           shipping_full_name, shipping_address, shipping_phone, shipping_email,
           razorpay_order_id, status, created_at, cancelled_at
    FROM storefront.order
";

/// Raw database row, converted to [`Order`] after validation.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    items: serde_json::Value,
    total: Decimal,
    shipping_full_name: String,
    shipping_address: String,
    shipping_phone: String,
    shipping_email: String,
    razorpay_order_id: String,
    status: String,
    created_at: DateTime<Utc>,
    cancelled_at: Option<DateTime<Utc>>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.shipping_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let status = OrderStatus::from_str_opt(&row.status).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown order status: {}", row.status))
        })?;
        let items = serde_json::from_value(row.items).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order items: {e}"))
        })?;

        Ok(Self {
            id: OrderId::from(row.id),
            items,
            total: Price::new(row.total),
            shipping: ShippingInfo {
                full_name: row.shipping_full_name,
                address: row.shipping_address,
                phone: row.shipping_phone,
                email,
            },
            razorpay_order_id: row.razorpay_order_id,
            status,
            created_at: row.created_at,
            cancelled_at: row.cancelled_at,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a pending order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the gateway order id already
    /// exists, `RepositoryError::Database` for other failures.
    pub async fn create(&self, new: &NewOrder) -> Result<Order, RepositoryError> {
        let items = serde_json::to_value(&new.items).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize order items: {e}"))
        })?;

        let row: OrderRow = sqlx::query_as(
            r"
            INSERT INTO storefront.order
                (id, items, total,
                 shipping_full_name, shipping_address, shipping_phone, shipping_email,
                 razorpay_order_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, items, total,
                      shipping_full_name, shipping_address, shipping_phone, shipping_email,
                      razorpay_order_id, status, created_at, cancelled_at
            ",
        )
        .bind(OrderId::generate().as_uuid())
        .bind(items)
        .bind(new.total.amount())
        .bind(&new.shipping.full_name)
        .bind(&new.shipping.address)
        .bind(&new.shipping.phone)
        .bind(new.shipping.email.as_str())
        .bind(&new.razorpay_order_id)
        .bind(OrderStatus::Pending.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("gateway order id already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails,
    /// `RepositoryError::DataCorruption` if the row is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(self.pool)
            .await?;

        row.map(Order::try_from).transpose()
    }

    /// Mark the order with the given gateway order id as completed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order exists.
    pub async fn mark_completed(
        &self,
        razorpay_order_id: &str,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r"
            UPDATE storefront.order
            SET status = 'completed'
            WHERE razorpay_order_id = $1
            RETURNING id, items, total,
                      shipping_full_name, shipping_address, shipping_phone, shipping_email,
                      razorpay_order_id, status, created_at, cancelled_at
            ",
        )
        .bind(razorpay_order_id)
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), Order::try_from)
    }

    /// Completed orders for an identity, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails,
    /// `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn list_completed(&self, email: &Email) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE shipping_email = $1 AND status = 'completed' ORDER BY created_at DESC"
        ))
        .bind(email.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Cancel an order, stamping the cancellation time.
    ///
    /// Ownership and already-cancelled checks are the caller's job; this
    /// only flips the row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order exists.
    pub async fn cancel(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r"
            UPDATE storefront.order
            SET status = 'cancelled', cancelled_at = now()
            WHERE id = $1
            RETURNING id, items, total,
                      shipping_full_name, shipping_address, shipping_phone, shipping_email,
                      razorpay_order_id, status, created_at, cancelled_at
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), Order::try_from)
    }
}
