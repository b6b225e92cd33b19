//! Server-persisted cart/wishlist documents.
//!
//! One JSONB document per (identity, kind), full-replace on save - the
//! remote half of the reconciliation engine's storage. There is no
//! versioning; concurrent writers are last-write-wins by design.

use std::marker::PhantomData;

use sqlx::PgPool;
use tracing::warn;

use aroura_core::{Cart, Collection, Email, Wishlist};

use crate::commerce::{RemoteStore, StoreError};

/// Which collection a document row holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Cart,
    Wishlist,
}

impl CollectionKind {
    /// Value of the `kind` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Wishlist => "wishlist",
        }
    }
}

/// Postgres-backed [`RemoteStore`] for a collection type.
///
/// Malformed stored documents are recovered as empty collections at this
/// boundary (logged, never surfaced), matching the guest-side policy.
#[derive(Debug, Clone)]
pub struct PgRemoteStore<C> {
    pool: PgPool,
    kind: CollectionKind,
    _collection: PhantomData<fn() -> C>,
}

impl PgRemoteStore<Cart> {
    /// Store for cart documents.
    #[must_use]
    pub const fn cart(pool: PgPool) -> Self {
        Self {
            pool,
            kind: CollectionKind::Cart,
            _collection: PhantomData,
        }
    }
}

impl PgRemoteStore<Wishlist> {
    /// Store for wishlist documents.
    #[must_use]
    pub const fn wishlist(pool: PgPool) -> Self {
        Self {
            pool,
            kind: CollectionKind::Wishlist,
            _collection: PhantomData,
        }
    }
}

impl<C: Collection> RemoteStore<C> for PgRemoteStore<C> {
    async fn fetch(&self, identity: &Email) -> Result<C, StoreError> {
        let row: Option<serde_json::Value> = sqlx::query_scalar(
            r"
            SELECT items
            FROM storefront.collection_document
            WHERE user_email = $1 AND kind = $2
            ",
        )
        .bind(identity.as_str())
        .bind(self.kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let Some(items) = row else {
            return Ok(C::default());
        };

        match serde_json::from_value(items) {
            Ok(collection) => Ok(collection),
            Err(e) => {
                warn!(
                    kind = C::KIND,
                    identity = %identity,
                    error = %e,
                    "malformed server document; treating as empty"
                );
                Ok(C::default())
            }
        }
    }

    async fn save(&self, identity: &Email, collection: &C) -> Result<(), StoreError> {
        let items =
            serde_json::to_value(collection).map_err(|e| StoreError::Serialization(e.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO storefront.collection_document (user_email, kind, items, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (user_email, kind)
            DO UPDATE SET items = EXCLUDED.items, updated_at = now()
            ",
        )
        .bind(identity.as_str())
        .bind(self.kind.as_str())
        .bind(items)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(())
    }
}
