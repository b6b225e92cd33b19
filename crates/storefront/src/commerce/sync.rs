//! The reconciliation engine: picks the authoritative store for a
//! collection whenever the caller's identity resolves, and gates server
//! writes behind the initial read.
//!
//! One engine instance is built per collection per request; the cart and the
//! wishlist never share an instance. The routine:
//!
//! - identity still resolving: suspend, no read or write
//! - guest: read the guest store (malformed or missing data becomes an empty
//!   collection, never an error)
//! - authenticated: fetch the server copy once
//!   - fetch failed: serve the guest copy read-only, keep the write gate
//!     closed so a later save cannot clobber server data
//!   - server copy non-empty: serve it, leave the guest store untouched
//!   - server copy empty but guest copy non-empty: migrate - adopt the guest
//!     copy, clear the guest store, mark the state dirty so the next save
//!     promotes it to the server
//!
//! The write gate is the one correctness-critical invariant here: no server
//! write is issued for an identity before its initial fetch has resolved.
//!
//! Known race, kept from the source design: two concurrent sessions for the
//! same identity can both observe an empty server copy and both migrate;
//! last write wins. There is no revision counter or lock.

use tracing::{debug, error, warn};

use aroura_core::{Collection, Email};

use super::store::{GuestStore, RemoteStore};

/// Identity resolution status, as reported by the session provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// Identity not yet resolved; reads and writes are suspended.
    Loading,
    Authenticated,
    Unauthenticated,
}

/// The caller's identity, the sole trigger for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub status: AuthStatus,
    /// Stable identity; present iff `status` is `Authenticated`.
    pub identity: Option<Email>,
}

impl AuthState {
    /// Identity still resolving.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            status: AuthStatus::Loading,
            identity: None,
        }
    }

    /// A guest visitor.
    #[must_use]
    pub const fn guest() -> Self {
        Self {
            status: AuthStatus::Unauthenticated,
            identity: None,
        }
    }

    /// An authenticated user.
    #[must_use]
    pub const fn user(identity: Email) -> Self {
        Self {
            status: AuthStatus::Authenticated,
            identity: Some(identity),
        }
    }
}

/// Outcome of a reconciliation pass, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Identity still resolving; nothing was read.
    Suspended,
    /// Guest store is authoritative.
    Guest,
    /// Server store is authoritative.
    Server,
    /// Guest data was adopted and the guest store cleared; the next save
    /// promotes it to the server.
    Migrated,
    /// Server fetch failed; guest data is served read-only and the write
    /// gate stays closed.
    Fallback,
}

/// Which store owns the active collection, decided by [`reconcile`].
///
/// [`reconcile`]: SyncedCollection::reconcile
#[derive(Debug, Clone)]
enum Mode {
    /// No reconciliation has run; all persistence is suppressed.
    Unresolved,
    /// Guest store owns the collection.
    Guest,
    /// Server store owns the collection for `identity`. `gate_open` is set
    /// only by a successful fetch (or migration); while closed, saves are
    /// suppressed entirely.
    Server { identity: Email, gate_open: bool },
}

/// A collection bound to its guest and remote stores.
///
/// Mutations go through [`collection_mut`] and apply synchronously in
/// memory; persistence is a separate, explicit [`save`] that never unwinds
/// the mutation. Save failures are logged, not surfaced.
///
/// [`collection_mut`]: SyncedCollection::collection_mut
/// [`save`]: SyncedCollection::save
#[derive(Debug)]
pub struct SyncedCollection<C, G, R> {
    guest_key: &'static str,
    guest: G,
    remote: R,
    collection: C,
    mode: Mode,
    dirty: bool,
}

impl<C, G, R> SyncedCollection<C, G, R>
where
    C: Collection,
    G: GuestStore,
    R: RemoteStore<C>,
{
    /// Bind an empty collection to its stores. No I/O happens until
    /// [`reconcile`](Self::reconcile) runs.
    pub fn new(guest_key: &'static str, guest: G, remote: R) -> Self {
        Self {
            guest_key,
            guest,
            remote,
            collection: C::default(),
            mode: Mode::Unresolved,
            dirty: false,
        }
    }

    /// The active collection.
    pub const fn collection(&self) -> &C {
        &self.collection
    }

    /// Mutable access to the active collection.
    ///
    /// Marks the state dirty; call [`save`](Self::save) (or
    /// [`flush`](Self::flush)) afterwards to persist.
    pub fn collection_mut(&mut self) -> &mut C {
        self.dirty = true;
        &mut self.collection
    }

    /// Whether an unpersisted change (mutation or migration) is pending.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Run the reconciliation routine for the given identity state.
    ///
    /// Performs at most one remote read and at most one destructive guest
    /// clear (only on migration). Never fails: every error path resolves to
    /// *some* active state.
    pub async fn reconcile(&mut self, auth: &AuthState) -> Reconciliation {
        match (auth.status, &auth.identity) {
            (AuthStatus::Loading, _) => {
                self.mode = Mode::Unresolved;
                Reconciliation::Suspended
            }
            (AuthStatus::Authenticated, Some(identity)) => {
                let identity = identity.clone();
                self.reconcile_authenticated(identity).await
            }
            // An authenticated status without an identity cannot be keyed
            // server-side; treat it as a guest.
            (AuthStatus::Unauthenticated | AuthStatus::Authenticated, _) => {
                self.collection = self.read_guest().await;
                self.mode = Mode::Guest;
                Reconciliation::Guest
            }
        }
    }

    async fn reconcile_authenticated(&mut self, identity: Email) -> Reconciliation {
        match self.remote.fetch(&identity).await {
            Err(e) => {
                warn!(
                    kind = C::KIND,
                    identity = %identity,
                    error = %e,
                    "server fetch failed; serving guest data read-only"
                );
                self.collection = self.read_guest().await;
                self.mode = Mode::Server {
                    identity,
                    gate_open: false,
                };
                Reconciliation::Fallback
            }
            Ok(server) if !server.is_empty() => {
                self.collection = server;
                self.mode = Mode::Server {
                    identity,
                    gate_open: true,
                };
                Reconciliation::Server
            }
            Ok(_) => {
                let guest = self.read_guest().await;
                if guest.is_empty() {
                    self.collection = C::default();
                    self.mode = Mode::Server {
                        identity,
                        gate_open: true,
                    };
                    return Reconciliation::Server;
                }

                debug!(kind = C::KIND, identity = %identity, "migrating guest data to server");
                self.collection = guest;
                if let Err(e) = self.guest.remove(self.guest_key).await {
                    warn!(kind = C::KIND, error = %e, "failed to clear guest store after migration");
                }
                self.mode = Mode::Server {
                    identity,
                    gate_open: true,
                };
                self.dirty = true;
                Reconciliation::Migrated
            }
        }
    }

    /// Read and parse the guest copy. Absent or malformed data is an empty
    /// collection, never an error.
    async fn read_guest(&self) -> C {
        let Some(raw) = self.guest.get(self.guest_key).await else {
            return C::default();
        };
        match serde_json::from_str(&raw) {
            Ok(collection) => collection,
            Err(e) => {
                warn!(
                    kind = C::KIND,
                    error = %e,
                    "malformed guest data; starting from an empty collection"
                );
                C::default()
            }
        }
    }

    /// Persist the active collection to whichever store owns it.
    ///
    /// Optimistic: the in-memory state is already updated and is never
    /// rolled back. Failures are logged. Writes are suppressed entirely
    /// while the identity is unresolved or the server gate is closed.
    pub async fn save(&mut self) {
        match &self.mode {
            Mode::Unresolved => {
                debug!(kind = C::KIND, "save skipped: identity not resolved");
            }
            Mode::Guest => {
                match serde_json::to_string(&self.collection) {
                    Ok(raw) => {
                        if let Err(e) = self.guest.set(self.guest_key, raw).await {
                            error!(kind = C::KIND, error = %e, "guest save failed");
                        }
                    }
                    Err(e) => {
                        error!(kind = C::KIND, error = %e, "guest serialization failed");
                    }
                }
                self.dirty = false;
            }
            Mode::Server {
                gate_open: false, ..
            } => {
                debug!(
                    kind = C::KIND,
                    "server save suppressed: initial fetch has not succeeded"
                );
            }
            Mode::Server {
                identity,
                gate_open: true,
            } => {
                if let Err(e) = self.remote.save(identity, &self.collection).await {
                    error!(kind = C::KIND, identity = %identity, error = %e, "server save failed");
                }
                self.dirty = false;
            }
        }
    }

    /// Persist only if a change is pending (e.g. a migration that has not
    /// been written yet).
    pub async fn flush(&mut self) {
        if self.dirty {
            self.save().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commerce::store::{MemoryGuestStore, MemoryRemoteStore, StoreError};
    use crate::commerce::GUEST_CART_KEY;
    use aroura_core::{AddToCart, Cart, Price, ProductId, ProductSnapshot};

    fn snapshot(id: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            name: format!("Artwork {id}"),
            category: "digital".to_owned(),
            image: format!("/digi_art/digi_art{id}.webp"),
            price: Price::from_rupees(2500),
        }
    }

    fn cart_with(id: i64, quantity: u32) -> Cart {
        let mut cart = Cart::default();
        cart.add(
            snapshot(id),
            AddToCart {
                quantity,
                ..AddToCart::default()
            },
        );
        cart
    }

    fn identity() -> Email {
        Email::parse("user@example.com").expect("valid email")
    }

    /// Remote store that always fails, simulating a network error.
    struct UnreachableRemote;

    impl RemoteStore<Cart> for UnreachableRemote {
        async fn fetch(&self, _identity: &Email) -> Result<Cart, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_owned()))
        }

        async fn save(&self, _identity: &Email, _cart: &Cart) -> Result<(), StoreError> {
            panic!("save must not be called while the gate is closed");
        }
    }

    fn engine<G: GuestStore, R: RemoteStore<Cart>>(
        guest: G,
        remote: R,
    ) -> SyncedCollection<Cart, G, R> {
        SyncedCollection::new(GUEST_CART_KEY, guest, remote)
    }

    #[tokio::test]
    async fn loading_suspends_reads_and_writes() {
        let guest = MemoryGuestStore::new();
        guest.seed(
            GUEST_CART_KEY,
            serde_json::to_string(&cart_with(1, 2)).expect("serialize"),
        );
        let remote = MemoryRemoteStore::<Cart>::new();

        let mut sync = engine(guest.clone(), remote.clone());
        let outcome = sync.reconcile(&AuthState::loading()).await;

        assert_eq!(outcome, Reconciliation::Suspended);
        assert!(sync.collection().is_empty());

        // A save while unresolved must not touch either store.
        sync.save().await;
        assert!(guest.peek(GUEST_CART_KEY).is_some());
        assert!(remote.peek(&identity()).is_none());
    }

    #[tokio::test]
    async fn guest_reads_local_data() {
        let guest = MemoryGuestStore::new();
        guest.seed(
            GUEST_CART_KEY,
            serde_json::to_string(&cart_with(7, 2)).expect("serialize"),
        );

        let mut sync = engine(guest, MemoryRemoteStore::<Cart>::new());
        let outcome = sync.reconcile(&AuthState::guest()).await;

        assert_eq!(outcome, Reconciliation::Guest);
        assert_eq!(sync.collection().lines()[0].quantity, 2);
    }

    #[tokio::test]
    async fn malformed_guest_data_becomes_empty() {
        let guest = MemoryGuestStore::new();
        guest.seed(GUEST_CART_KEY, "{not json]".to_owned());

        let mut sync = engine(guest, MemoryRemoteStore::<Cart>::new());
        let outcome = sync.reconcile(&AuthState::guest()).await;

        assert_eq!(outcome, Reconciliation::Guest);
        assert!(sync.collection().is_empty());
    }

    #[tokio::test]
    async fn non_empty_server_copy_wins_and_guest_is_untouched() {
        let guest = MemoryGuestStore::new();
        guest.seed(
            GUEST_CART_KEY,
            serde_json::to_string(&cart_with(1, 1)).expect("serialize"),
        );
        let remote = MemoryRemoteStore::new();
        remote.seed(identity(), cart_with(2, 3));

        let mut sync = engine(guest.clone(), remote);
        let outcome = sync.reconcile(&AuthState::user(identity())).await;

        assert_eq!(outcome, Reconciliation::Server);
        assert_eq!(sync.collection().lines()[0].product_id, ProductId::new(2));
        // Guest store is left alone when the server copy wins.
        assert!(guest.peek(GUEST_CART_KEY).is_some());
    }

    #[tokio::test]
    async fn empty_server_copy_adopts_and_clears_guest_data() {
        let guest = MemoryGuestStore::new();
        guest.seed(
            GUEST_CART_KEY,
            serde_json::to_string(&cart_with(7, 2)).expect("serialize"),
        );
        let remote = MemoryRemoteStore::<Cart>::new();

        let mut sync = engine(guest.clone(), remote.clone());
        let outcome = sync.reconcile(&AuthState::user(identity())).await;

        assert_eq!(outcome, Reconciliation::Migrated);
        assert_eq!(sync.collection().lines()[0].product_id, ProductId::new(7));
        assert_eq!(sync.collection().lines()[0].quantity, 2);
        assert!(guest.peek(GUEST_CART_KEY).is_none(), "guest store cleared");
        assert!(sync.is_dirty());

        // The subsequent save promotes the migrated content to the server.
        sync.flush().await;
        let stored = remote.peek(&identity()).expect("server copy written");
        assert_eq!(stored.lines()[0].product_id, ProductId::new(7));
        assert_eq!(stored.lines()[0].quantity, 2);
    }

    #[tokio::test]
    async fn both_stores_empty_resolves_to_empty() {
        let mut sync = engine(MemoryGuestStore::new(), MemoryRemoteStore::<Cart>::new());
        let outcome = sync.reconcile(&AuthState::user(identity())).await;
        assert_eq!(outcome, Reconciliation::Server);
        assert!(sync.collection().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_falls_back_to_guest_and_suppresses_writes() {
        let guest = MemoryGuestStore::new();
        guest.seed(
            GUEST_CART_KEY,
            serde_json::to_string(&cart_with(3, 1)).expect("serialize"),
        );

        let mut sync = engine(guest.clone(), UnreachableRemote);
        let outcome = sync.reconcile(&AuthState::user(identity())).await;

        assert_eq!(outcome, Reconciliation::Fallback);
        assert_eq!(sync.collection().lines()[0].product_id, ProductId::new(3));
        // Guest data survives the fallback; it was not migrated.
        assert!(guest.peek(GUEST_CART_KEY).is_some());

        // Mutations still apply in memory, but the save is suppressed
        // (UnreachableRemote panics if its save is ever reached).
        sync.collection_mut().add(snapshot(4), AddToCart::default());
        sync.save().await;
        assert_eq!(sync.collection().len(), 2);
    }

    #[tokio::test]
    async fn guest_mutations_persist_to_guest_store() {
        let guest = MemoryGuestStore::new();
        let mut sync = engine(guest.clone(), MemoryRemoteStore::<Cart>::new());
        sync.reconcile(&AuthState::guest()).await;

        sync.collection_mut().add(snapshot(1), AddToCart::default());
        sync.save().await;

        let raw = guest.peek(GUEST_CART_KEY).expect("guest copy written");
        let stored: Cart = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(stored, *sync.collection());
    }

    #[tokio::test]
    async fn server_round_trip_reproduces_the_collection() {
        let remote = MemoryRemoteStore::<Cart>::new();
        let mut sync = engine(MemoryGuestStore::new(), remote.clone());
        sync.reconcile(&AuthState::user(identity())).await;

        sync.collection_mut().add(
            snapshot(5),
            AddToCart {
                quantity: 4,
                ..AddToCart::default()
            },
        );
        sync.save().await;
        let saved = sync.collection().clone();

        // A fresh engine for the same identity sees the identical state.
        let mut reloaded = engine(MemoryGuestStore::new(), remote);
        reloaded.reconcile(&AuthState::user(identity())).await;
        assert_eq!(*reloaded.collection(), saved);
    }
}
