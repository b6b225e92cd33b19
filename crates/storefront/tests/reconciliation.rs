//! End-to-end reconciliation scenarios over in-memory stores.
//!
//! These walk the full visitor lifecycle - browse as a guest, log in,
//! mutate, come back on another device - with both collections, the way the
//! route handlers drive the engine: reconcile, mutate, save.

use aroura_core::{AddToCart, Cart, Price, PrintSize, ProductId, ProductSnapshot, Wishlist};
use aroura_storefront::commerce::{
    AuthState, GUEST_CART_KEY, GUEST_WISHLIST_KEY, MemoryGuestStore, MemoryRemoteStore,
    Reconciliation, SyncedCollection,
};

fn artwork(id: i64, rupees: i64) -> ProductSnapshot {
    ProductSnapshot {
        id: ProductId::new(id),
        name: format!("Artwork {id}"),
        category: "digital".to_owned(),
        image: format!("/images/products/artwork-{id}.webp"),
        price: Price::from_rupees(rupees),
    }
}

fn user() -> aroura_core::Email {
    aroura_core::Email::parse("priya@example.com").expect("valid email")
}

#[tokio::test]
async fn guest_cart_survives_login_and_reappears_on_a_second_device() {
    let guest = MemoryGuestStore::new();
    let server = MemoryRemoteStore::<Cart>::new();

    // Day one: an anonymous visitor fills a cart.
    let mut session =
        SyncedCollection::new(GUEST_CART_KEY, guest.clone(), server.clone());
    session.reconcile(&AuthState::guest()).await;
    session.collection_mut().add(
        artwork(4, 1799),
        AddToCart {
            quantity: 2,
            selected_size: PrintSize::A2,
            ..AddToCart::default()
        },
    );
    session.save().await;
    drop(session);

    // They log in; the next cart read migrates the guest copy.
    let mut session = SyncedCollection::new(GUEST_CART_KEY, guest.clone(), server.clone());
    let outcome = session.reconcile(&AuthState::user(user())).await;
    assert_eq!(outcome, Reconciliation::Migrated);
    session.flush().await;
    assert!(guest.peek(GUEST_CART_KEY).is_none());

    // Same account, different device: fresh guest store, same server.
    let mut other_device =
        SyncedCollection::new(GUEST_CART_KEY, MemoryGuestStore::new(), server);
    let outcome = other_device.reconcile(&AuthState::user(user())).await;
    assert_eq!(outcome, Reconciliation::Server);

    let lines = other_device.collection().lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_id, ProductId::new(4));
    assert_eq!(lines[0].quantity, 2);
    assert_eq!(lines[0].selected_size, PrintSize::A2);
}

#[tokio::test]
async fn server_cart_beats_a_stale_guest_cart_without_destroying_it() {
    let guest = MemoryGuestStore::new();
    let server = MemoryRemoteStore::<Cart>::new();

    let mut old_session = SyncedCollection::new(GUEST_CART_KEY, guest.clone(), server.clone());
    old_session.reconcile(&AuthState::guest()).await;
    old_session.collection_mut().add(artwork(1, 1499), AddToCart::default());
    old_session.save().await;

    // The account already has a server cart from elsewhere.
    let mut server_cart = Cart::default();
    server_cart.add(artwork(8, 1899), AddToCart::default());
    server.seed(user(), server_cart);

    let mut session = SyncedCollection::new(GUEST_CART_KEY, guest.clone(), server);
    let outcome = session.reconcile(&AuthState::user(user())).await;

    assert_eq!(outcome, Reconciliation::Server);
    assert_eq!(session.collection().lines()[0].product_id, ProductId::new(8));
    // The losing guest copy is preserved, not merged and not deleted.
    assert!(guest.peek(GUEST_CART_KEY).is_some());
}

#[tokio::test]
async fn cart_and_wishlist_reconcile_independently() {
    let guest = MemoryGuestStore::new();
    let cart_server = MemoryRemoteStore::<Cart>::new();
    let wishlist_server = MemoryRemoteStore::<Wishlist>::new();

    // Guest wishes for one piece and carts another.
    let mut cart = SyncedCollection::new(GUEST_CART_KEY, guest.clone(), cart_server.clone());
    cart.reconcile(&AuthState::guest()).await;
    cart.collection_mut().add(artwork(5, 2199), AddToCart::default());
    cart.save().await;

    let mut wishlist =
        SyncedCollection::new(GUEST_WISHLIST_KEY, guest.clone(), wishlist_server.clone());
    wishlist.reconcile(&AuthState::guest()).await;
    wishlist.collection_mut().add(artwork(9, 3499));
    wishlist.save().await;

    // The account has a server wishlist but no server cart: the wishlist
    // resolves to the server copy while the cart migrates.
    let mut server_wishlist = Wishlist::default();
    server_wishlist.add(artwork(12, 1699));
    wishlist_server.seed(user(), server_wishlist);

    let mut cart = SyncedCollection::new(GUEST_CART_KEY, guest.clone(), cart_server);
    assert_eq!(
        cart.reconcile(&AuthState::user(user())).await,
        Reconciliation::Migrated
    );

    let mut wishlist =
        SyncedCollection::new(GUEST_WISHLIST_KEY, guest.clone(), wishlist_server);
    assert_eq!(
        wishlist.reconcile(&AuthState::user(user())).await,
        Reconciliation::Server
    );
    assert!(wishlist.collection().contains(ProductId::new(12)));
    assert!(!wishlist.collection().contains(ProductId::new(9)));

    // The cart's guest key was cleared by its migration; the wishlist's
    // guest key survived its server win.
    assert!(guest.peek(GUEST_CART_KEY).is_none());
    assert!(guest.peek(GUEST_WISHLIST_KEY).is_some());
}

#[tokio::test]
async fn wishlist_toggle_round_trips_through_the_server() {
    let server = MemoryRemoteStore::<Wishlist>::new();

    let mut wishlist =
        SyncedCollection::new(GUEST_WISHLIST_KEY, MemoryGuestStore::new(), server.clone());
    wishlist.reconcile(&AuthState::user(user())).await;
    wishlist.collection_mut().toggle(artwork(7, 1599));
    wishlist.save().await;

    let mut reloaded =
        SyncedCollection::new(GUEST_WISHLIST_KEY, MemoryGuestStore::new(), server.clone());
    reloaded.reconcile(&AuthState::user(user())).await;
    assert!(reloaded.collection().contains(ProductId::new(7)));

    // Toggle off and reload again: the server copy is now empty.
    reloaded.collection_mut().toggle(artwork(7, 1599));
    reloaded.save().await;

    let mut final_state =
        SyncedCollection::new(GUEST_WISHLIST_KEY, MemoryGuestStore::new(), server);
    final_state.reconcile(&AuthState::user(user())).await;
    assert!(final_state.collection().is_empty());
}

#[tokio::test]
async fn logout_returns_to_the_guest_store() {
    let guest = MemoryGuestStore::new();
    let server = MemoryRemoteStore::<Cart>::new();

    let mut server_cart = Cart::default();
    server_cart.add(artwork(2, 1299), AddToCart::default());
    server.seed(user(), server_cart);

    let mut session = SyncedCollection::new(GUEST_CART_KEY, guest.clone(), server.clone());
    session.reconcile(&AuthState::user(user())).await;
    assert_eq!(session.collection().len(), 1);

    // After logout the next reconciliation is a guest read; the server copy
    // is invisible and untouched.
    let mut session = SyncedCollection::new(GUEST_CART_KEY, guest, server.clone());
    let outcome = session.reconcile(&AuthState::guest()).await;
    assert_eq!(outcome, Reconciliation::Guest);
    assert!(session.collection().is_empty());

    session.collection_mut().add(artwork(3, 999), AddToCart::default());
    session.save().await;
    assert_eq!(
        server.peek(&user()).expect("server copy").lines().len(),
        1,
        "guest mutations never reach the server"
    );
}
