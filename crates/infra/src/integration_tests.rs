//! Integration tests for the application store.
//!
//! Tests: operation → aggregate → bus → projection
//!
//! Verifies:
//! - Role checks are enforced at every store operation
//! - Rejected operations change nothing and publish nothing
//! - Listings are newest first and scoped to the customer

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Days, NaiveDate};

    use medimart_auth::{Identity, PhoneNumber, Principal, Role};
    use medimart_catalog::CatalogFilter;
    use medimart_core::{FixedClock, Money, SequentialIdGenerator, UserId};
    use medimart_events::{InMemoryEventBus, Projection};
    use medimart_orders::{Cart, DeliveryCharge, DeliverySchedule, OrderStatus, Region};
    use medimart_support::TicketStatus;

    use crate::config::AppConfig;
    use crate::error::StoreError;
    use crate::events::{StoreEnvelope, StoreEvent};
    use crate::projections::ActivityFeed;
    use crate::store::{AppStore, ItemDraft};

    type Store = AppStore<Arc<InMemoryEventBus<StoreEnvelope>>>;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn setup() -> Store {
        AppStore::with_demo_catalog(
            &AppConfig::default(),
            Arc::new(SequentialIdGenerator::new()),
            Arc::new(FixedClock::on(today())),
            Arc::new(InMemoryEventBus::new()),
        )
    }

    fn identity(role: Role, name: &str) -> Identity {
        Identity {
            id: UserId::new(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: PhoneNumber::parse("9876543210").unwrap(),
            role,
            is_verified: true,
            address: None,
        }
    }

    fn staff() -> Principal {
        identity(Role::Employee, "Demo Employee").principal()
    }

    fn admin() -> Principal {
        identity(Role::Admin, "Harsh Admin").principal()
    }

    fn bihar_schedule() -> DeliverySchedule {
        let mut schedule = DeliverySchedule::new(Region::Bihar);
        schedule
            .select_date(today().checked_add_days(Days::new(7)).unwrap(), today())
            .unwrap();
        schedule
    }

    fn item_named(store: &Store, name: &str) -> medimart_core::ItemId {
        store
            .catalog()
            .items()
            .iter()
            .find(|item| item.name == name)
            .unwrap()
            .id
    }

    /// Cart of `quantity` units of the named demo item.
    fn cart_of(store: &Store, name: &str, quantity: i64) -> Cart {
        let id = item_named(store, name);
        let mut cart = Cart::new();
        cart.add_from_catalog(store.catalog(), &id).unwrap();
        cart.update_quantity(&id, quantity - 1);
        cart
    }

    #[test]
    fn seeded_store_lists_available_items_in_order() {
        let store = setup();
        let names: Vec<&str> = store
            .list_available(None)
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "Paracetamol 500mg",
                "Amoxicillin 250mg",
                "Vitamin C 500mg",
                "Metformin 500mg",
                "Atorvastatin 10mg"
            ]
        );
        assert_eq!(store.list_available(Some("VITAMIN")).len(), 1);
    }

    #[test]
    fn non_eligible_order_flow_to_delivered() {
        let mut store = setup();
        let customer = identity(Role::Customer, "Demo Customer");
        let mut cart = cart_of(&store, "Paracetamol 500mg", 500);
        assert_eq!(cart.total(), Money::from_units(6000));

        let order_id = store
            .place_order(&customer, &mut cart, "Boring Road, Patna", &bihar_schedule())
            .unwrap()
            .id_typed();
        assert!(cart.is_empty());

        let employee = staff();
        assert_eq!(
            store.suggested_delivery_charge(&employee, order_id).unwrap(),
            Some(Money::from_units(250))
        );

        let order = store
            .accept_order(&employee, order_id, Some(Money::from_units(300)))
            .unwrap();
        assert_eq!(order.payable_amount(), Some(Money::from_units(6300)));

        store.dispatch_order(&employee, order_id).unwrap();
        let order = store.mark_delivered(&employee, order_id).unwrap();
        assert_eq!(order.status(), OrderStatus::Delivered);

        let stats = store.dashboard(&employee).unwrap();
        assert_eq!(stats.total_sales, Money::from_units(6000));
        assert_eq!(stats.active_orders, 0);
    }

    #[test]
    fn eligible_order_is_accepted_free() {
        let mut store = setup();
        let customer = identity(Role::Customer, "Demo Customer");
        let mut cart = cart_of(&store, "Amoxicillin 250mg", 250);

        let order = store
            .place_order(&customer, &mut cart, "Gaya", &bihar_schedule())
            .unwrap();
        assert!(order.is_free_delivery());
        let order_id = order.id_typed();

        let employee = staff();
        assert_eq!(
            store.suggested_delivery_charge(&employee, order_id).unwrap(),
            Some(Money::ZERO)
        );
        assert!(matches!(
            store.accept_order(&employee, order_id, Some(Money::from_units(300))),
            Err(StoreError::Validation(_))
        ));

        let order = store.accept_order(&employee, order_id, None).unwrap();
        assert_eq!(order.delivery_charge(), DeliveryCharge::Charged(Money::ZERO));
        assert_eq!(order.payable_amount(), Some(Money::from_units(11_250)));
    }

    #[test]
    fn rejected_submission_keeps_cart_and_stores_nothing() {
        let mut store = setup();
        let events = store.subscribe();
        let customer = identity(Role::Customer, "Demo Customer");
        let mut cart = cart_of(&store, "Vitamin C 500mg", 2);

        let err = store
            .place_order(&customer, &mut cart, "   ", &bihar_schedule())
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let no_date = DeliverySchedule::new(Region::Other);
        assert!(store.place_order(&customer, &mut cart, "Delhi", &no_date).is_err());

        assert_eq!(cart.unit_count(), 2);
        assert!(store.orders(&staff()).is_empty());
        assert!(events.drain().is_empty());
    }

    #[test]
    fn empty_cart_cannot_be_submitted() {
        let mut store = setup();
        let customer = identity(Role::Customer, "Demo Customer");
        let err = store
            .place_order(&customer, &mut Cart::new(), "Patna", &bihar_schedule())
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(msg) if msg.contains("empty cart")));
    }

    #[test]
    fn customers_see_only_their_own_orders_newest_first() {
        let mut store = setup();
        let alice = identity(Role::Customer, "Alice");
        let bob = identity(Role::Customer, "Bob");

        let first = store
            .place_order(&alice, &mut cart_of(&store, "Vitamin C 500mg", 1), "A", &bihar_schedule())
            .unwrap()
            .id_typed();
        let second = store
            .place_order(&bob, &mut cart_of(&store, "Vitamin C 500mg", 1), "B", &bihar_schedule())
            .unwrap()
            .id_typed();
        let third = store
            .place_order(&alice, &mut cart_of(&store, "Metformin 500mg", 3), "A", &bihar_schedule())
            .unwrap()
            .id_typed();

        let ids = |orders: Vec<&medimart_orders::Order>| {
            orders.iter().map(|o| o.id_typed()).collect::<Vec<_>>()
        };
        assert_eq!(ids(store.orders(&alice.principal())), [third, first]);
        assert_eq!(ids(store.orders(&staff())), [third, second, first]);
        assert_eq!(
            store.order(&bob.principal(), first).unwrap_err(),
            StoreError::NotFound
        );
    }

    #[test]
    fn customers_cannot_act_on_orders_or_dashboard() {
        let mut store = setup();
        let customer = identity(Role::Customer, "Demo Customer");
        let order_id = store
            .place_order(&customer, &mut cart_of(&store, "Vitamin C 500mg", 1), "Patna", &bihar_schedule())
            .unwrap()
            .id_typed();

        let who = customer.principal();
        assert_eq!(
            store.accept_order(&who, order_id, Some(Money::ZERO)).unwrap_err(),
            StoreError::Unauthorized
        );
        assert!(matches!(store.dashboard(&who), Err(StoreError::Forbidden(_))));
        assert!(matches!(
            store.suggested_delivery_charge(&who, order_id),
            Err(StoreError::Forbidden(_))
        ));
        assert_eq!(store.order(&who, order_id).unwrap().status(), OrderStatus::Pending);
    }

    #[test]
    fn terminal_orders_reject_further_transitions() {
        let mut store = setup();
        let customer = identity(Role::Customer, "Demo Customer");
        let order_id = store
            .place_order(&customer, &mut cart_of(&store, "Vitamin C 500mg", 1), "Patna", &bihar_schedule())
            .unwrap()
            .id_typed();

        let employee = staff();
        let order = store.decline_order(&employee, order_id).unwrap();
        assert_eq!(order.delivery_charge(), DeliveryCharge::Undetermined);

        let events = store.subscribe();
        assert!(matches!(
            store.accept_order(&employee, order_id, Some(Money::ZERO)),
            Err(StoreError::InvariantViolation(_))
        ));
        assert!(matches!(
            store.dispatch_order(&employee, order_id),
            Err(StoreError::InvariantViolation(_))
        ));
        assert!(events.drain().is_empty());
        assert_eq!(
            store.suggested_delivery_charge(&employee, order_id).unwrap(),
            None
        );
    }

    #[test]
    fn catalog_permissions_follow_roles() {
        let mut store = setup();
        let employee = staff();
        let paracetamol = item_named(&store, "Paracetamol 500mg");

        let mut draft = ItemDraft::from(store.find_item(&paracetamol).unwrap());
        draft.stock_quantity = 10;
        store.save_item(&employee, draft).unwrap();
        assert!(store.find_item(&paracetamol).unwrap().is_low_stock());

        assert!(matches!(
            store.delete_item(&employee, paracetamol),
            Err(StoreError::Unauthorized)
        ));
        assert!(matches!(store.reset_catalog(&employee), Err(StoreError::Forbidden(_))));

        let customer = identity(Role::Customer, "Demo Customer").principal();
        assert!(matches!(
            store.search_inventory(&customer, &CatalogFilter::default()),
            Err(StoreError::Forbidden(_))
        ));

        let boss = admin();
        store.delete_item(&boss, paracetamol).unwrap();
        assert_eq!(store.find_item(&paracetamol).unwrap_err(), StoreError::NotFound);
        store.delete_item(&boss, paracetamol).unwrap();

        store.reset_catalog(&boss).unwrap();
        assert_eq!(store.catalog().len(), 5);
    }

    #[test]
    fn new_item_gets_generated_id_and_out_of_stock_is_hidden() {
        let mut store = setup();
        let draft = ItemDraft {
            id: None,
            name: "Omeprazole 20mg".to_string(),
            category: "Gastrointestinal".to_string(),
            batch_number: "BT-0300".to_string(),
            mfg_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2028, 1, 1).unwrap(),
            stock_quantity: 0,
            wholesale_price: Money::from_units(30),
            retail_price: Money::from_units(55),
        };
        let id = store.save_item(&admin(), draft).unwrap();

        assert_eq!(store.catalog().len(), 6);
        assert!(store.list_available(None).iter().all(|item| item.id != id));

        let filter = CatalogFilter {
            search: Some("omep".to_string()),
            category: None,
        };
        assert_eq!(store.search_inventory(&staff(), &filter).unwrap().len(), 1);
    }

    #[test]
    fn draft_with_unknown_id_is_stored_under_that_id() {
        let mut store = setup();
        let chosen = medimart_core::ItemId::new();
        let vitamin_c = item_named(&store, "Vitamin C 500mg");
        let mut draft = ItemDraft::from(store.find_item(&vitamin_c).unwrap());
        draft.id = Some(chosen);
        draft.name = "Vitamin D3 1000IU".to_string();

        assert_eq!(store.save_item(&staff(), draft).unwrap(), chosen);
        assert_eq!(store.catalog().len(), 6);
        assert_eq!(store.catalog().items().last().map(|item| item.id), Some(chosen));
        assert_eq!(store.find_item(&chosen).unwrap().name, "Vitamin D3 1000IU");
        assert_eq!(store.find_item(&vitamin_c).unwrap().name, "Vitamin C 500mg");
    }

    #[test]
    fn dashboard_counts_pending_low_stock_and_products() {
        let mut store = setup();
        let customer = identity(Role::Customer, "Demo Customer");
        for _ in 0..2 {
            store
                .place_order(&customer, &mut cart_of(&store, "Vitamin C 500mg", 1), "Patna", &bihar_schedule())
                .unwrap();
        }

        let stats = store.dashboard(&admin()).unwrap();
        assert_eq!(stats.active_orders, 2);
        assert_eq!(stats.pending_queue.len(), 2);
        assert_eq!(stats.product_count, 5);
        assert_eq!(stats.low_stock_count, 1);
        assert_eq!(stats.total_sales, Money::ZERO);
    }

    #[test]
    fn tickets_are_scoped_and_resolved_once() {
        let mut store = setup();
        let alice = identity(Role::Customer, "Alice");
        let bob = identity(Role::Customer, "Bob");

        let ticket_id = store
            .open_ticket(&alice, "Late delivery", "Still waiting")
            .unwrap()
            .id_typed();
        store.open_ticket(&bob, "Invoice", "Need a copy").unwrap();

        assert_eq!(store.tickets(&alice.principal()).len(), 1);
        assert_eq!(store.tickets(&staff()).len(), 2);
        assert_eq!(store.tickets(&staff())[0].subject(), "Invoice");

        assert!(store.open_ticket(&alice, "", "body").is_err());
        assert_eq!(
            store.resolve_ticket(&alice.principal(), ticket_id, None).unwrap_err(),
            StoreError::Unauthorized
        );

        let ticket = store
            .resolve_ticket(&staff(), ticket_id, Some("Dispatched today".to_string()))
            .unwrap();
        assert_eq!(ticket.status(), TicketStatus::Resolved);
        assert!(matches!(
            store.resolve_ticket(&staff(), ticket_id, None),
            Err(StoreError::InvariantViolation(_))
        ));
    }

    #[test]
    fn applied_events_are_published_with_stream_sequence_numbers() {
        let mut store = setup();
        let events = store.subscribe();
        let customer = identity(Role::Customer, "Demo Customer");
        let order_id = store
            .place_order(&customer, &mut cart_of(&store, "Paracetamol 500mg", 500), "Patna", &bihar_schedule())
            .unwrap()
            .id_typed();
        let employee = staff();
        store
            .accept_order(&employee, order_id, Some(Money::from_units(300)))
            .unwrap();
        store.reset_catalog(&admin()).unwrap();

        let published = events.drain();
        assert_eq!(published.len(), 3);

        assert_eq!(published[0].aggregate_type(), "orders.order");
        assert_eq!(published[0].aggregate_id(), *order_id.as_uuid());
        assert_eq!(published[0].sequence_number(), 1);
        assert_eq!(published[1].sequence_number(), 2);
        assert!(matches!(published[1].payload(), StoreEvent::Order(_)));

        assert_eq!(published[2].aggregate_type(), "catalog");
        assert_eq!(published[2].sequence_number(), 1);

        let mut feed = ActivityFeed::new(10);
        feed.apply_all(&published);
        feed.apply_all(&published);
        assert_eq!(feed.entries().len(), 3);
        assert_eq!(feed.entries()[0].event_type, "catalog.reset");
        assert_eq!(feed.entries()[2].event_type, "orders.order.placed");
    }
}
