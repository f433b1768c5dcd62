//! `medimart`: scripted walkthrough of the storefront and back office.
//!
//! Signs in as a customer, places an order and opens a ticket, then signs in
//! as staff to work the order through to delivery. Every step is logged.

use std::sync::Arc;

use anyhow::Context;

use medimart_ai::{GeminiClient, TextCompletion};
use medimart_auth::{DEMO_VERIFICATION_CODE, DemoOtpVerifier, Role, SessionStore};
use medimart_core::{IdGenerator, SystemClock, UuidIdGenerator};
use medimart_events::{InMemoryEventBus, Projection};
use medimart_infra::{ActivityFeed, AppConfig, AppStore, FileSessionStore};
use medimart_orders::{Cart, DeliverySchedule, Region};

const DEMO_PHONE: &str = "9876543210";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    medimart_observability::init();

    let config = AppConfig::from_env().context("loading configuration")?;
    tracing::info!(
        business = %config.business_name,
        logo = %config.logo_url,
        free_delivery_from = %config.free_delivery_threshold,
        "storefront configured"
    );
    if config.gemini_api_key.is_none() {
        tracing::warn!("no Gemini API key configured; assistant will use its fallback reply");
    }

    let ids: Arc<dyn IdGenerator> = Arc::new(UuidIdGenerator);
    let store = AppStore::with_demo_catalog(
        &config,
        ids.clone(),
        Arc::new(SystemClock),
        Arc::new(InMemoryEventBus::new()),
    );
    let events = store.subscribe();
    let sessions: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&config.session_path));
    let completion: Arc<dyn TextCompletion> = Arc::new(GeminiClient::new(config.gemini()));

    let mut app = medimart_app::App::new(
        &config,
        store,
        Arc::new(DemoOtpVerifier::new(ids)),
        sessions,
        completion,
    );

    if let Some(previous) = app.restore_session() {
        tracing::info!(name = %previous.name, "found a previous session");
    }
    app.logout()?;

    // Customer: browse, fill the cart, check out.
    let phone = app.request_code(DEMO_PHONE, Role::Customer)?;
    let customer = app.verify_code(&phone, DEMO_VERIFICATION_CODE)?.clone();
    tracing::info!(tabs = ?app.navigation(), "customer signed in");

    let pricing = app.store().pricing();
    let mut cart = Cart::new();
    for item in app.store().list_available(None) {
        tracing::info!(name = %item.name, price = %item.wholesale_price, stock = item.stock_quantity, "on offer");
    }
    let paracetamol = app
        .store()
        .list_available(Some("paracetamol"))
        .first()
        .map(|item| item.id)
        .context("demo catalog has no paracetamol")?;
    cart.add_from_catalog(app.store().catalog(), &paracetamol)?;
    cart.update_quantity(&paracetamol, 499);
    tracing::info!(
        total = %cart.total(),
        free_delivery = cart.is_free_delivery_eligible(&pricing),
        short_by = %cart.amount_to_free_delivery(&pricing),
        "cart ready"
    );

    let today = app.store().today();
    let mut schedule = DeliverySchedule::new(Region::Bihar);
    let earliest = schedule.minimum_date(today)?;
    schedule.select_date(earliest, today)?;

    let address = customer
        .address
        .clone()
        .unwrap_or_else(|| "Patna, Bihar".to_string());
    let order_id = app
        .store_mut()
        .place_order(&customer, &mut cart, &address, &schedule)?
        .id_typed();

    let undated = DeliverySchedule::new(Region::Other);
    let mut retry = Cart::new();
    retry.add_from_catalog(app.store().catalog(), &paracetamol)?;
    if let Err(err) = app.store_mut().place_order(&customer, &mut retry, &address, &undated) {
        tracing::info!(error = %err, "order without a delivery date rejected");
    }

    app.store_mut()
        .open_ticket(&customer, "Delivery window", "Can the order arrive before the weekend?")?;

    let reply = app.ask("How should I store insulin pens?").await?;
    tracing::info!(fallback = reply.fallback, reply = %reply.text, "assistant replied");

    app.logout()?;

    // Staff: decide, dispatch and deliver the order; answer the ticket.
    let phone = app.request_code(DEMO_PHONE, Role::Employee)?;
    app.verify_code(&phone, DEMO_VERIFICATION_CODE)?;
    let staff = app.principal()?;

    let suggested = app
        .store()
        .suggested_delivery_charge(&staff, order_id)?
        .context("order is no longer pending")?;
    let order = app.store_mut().accept_order(&staff, order_id, Some(suggested))?;
    tracing::info!(payable = ?order.payable_amount().map(|m| m.to_string()), "order accepted");

    app.store_mut().dispatch_order(&staff, order_id)?;
    app.store_mut().mark_delivered(&staff, order_id)?;

    let ticket_id = app
        .store()
        .tickets(&staff)
        .first()
        .map(|ticket| ticket.id_typed())
        .context("expected an open ticket")?;
    app.store_mut().resolve_ticket(
        &staff,
        ticket_id,
        Some("Yes, it has been dispatched for Friday.".to_string()),
    )?;

    let stats = app.store().dashboard(&staff)?;
    tracing::info!(
        total_sales = %stats.total_sales,
        active_orders = stats.active_orders,
        products = stats.product_count,
        low_stock = stats.low_stock_count,
        "dashboard"
    );

    let mut feed = ActivityFeed::new(20);
    feed.apply_all(&events.drain());
    for entry in feed.entries().iter().rev() {
        tracing::info!(
            event = entry.event_type,
            stream = %entry.aggregate_type,
            seq = entry.sequence_number,
            "activity"
        );
    }

    app.logout()?;
    Ok(())
}
