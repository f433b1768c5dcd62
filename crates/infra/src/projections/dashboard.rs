use serde::{Deserialize, Serialize};

use medimart_catalog::Catalog;
use medimart_core::{Money, OrderId};
use medimart_orders::{Order, OrderStatus};

/// Staff dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Sum of order totals (delivery charges excluded) over delivered orders.
    pub total_sales: Money,
    /// Orders still awaiting a staff decision.
    pub active_orders: usize,
    pub product_count: usize,
    pub low_stock_count: usize,
    /// Pending orders, newest first.
    pub pending_queue: Vec<OrderId>,
}

impl DashboardStats {
    /// `orders` must be in display order (newest first).
    pub fn compute<'a, I>(catalog: &Catalog, orders: I) -> Self
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut total_sales = Money::ZERO;
        let mut pending_queue = Vec::new();

        for order in orders {
            match order.status() {
                OrderStatus::Delivered => total_sales = total_sales + order.total_amount(),
                OrderStatus::Pending => pending_queue.push(order.id_typed()),
                _ => {}
            }
        }

        Self {
            total_sales,
            active_orders: pending_queue.len(),
            product_count: catalog.len(),
            low_stock_count: catalog.low_stock().len(),
            pending_queue,
        }
    }
}
