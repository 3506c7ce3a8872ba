use talaria_matrix::ZoneId;

use crate::problem::{
    order::Order,
    sort::{self, SortField},
};

/// The orders not yet assigned to any trip.
///
/// Builders take orders out by value and restore whatever they could not
/// place, so an order is always owned by exactly one of the backlog or a
/// single trip.
#[derive(Debug, Default)]
pub struct Backlog {
    orders: Vec<Order>,
}

impl Backlog {
    pub fn new() -> Self {
        Backlog::default()
    }

    pub fn from_orders(orders: Vec<Order>) -> Self {
        Backlog { orders }
    }

    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn sort(&mut self, fields: &[SortField]) {
        sort::sort_orders(&mut self.orders, fields);
    }

    /// The earliest-submitted order, ties broken by id.
    pub fn oldest(&self) -> Option<&Order> {
        self.orders
            .iter()
            .min_by(|a, b| sort::compare_by(sort::FIFO, a, b))
    }

    /// Removes and returns every order destined for `zone`, preserving the
    /// backlog's current ordering among them.
    pub fn take_zone(&mut self, zone: ZoneId) -> Vec<Order> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.orders.len());

        for order in self.orders.drain(..) {
            if order.zone() == zone {
                taken.push(order);
            } else {
                kept.push(order);
            }
        }

        self.orders = kept;
        taken
    }

    /// Removes and returns every pending order.
    pub fn take_all(&mut self) -> Vec<Order> {
        std::mem::take(&mut self.orders)
    }

    /// Returns unplaced orders to the pool.
    pub fn restore(&mut self, orders: impl IntoIterator<Item = Order>) {
        self.orders.extend(orders);
    }
}

impl Extend<Order> for Backlog {
    fn extend<T: IntoIterator<Item = Order>>(&mut self, iter: T) {
        self.orders.extend(iter);
    }
}
