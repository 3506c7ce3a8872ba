use std::sync::Arc;

use talaria_matrix::{ZoneId, ZoneMatrix};
use tracing::debug;

use crate::{
    dispatch::drone::Drone,
    problem::{backlog::Backlog, sort, trip::Trip},
};

/// Greedy single-zone packing: oldest orders first while the tail stays
/// feasible, then whatever capacity remains goes to the heaviest of the
/// spilled orders.
pub struct ZoneTripBuilder {
    matrix: Arc<ZoneMatrix>,
}

impl ZoneTripBuilder {
    pub fn new(matrix: Arc<ZoneMatrix>) -> Self {
        ZoneTripBuilder { matrix }
    }

    /// Builds one trip out of the backlog's orders for `zone`. The backlog
    /// is expected in FIFO order; orders that do not fit are restored.
    pub fn build_trip(&self, backlog: &mut Backlog, zone: ZoneId) -> Trip {
        // Scratch simulator scoped to this construction call.
        let mut drone = Drone::new(Arc::clone(&self.matrix));
        let candidates = backlog.take_zone(zone);

        // Phase 1: commit in submission order at the tail, up to the first
        // order that no longer fits there. That order and everything after
        // it spill into the overflow set.
        let mut overflow = Vec::new();
        for order in candidates {
            if !overflow.is_empty() {
                overflow.push(order);
                continue;
            }

            let tail = drone.orders().len();
            if drone.probe_insertion(&order, tail).is_depleted() {
                overflow.push(order);
            } else {
                drone.add_order(order, tail);
            }
        }

        // Phase 2: heaviest spilled orders first, wherever they still fit.
        sort::sort_orders(&mut overflow, sort::HEAVIEST);
        let mut unplaced = Vec::new();
        for order in overflow {
            match drone.find_best_order_position(&order) {
                Some(position) => drone.add_order(order, position),
                None => unplaced.push(order),
            }
        }

        debug!(
            zone,
            placed = drone.orders().len(),
            returned = unplaced.len(),
            "zone trip packed"
        );

        backlog.restore(unplaced);
        Trip::from_orders(drone.take_orders())
    }
}
