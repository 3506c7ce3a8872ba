use std::sync::Arc;

use fxhash::FxHashMap;
use talaria_matrix::ZoneMatrix;
use tracing::debug;

use crate::{
    dispatch::drone::Drone,
    problem::{
        order::{CustomerId, Order},
        sort,
        trip::Trip,
    },
};

/// Cargo restriction in force for one trip: fragile and hazardous orders
/// never share a flight. Once a trip is restricted it stays restricted for
/// its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TripRestriction {
    #[default]
    Unrestricted,
    ExcludesHazardous,
    ExcludesFragile,
}

impl TripRestriction {
    pub fn from_order(order: &Order) -> Self {
        if order.is_fragile() {
            TripRestriction::ExcludesHazardous
        } else if order.is_hazardous() {
            TripRestriction::ExcludesFragile
        } else {
            TripRestriction::Unrestricted
        }
    }

    pub fn admits(self, order: &Order) -> bool {
        match self {
            TripRestriction::Unrestricted => true,
            TripRestriction::ExcludesHazardous => !order.is_hazardous(),
            TripRestriction::ExcludesFragile => !order.is_fragile(),
        }
    }

    fn tighten(&mut self, accepted: &Order) {
        if *self == TripRestriction::Unrestricted {
            *self = TripRestriction::from_order(accepted);
        }
    }
}

/// Urgency-driven packing: the most urgent order anchors the trip, its
/// customer's other orders ride along when capacity allows, and the rest of
/// the frontier fills in by urgency and weight.
pub struct PriorityTripBuilder {
    matrix: Arc<ZoneMatrix>,
}

impl PriorityTripBuilder {
    pub fn new(matrix: Arc<ZoneMatrix>) -> Self {
        PriorityTripBuilder { matrix }
    }

    /// Builds one trip from the candidate frontier. Returns the trip
    /// (possibly empty, a dead-end signal to the caller) together with
    /// every candidate that was not placed.
    pub fn build_most_optimal_trip(&self, mut candidates: Vec<Order>) -> (Trip, Vec<Order>) {
        if candidates.is_empty() {
            return (Trip::default(), Vec::new());
        }

        // Scratch simulator scoped to this construction call.
        let mut drone = Drone::new(Arc::clone(&self.matrix));

        sort::sort_orders(&mut candidates, sort::URGENCY);
        let mut restriction = TripRestriction::from_order(&candidates[0]);
        let anchor_customer = candidates[0].customer_id();

        let mut groups: FxHashMap<CustomerId, Vec<Order>> = FxHashMap::default();
        for order in candidates {
            groups.entry(order.customer_id()).or_default().push(order);
        }

        // The anchor customer's whole group goes first, in urgency order.
        let anchor_group = groups.remove(&anchor_customer).unwrap_or_default();
        let mut leftovers = Vec::new();
        for order in anchor_group {
            try_place(&mut drone, &mut restriction, order, &mut leftovers);
        }

        // Then everything else, most urgent first, heaviest on ties.
        let mut rest: Vec<Order> = groups.into_values().flatten().collect();
        sort::sort_orders(&mut rest, sort::URGENCY_HEAVIEST);
        for order in rest {
            try_place(&mut drone, &mut restriction, order, &mut leftovers);
        }

        debug!(
            placed = drone.orders().len(),
            returned = leftovers.len(),
            ?restriction,
            "priority trip packed"
        );

        (Trip::from_orders(drone.take_orders()), leftovers)
    }
}

// A skipped order never aborts the pass; later candidates still get their
// chance.
fn try_place(
    drone: &mut Drone,
    restriction: &mut TripRestriction,
    order: Order,
    leftovers: &mut Vec<Order>,
) {
    if !restriction.admits(&order) {
        leftovers.push(order);
        return;
    }

    match drone.find_best_order_position(&order) {
        Some(position) => {
            restriction.tighten(&order);
            drone.add_order(order, position);
        }
        None => leftovers.push(order),
    }
}
