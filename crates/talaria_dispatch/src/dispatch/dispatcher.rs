use std::{cmp::Reverse, collections::BinaryHeap, sync::Arc};

use talaria_matrix::{ZoneId, ZoneMatrix};
use tracing::{debug, info, warn};

use crate::{
    dispatch::{
        drone::{DeliveryError, Drone},
        priority_trip::PriorityTripBuilder,
        zone_trip::ZoneTripBuilder,
    },
    problem::{
        backlog::Backlog,
        order::{Order, OrderId, Timestamp},
        sort,
        trip::{Trip, TripSummary},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackingPolicy {
    /// One zone per trip, oldest orders first.
    ZoneFifo,
    /// Urgency-ordered packing with the fragile/hazardous exclusion.
    Priority,
}

/// Drives a packing policy over the backlog until no further trip can be
/// formed, then drains the packed trips through the delivery drone.
pub struct Dispatcher {
    matrix: Arc<ZoneMatrix>,
    backlog: Backlog,
    trips: Vec<Trip>,
    delivery_drone: Drone,
}

impl Dispatcher {
    pub fn new(matrix: Arc<ZoneMatrix>) -> Self {
        let delivery_drone = Drone::new(Arc::clone(&matrix));
        Dispatcher {
            matrix,
            backlog: Backlog::new(),
            trips: Vec::new(),
            delivery_drone,
        }
    }

    pub fn add_order(&mut self, order: Order) {
        self.backlog.push(order);
    }

    pub fn extend_orders(&mut self, orders: impl IntoIterator<Item = Order>) {
        self.backlog.extend(orders);
    }

    /// Orders that no pass managed to schedule stay here, queryable.
    pub fn backlog(&self) -> &Backlog {
        &self.backlog
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn delivery_drone(&self) -> &Drone {
        &self.delivery_drone
    }

    pub fn trip_summaries(&self) -> Vec<TripSummary> {
        self.trips
            .iter()
            .map(|trip| trip.summarize(&self.matrix))
            .collect()
    }

    pub fn package_trips(&mut self, policy: PackingPolicy) {
        match policy {
            PackingPolicy::ZoneFifo => self.package_zone_fifo(),
            PackingPolicy::Priority => self.package_priority(),
        }
        info!(
            trips = self.trips.len(),
            pending = self.backlog.len(),
            ?policy,
            "packing finished"
        );
    }

    fn package_zone_fifo(&mut self) {
        let builder = ZoneTripBuilder::new(Arc::clone(&self.matrix));

        loop {
            self.backlog.sort(sort::FIFO);
            let Some(zone) = self.backlog.oldest().map(Order::zone) else {
                break;
            };

            let trip = builder.build_trip(&mut self.backlog, zone);
            if trip.is_empty() {
                info!(
                    pending = self.backlog.len(),
                    "no zone trip possible; leaving remaining orders unscheduled"
                );
                break;
            }

            debug!(index = self.trips.len(), orders = trip.len(), zone, "packed trip");
            self.trips.push(trip);
        }
    }

    fn package_priority(&mut self) {
        let builder = PriorityTripBuilder::new(Arc::clone(&self.matrix));
        let mut queue: BinaryHeap<Reverse<QueuedOrder>> = self
            .backlog
            .take_all()
            .into_iter()
            .map(|order| Reverse(QueuedOrder::new(order)))
            .collect();

        loop {
            // Each pass hands the builder the entire remaining frontier in
            // priority order.
            let mut frontier = Vec::with_capacity(queue.len());
            while let Some(Reverse(queued)) = queue.pop() {
                frontier.push(queued.order);
            }
            if frontier.is_empty() {
                break;
            }

            let (trip, leftovers) = builder.build_most_optimal_trip(frontier);
            if trip.is_empty() {
                warn!(
                    pending = leftovers.len(),
                    "priority packing dead end; leaving remaining orders unscheduled"
                );
                self.backlog.restore(leftovers);
                break;
            }

            debug!(index = self.trips.len(), orders = trip.len(), "packed trip");
            self.trips.push(trip);
            queue.extend(
                leftovers
                    .into_iter()
                    .map(|order| Reverse(QueuedOrder::new(order))),
            );
        }
    }

    /// Delivers the packed trips in order, one full flight each, recharging
    /// between flights. The first depletion aborts the drain: the failed
    /// trip stays loaded on the drone and later trips stay queued.
    pub fn deliver_trips(&mut self) -> Result<(), DeliveryError> {
        while !self.trips.is_empty() {
            let trip = self.trips.remove(0);
            for order in trip.into_orders() {
                let tail = self.delivery_drone.orders().len();
                self.delivery_drone.add_order(order, tail);
            }

            self.delivery_drone.deliver()?;
            self.delivery_drone.recharge();
        }

        Ok(())
    }
}

/// Heap entry for the priority policy. Lower keys pop first; the unique
/// order id guarantees a total order even when every other field ties.
#[derive(Debug)]
struct QueuedOrder {
    key: (u8, Timestamp, ZoneId, OrderId),
    order: Order,
}

impl QueuedOrder {
    fn new(order: Order) -> Self {
        let score = u8::from(!order.is_perishable()) * 2 + u8::from(!order.is_subscriber());
        let key = (score, order.timestamp(), order.zone(), order.id());
        QueuedOrder { key, order }
    }
}

impl PartialEq for QueuedOrder {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for QueuedOrder {}

impl PartialOrd for QueuedOrder {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedOrder {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{flagged_order, order, three_zone_matrix, Flags};

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(three_zone_matrix()))
    }

    fn all_ids(dispatcher: &Dispatcher) -> Vec<u64> {
        let mut ids: Vec<u64> = dispatcher
            .trips()
            .iter()
            .flat_map(|trip| trip.iter().map(Order::id))
            .chain(dispatcher.backlog().iter().map(Order::id))
            .collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_zone_policy_serves_oldest_zone_first() {
        let mut dispatcher = dispatcher();
        dispatcher.add_order(order(1, 0, 1, 100));
        dispatcher.add_order(order(2, 1, 2, 100));

        dispatcher.package_trips(PackingPolicy::ZoneFifo);

        assert_eq!(dispatcher.trips().len(), 2);
        assert_eq!(dispatcher.trips()[0].orders()[0].id(), 1);
        assert_eq!(dispatcher.trips()[1].orders()[0].id(), 2);
        assert!(dispatcher.backlog().is_empty());
    }

    #[test]
    fn test_zone_policy_partition_invariant() {
        let mut dispatcher = dispatcher();
        for (id, (ts, zone, weight)) in [
            (0, 1, 800),
            (1, 2, 1200),
            (2, 1, 900),
            (3, 2, 400),
            (4, 1, 700),
        ]
        .into_iter()
        .enumerate()
        {
            dispatcher.add_order(order(id as u64 + 1, ts, zone, weight));
        }
        // Unschedulable on its own; ends the loop once it is the oldest
        // order left.
        dispatcher.add_order(order(6, 9, 2, 50_000));

        dispatcher.package_trips(PackingPolicy::ZoneFifo);

        assert_eq!(all_ids(&dispatcher), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(dispatcher.backlog().len(), 1);
        assert_eq!(dispatcher.backlog().oldest().unwrap().id(), 6);
    }

    #[test]
    fn test_packed_trips_never_deplete_from_full_charge() {
        let mut dispatcher = dispatcher();
        for id in 0..12u64 {
            let zone = 1 + (id as usize % 2);
            dispatcher.add_order(order(id + 1, id, zone, 400 + 100 * (id as u32 % 5)));
        }

        dispatcher.package_trips(PackingPolicy::ZoneFifo);

        let probe = Drone::new(Arc::new(three_zone_matrix()));
        for trip in dispatcher.trips() {
            assert!(!probe.run_trip(trip.orders(), true).is_depleted());
        }
    }

    #[test]
    fn test_priority_policy_separates_fragile_and_hazardous() {
        let mut dispatcher = dispatcher();
        dispatcher.add_order(flagged_order(
            1,
            0,
            1,
            100,
            1,
            Flags {
                fragile: true,
                ..Flags::default()
            },
        ));
        dispatcher.add_order(flagged_order(
            2,
            1,
            1,
            100,
            2,
            Flags {
                hazardous: true,
                ..Flags::default()
            },
        ));

        dispatcher.package_trips(PackingPolicy::Priority);

        assert_eq!(dispatcher.trips().len(), 2);
        assert_eq!(dispatcher.trips()[0].orders()[0].id(), 1);
        assert_eq!(dispatcher.trips()[1].orders()[0].id(), 2);
        assert!(dispatcher.backlog().is_empty());
    }

    #[test]
    fn test_priority_policy_dead_end_keeps_orders_queryable() {
        let mut dispatcher = dispatcher();
        dispatcher.add_order(order(1, 0, 1, 50_000));

        dispatcher.package_trips(PackingPolicy::Priority);

        assert!(dispatcher.trips().is_empty());
        assert_eq!(dispatcher.backlog().len(), 1);
    }

    #[test]
    fn test_priority_policy_is_deterministic() {
        let build = || {
            let mut dispatcher = Dispatcher::new(Arc::new(three_zone_matrix()));
            for id in 0..10u64 {
                dispatcher.add_order(flagged_order(
                    id + 1,
                    5, // identical timestamps force the id tiebreak
                    1 + (id as usize % 2),
                    300 + 50 * (id as u32 % 4),
                    id % 3,
                    Flags {
                        subscriber: id % 2 == 0,
                        perishable: id % 3 == 0,
                        ..Flags::default()
                    },
                ));
            }
            dispatcher.package_trips(PackingPolicy::Priority);
            dispatcher
                .trips()
                .iter()
                .map(|trip| trip.iter().map(Order::id).collect::<Vec<_>>())
                .collect::<Vec<_>>()
        };

        assert_eq!(build(), build());
    }

    #[test]
    fn test_priority_policy_terminates_within_backlog_size() {
        let mut dispatcher = dispatcher();
        for id in 0..6u64 {
            dispatcher.add_order(order(id + 1, id, 1, 2600));
        }

        dispatcher.package_trips(PackingPolicy::Priority);

        // One order per trip: each pass places exactly one 2600 g order.
        assert_eq!(dispatcher.trips().len(), 6);
        assert!(dispatcher.backlog().is_empty());
    }

    #[test]
    fn test_deliver_trips_drains_everything() {
        let mut dispatcher = dispatcher();
        dispatcher.add_order(order(1, 0, 1, 100));
        dispatcher.add_order(order(2, 1, 2, 100));

        dispatcher.package_trips(PackingPolicy::ZoneFifo);
        assert_eq!(dispatcher.trips().len(), 2);

        dispatcher.deliver_trips().unwrap();
        assert!(dispatcher.trips().is_empty());
        assert!(dispatcher.delivery_drone().orders().is_empty());
    }
}
