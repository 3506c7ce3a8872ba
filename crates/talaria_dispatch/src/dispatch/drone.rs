use std::sync::Arc;

use talaria_matrix::{ZoneMatrix, WAREHOUSE};
use thiserror::Error;
use tracing::{debug, info};

use crate::problem::{energy, order::Order};

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("drone battery depleted mid-flight with {pending} undelivered orders on board")]
    BatteryDepleted { pending: usize },
}

/// Result of flying one round trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightOutcome {
    /// The drone made it back to the warehouse with this much charge left.
    Returned(f64),
    /// The battery balance went negative on some leg. Simulation stops at
    /// the first depleted leg; the return leg counts too.
    Depleted,
}

impl FlightOutcome {
    pub fn charge(self) -> Option<f64> {
        match self {
            FlightOutcome::Returned(charge) => Some(charge),
            FlightOutcome::Depleted => None,
        }
    }

    pub fn is_depleted(self) -> bool {
        matches!(self, FlightOutcome::Depleted)
    }
}

/// A delivery drone: a committed order sequence plus a battery level in
/// `[0, 1]`.
///
/// Trip builders construct a fresh drone per call and use it as scratch
/// space for feasibility probes, so no probe state outlives one trip
/// construction. The dispatcher keeps a single long-lived drone whose
/// stored charge carries across real deliveries.
pub struct Drone {
    matrix: Arc<ZoneMatrix>,
    orders: Vec<Order>,
    charge: f64,
}

impl Drone {
    pub fn new(matrix: Arc<ZoneMatrix>) -> Self {
        Drone {
            matrix,
            orders: Vec::new(),
            charge: 1.0,
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn charge(&self) -> f64 {
        self.charge
    }

    /// Commits an order at `position`. The caller has already validated the
    /// position via [`Drone::find_best_order_position`].
    pub fn add_order(&mut self, order: Order, position: usize) {
        self.orders.insert(position, order);
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }

    /// Moves the committed sequence out, leaving the drone empty.
    pub fn take_orders(&mut self) -> Vec<Order> {
        std::mem::take(&mut self.orders)
    }

    pub fn recharge(&mut self) {
        self.charge = 1.0;
    }

    /// Simulates flying `orders` as one round trip from the warehouse,
    /// starting from a full battery or from the drone's stored charge.
    pub fn run_trip(&self, orders: &[Order], from_full_charge: bool) -> FlightOutcome {
        let starting_charge = if from_full_charge { 1.0 } else { self.charge };
        simulate(&self.matrix, orders.iter(), starting_charge)
    }

    /// Remaining charge if `candidate` were inserted into the committed
    /// sequence at `position` and the whole trip flown from full charge.
    pub fn probe_insertion(&self, candidate: &Order, position: usize) -> FlightOutcome {
        let head = self.orders[..position].iter();
        let tail = self.orders[position..].iter();
        simulate(
            &self.matrix,
            head.chain(std::iter::once(candidate)).chain(tail),
            1.0,
        )
    }

    /// The insertion index that leaves the drone with the most charge after
    /// the full round trip, or `None` when every position depletes. Equal
    /// charges resolve to the lowest index.
    pub fn find_best_order_position(&self, candidate: &Order) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for position in 0..=self.orders.len() {
            if let FlightOutcome::Returned(charge) = self.probe_insertion(candidate, position) {
                let improved = match best {
                    Some((_, best_charge)) => charge > best_charge,
                    None => true,
                };
                if improved {
                    best = Some((position, charge));
                }
            }
        }

        best.map(|(position, _)| position)
    }

    /// Flies the committed orders for real, against the stored charge. On
    /// success the remaining charge is stored and the sequence drained; on
    /// depletion the sequence is left on board for the caller to inspect.
    pub fn deliver(&mut self) -> Result<f64, DeliveryError> {
        info!(
            orders = self.orders.len(),
            charge = self.charge,
            "headed out for delivery"
        );

        match simulate(&self.matrix, self.orders.iter(), self.charge) {
            FlightOutcome::Returned(charge) => {
                for order in &self.orders {
                    debug!(%order, "delivered");
                }
                self.charge = charge;
                self.orders.clear();
                Ok(charge)
            }
            FlightOutcome::Depleted => Err(DeliveryError::BatteryDepleted {
                pending: self.orders.len(),
            }),
        }
    }
}

fn simulate<'a, I>(matrix: &ZoneMatrix, orders: I, starting_charge: f64) -> FlightOutcome
where
    I: Iterator<Item = &'a Order> + Clone,
{
    let mut payload: f64 = orders.clone().map(|o| f64::from(o.weight_grams())).sum();
    let mut charge = starting_charge;
    let mut previous = WAREHOUSE;

    for order in orders {
        charge -=
            energy::battery_fraction_required(payload, matrix.distance(previous, order.zone()));
        if charge < 0.0 {
            return FlightOutcome::Depleted;
        }
        payload -= f64::from(order.weight_grams());
        previous = order.zone();
    }

    charge -= energy::battery_fraction_required(0.0, matrix.distance(previous, WAREHOUSE));
    if charge < 0.0 {
        return FlightOutcome::Depleted;
    }

    FlightOutcome::Returned(charge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{order, three_zone_matrix};

    fn drone() -> Drone {
        Drone::new(Arc::new(three_zone_matrix()))
    }

    #[test]
    fn test_run_trip_arithmetic() {
        let drone = drone();
        let orders = vec![order(1, 0, 1, 100)];

        let outcome = drone.run_trip(&orders, true);
        let expected = 1.0 - (10.0 * 612.0 + 10.0 * 512.0) / 36739.0;
        match outcome {
            FlightOutcome::Returned(charge) => assert!((charge - expected).abs() < 1e-12),
            FlightOutcome::Depleted => panic!("trip unexpectedly depleted"),
        }
    }

    #[test]
    fn test_run_trip_empty_sequence_keeps_charge() {
        let drone = drone();
        assert_eq!(drone.run_trip(&[], true), FlightOutcome::Returned(1.0));
    }

    #[test]
    fn test_depletion_on_return_leg() {
        let drone = drone();
        // outbound 10 * (2700 + 512) = 32120 survives, return 5120 does not
        let orders = vec![order(1, 0, 1, 2700)];
        assert!(drone.run_trip(&orders, true).is_depleted());
    }

    #[test]
    fn test_depletion_on_outbound_leg() {
        let drone = drone();
        // 10 * (3700 + 512) = 42120 exceeds the whole budget
        let orders = vec![order(1, 0, 1, 3700)];
        assert!(drone.run_trip(&orders, true).is_depleted());
    }

    #[test]
    fn test_best_position_can_beat_the_tail() {
        let mut drone = drone();
        drone.add_order(order(1, 0, 2, 100), 0);

        // Visiting zone 1 on the way out is cheaper than appending it after
        // the zone 2 stop.
        let candidate = order(2, 1, 1, 100);
        let best = drone.find_best_order_position(&candidate).unwrap();
        assert_eq!(best, 0);

        let best_charge = drone.probe_insertion(&candidate, best).charge().unwrap();
        let tail_charge = drone
            .probe_insertion(&candidate, drone.orders().len())
            .charge()
            .unwrap();
        assert!(best_charge >= tail_charge);
    }

    #[test]
    fn test_equal_positions_resolve_to_lowest_index() {
        let mut drone = drone();
        drone.add_order(order(1, 0, 1, 100), 0);

        // Same zone, same weight: every position yields the same charge.
        let candidate = order(2, 1, 1, 100);
        assert_eq!(drone.find_best_order_position(&candidate), Some(0));
    }

    #[test]
    fn test_oversized_order_has_no_position() {
        let drone = drone();
        let candidate = order(1, 0, 1, 50_000);
        assert_eq!(drone.find_best_order_position(&candidate), None);
    }

    #[test]
    fn test_deliver_commits_charge_and_drains() {
        let mut drone = drone();
        drone.add_order(order(1, 0, 1, 100), 0);

        let charge = drone.deliver().unwrap();
        let expected = 1.0 - (10.0 * 612.0 + 10.0 * 512.0) / 36739.0;
        assert!((charge - expected).abs() < 1e-12);
        assert!(drone.orders().is_empty());
        assert!((drone.charge() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_deliver_on_partial_charge_fails_loudly() {
        let mut drone = drone();
        drone.add_order(order(1, 0, 1, 100), 0);
        drone.deliver().unwrap();

        // Not recharged: the outbound leg 15 * (1200 + 512) = 25680 exceeds
        // the 25499 left, while a full battery would have covered the trip.
        drone.add_order(order(2, 1, 2, 1200), 0);
        let err = drone.deliver().unwrap_err();
        assert!(matches!(err, DeliveryError::BatteryDepleted { pending: 1 }));

        // The committed sequence is left un-drained.
        assert_eq!(drone.orders().len(), 1);
        assert_eq!(drone.orders()[0].id(), 2);

        drone.recharge();
        assert!(drone.deliver().is_ok());
        assert!(drone.orders().is_empty());
    }

    #[test]
    fn test_take_orders_resets_the_scratch_sequence() {
        let mut drone = drone();
        drone.add_order(order(1, 0, 1, 100), 0);
        drone.add_order(order(2, 1, 1, 100), 1);

        let orders = drone.take_orders();
        assert_eq!(orders.len(), 2);
        assert!(drone.orders().is_empty());

        drone.add_order(order(3, 2, 2, 100), 0);
        drone.clear();
        assert!(drone.orders().is_empty());
    }
}
