use serde::Serialize;
use talaria_matrix::{Distance, ZoneMatrix, WAREHOUSE};

use crate::problem::{energy, order::Order};

/// One complete flight plan: warehouse, then the orders in sequence, then
/// back to the warehouse. The sequence order is significant; it is produced
/// once by a trip builder and never rearranged afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trip {
    orders: Vec<Order>,
}

/// Reporting values derived by replaying a trip over the distance matrix
/// and energy model; nothing here is stored redundantly on the trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripSummary {
    pub order_count: usize,
    pub total_distance: Distance,
    pub battery_consumed: f64,
}

impl Trip {
    pub fn from_orders(orders: Vec<Order>) -> Self {
        Trip { orders }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn into_orders(self) -> Vec<Order> {
        self.orders
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

    /// Total kilometers flown, including the return leg to the warehouse.
    pub fn total_distance(&self, matrix: &ZoneMatrix) -> Distance {
        if self.orders.is_empty() {
            return 0.0;
        }

        let mut previous = WAREHOUSE;
        let mut total = 0.0;
        for order in &self.orders {
            total += matrix.distance(previous, order.zone());
            previous = order.zone();
        }

        total + matrix.distance(previous, WAREHOUSE)
    }

    /// Battery fraction a fully charged drone consumes flying this trip.
    pub fn battery_consumed(&self, matrix: &ZoneMatrix) -> f64 {
        let mut payload: f64 = self.orders.iter().map(|o| f64::from(o.weight_grams())).sum();
        let mut previous = WAREHOUSE;
        let mut consumed = 0.0;

        for order in &self.orders {
            consumed +=
                energy::battery_fraction_required(payload, matrix.distance(previous, order.zone()));
            payload -= f64::from(order.weight_grams());
            previous = order.zone();
        }

        if !self.orders.is_empty() {
            consumed += energy::battery_fraction_required(0.0, matrix.distance(previous, WAREHOUSE));
        }

        consumed
    }

    pub fn summarize(&self, matrix: &ZoneMatrix) -> TripSummary {
        TripSummary {
            order_count: self.orders.len(),
            total_distance: self.total_distance(matrix),
            battery_consumed: self.battery_consumed(matrix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{order, three_zone_matrix};

    #[test]
    fn test_empty_trip_summary_is_zero() {
        let matrix = three_zone_matrix();
        let summary = Trip::default().summarize(&matrix);

        assert_eq!(summary.order_count, 0);
        assert_eq!(summary.total_distance, 0.0);
        assert_eq!(summary.battery_consumed, 0.0);
    }

    #[test]
    fn test_single_stop_replay() {
        let matrix = three_zone_matrix();
        let trip = Trip::from_orders(vec![order(1, 0, 1, 100)]);
        let summary = trip.summarize(&matrix);

        assert_eq!(summary.order_count, 1);
        assert_eq!(summary.total_distance, 20.0);
        // outbound 10 km at 612 g, return 10 km empty
        let expected = (10.0 * 612.0 + 10.0 * 512.0) / 36739.0;
        assert!((summary.battery_consumed - expected).abs() < 1e-12);
    }

    #[test]
    fn test_two_stop_replay_counts_intermediate_leg() {
        let matrix = three_zone_matrix();
        let trip = Trip::from_orders(vec![order(1, 0, 1, 100), order(2, 1, 2, 200)]);

        assert_eq!(trip.total_distance(&matrix), 10.0 + 8.0 + 15.0);
        let expected = (10.0 * (300.0 + 512.0) + 8.0 * (200.0 + 512.0) + 15.0 * 512.0) / 36739.0;
        assert!((trip.battery_consumed(&matrix) - expected).abs() < 1e-12);
    }
}
