use talaria_matrix::{ZoneId, ZoneMatrix};

use crate::problem::order::{CustomerId, Order, OrderBuilder, OrderId, Timestamp};

/// 0 = warehouse, d(0,1) = 10, d(0,2) = 15, d(1,2) = 8.
pub fn three_zone_matrix() -> ZoneMatrix {
    ZoneMatrix::from_rows(vec![
        vec![0.0, 10.0, 15.0],
        vec![10.0, 0.0, 8.0],
        vec![15.0, 8.0, 0.0],
    ])
    .unwrap()
}

/// Plain order with no special flags; customer id defaults to the order id.
pub fn order(id: OrderId, timestamp: Timestamp, zone: ZoneId, weight_grams: u32) -> Order {
    let mut builder = OrderBuilder::default();
    builder
        .set_id(id)
        .set_timestamp(timestamp)
        .set_zone(zone)
        .set_weight_grams(weight_grams)
        .set_customer_id(id);
    builder.build()
}

#[derive(Default)]
pub struct Flags {
    pub subscriber: bool,
    pub fragile: bool,
    pub hazardous: bool,
    pub perishable: bool,
}

pub fn flagged_order(
    id: OrderId,
    timestamp: Timestamp,
    zone: ZoneId,
    weight_grams: u32,
    customer_id: CustomerId,
    flags: Flags,
) -> Order {
    let mut builder = OrderBuilder::default();
    builder
        .set_id(id)
        .set_timestamp(timestamp)
        .set_zone(zone)
        .set_weight_grams(weight_grams)
        .set_customer_id(customer_id)
        .set_subscriber(flags.subscriber)
        .set_fragile(flags.fragile)
        .set_hazardous(flags.hazardous)
        .set_perishable(flags.perishable);
    builder.build()
}
