use std::fmt::Display;

use serde::Serialize;
use talaria_matrix::ZoneId;

pub type OrderId = u64;
pub type CustomerId = u64;

/// Submission tick of an order; lower means submitted earlier.
pub type Timestamp = u64;

/// A single delivery order. Immutable after construction; ownership moves
/// from the backlog into exactly one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    id: OrderId,
    timestamp: Timestamp,
    zone: ZoneId,
    weight_grams: u32,
    customer_id: CustomerId,
    subscriber: bool,
    fragile: bool,
    hazardous: bool,
    perishable: bool,
}

impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    pub fn weight_grams(&self) -> u32 {
        self.weight_grams
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn is_subscriber(&self) -> bool {
        self.subscriber
    }

    pub fn is_fragile(&self) -> bool {
        self.fragile
    }

    pub fn is_hazardous(&self) -> bool {
        self.hazardous
    }

    pub fn is_perishable(&self) -> bool {
        self.perishable
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order {} at {} to zone {} ({}g)",
            self.id, self.timestamp, self.zone, self.weight_grams
        )
    }
}

#[derive(Default)]
pub struct OrderBuilder {
    id: Option<OrderId>,
    timestamp: Option<Timestamp>,
    zone: Option<ZoneId>,
    weight_grams: Option<u32>,
    customer_id: Option<CustomerId>,
    subscriber: bool,
    fragile: bool,
    hazardous: bool,
    perishable: bool,
}

impl OrderBuilder {
    pub fn set_id(&mut self, id: OrderId) -> &mut OrderBuilder {
        self.id = Some(id);
        self
    }

    pub fn set_timestamp(&mut self, timestamp: Timestamp) -> &mut OrderBuilder {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn set_zone(&mut self, zone: ZoneId) -> &mut OrderBuilder {
        self.zone = Some(zone);
        self
    }

    pub fn set_weight_grams(&mut self, weight_grams: u32) -> &mut OrderBuilder {
        self.weight_grams = Some(weight_grams);
        self
    }

    pub fn set_customer_id(&mut self, customer_id: CustomerId) -> &mut OrderBuilder {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn set_subscriber(&mut self, subscriber: bool) -> &mut OrderBuilder {
        self.subscriber = subscriber;
        self
    }

    pub fn set_fragile(&mut self, fragile: bool) -> &mut OrderBuilder {
        self.fragile = fragile;
        self
    }

    pub fn set_hazardous(&mut self, hazardous: bool) -> &mut OrderBuilder {
        self.hazardous = hazardous;
        self
    }

    pub fn set_perishable(&mut self, perishable: bool) -> &mut OrderBuilder {
        self.perishable = perishable;
        self
    }

    pub fn build(&self) -> Order {
        Order {
            id: self.id.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or_default(),
            zone: self.zone.unwrap_or_default(),
            weight_grams: self.weight_grams.unwrap_or_default(),
            customer_id: self.customer_id.unwrap_or_default(),
            subscriber: self.subscriber,
            fragile: self.fragile,
            hazardous: self.hazardous,
            perishable: self.perishable,
        }
    }
}
