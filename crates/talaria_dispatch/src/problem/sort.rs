use std::cmp::Ordering;

use crate::problem::order::Order;

/// Closed set of order comparators. Composite keys are slices of these,
/// applied lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Timestamp,
    Weight,
    WeightDesc,
    Zone,
    /// Perishable orders sort first.
    Perishable,
    /// Subscriber orders sort first.
    Subscriber,
    OrderId,
}

/// Oldest submission first.
pub const FIFO: &[SortField] = &[SortField::Timestamp];

/// The priority policy's urgency key: perishable dominates, then
/// subscriber status, then age.
pub const URGENCY: &[SortField] = &[
    SortField::Perishable,
    SortField::Subscriber,
    SortField::Timestamp,
];

/// Urgency, breaking remaining ties toward heavier orders.
pub const URGENCY_HEAVIEST: &[SortField] = &[
    SortField::Perishable,
    SortField::Subscriber,
    SortField::Timestamp,
    SortField::WeightDesc,
];

/// Heaviest order first; used for the greedy policy's overflow pass.
pub const HEAVIEST: &[SortField] = &[SortField::WeightDesc];

impl SortField {
    pub fn compare(self, a: &Order, b: &Order) -> Ordering {
        match self {
            SortField::Timestamp => a.timestamp().cmp(&b.timestamp()),
            SortField::Weight => a.weight_grams().cmp(&b.weight_grams()),
            SortField::WeightDesc => b.weight_grams().cmp(&a.weight_grams()),
            SortField::Zone => a.zone().cmp(&b.zone()),
            SortField::Perishable => flag_first(a.is_perishable(), b.is_perishable()),
            SortField::Subscriber => flag_first(a.is_subscriber(), b.is_subscriber()),
            SortField::OrderId => a.id().cmp(&b.id()),
        }
    }
}

// true sorts before false
fn flag_first(a: bool, b: bool) -> Ordering {
    b.cmp(&a)
}

/// Lexicographic composition of the given fields. The unique order id is
/// always appended as the final tiebreak, so every composite key yields a
/// total, deterministic order.
pub fn compare_by(fields: &[SortField], a: &Order, b: &Order) -> Ordering {
    for field in fields {
        let ordering = field.compare(a, b);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    SortField::OrderId.compare(a, b)
}

pub fn sort_orders(orders: &mut [Order], fields: &[SortField]) {
    orders.sort_by(|a, b| compare_by(fields, a, b));
}
