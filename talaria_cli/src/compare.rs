use std::{path::PathBuf, sync::Arc};

use clap::Args;
use comfy_table::Table;
use talaria_dispatch::{
    dispatch::dispatcher::{Dispatcher, PackingPolicy},
    parsers::orders,
    problem::{order::Order, trip::Trip},
};
use talaria_matrix::ZoneMatrix;

#[derive(Args)]
pub struct CompareArgs {
    /// Distance matrix file
    #[arg(short, long)]
    matrix: PathBuf,

    /// Order feed file
    #[arg(short, long)]
    orders: PathBuf,
}

struct PolicyReport {
    name: &'static str,
    trips: usize,
    orders_packed: usize,
    leftovers: usize,
    total_distance: f64,
    total_battery: f64,
    violations: usize,
}

fn evaluate(
    name: &'static str,
    policy: PackingPolicy,
    matrix: &Arc<ZoneMatrix>,
    feed: &[Order],
) -> PolicyReport {
    let mut dispatcher = Dispatcher::new(Arc::clone(matrix));
    dispatcher.extend_orders(feed.to_vec());
    dispatcher.package_trips(policy);

    let summaries = dispatcher.trip_summaries();
    let violations = dispatcher
        .trips()
        .iter()
        .filter(|trip| {
            trip.iter().any(|o| o.is_fragile()) && trip.iter().any(|o| o.is_hazardous())
        })
        .count();

    PolicyReport {
        name,
        trips: dispatcher.trips().len(),
        orders_packed: dispatcher.trips().iter().map(Trip::len).sum(),
        leftovers: dispatcher.backlog().len(),
        total_distance: summaries.iter().map(|s| s.total_distance).sum(),
        total_battery: summaries.iter().map(|s| s.battery_consumed).sum(),
        violations,
    }
}

pub fn run(args: CompareArgs) -> Result<(), anyhow::Error> {
    let matrix = Arc::new(ZoneMatrix::from_file(&args.matrix)?);
    let feed = orders::from_file(&args.orders)?;
    if let Some(order) = feed.iter().find(|o| !matrix.contains(o.zone())) {
        anyhow::bail!("order {} references unknown zone {}", order.id(), order.zone());
    }

    let reports = [
        evaluate("zone", PackingPolicy::ZoneFifo, &matrix, &feed),
        evaluate("priority", PackingPolicy::Priority, &matrix, &feed),
    ];

    let mut table = Table::new();
    table.set_header(vec![
        "policy",
        "trips",
        "packed",
        "left",
        "distance km",
        "battery used",
        "mixed-cargo trips",
    ]);
    for report in reports {
        table.add_row(vec![
            report.name.to_string(),
            report.trips.to_string(),
            report.orders_packed.to_string(),
            report.leftovers.to_string(),
            format!("{:.1}", report.total_distance),
            format!("{:.3}", report.total_battery),
            report.violations.to_string(),
        ]);
    }
    println!("{table}");

    Ok(())
}
