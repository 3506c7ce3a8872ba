use std::{path::PathBuf, sync::Arc};

use clap::{Args, ValueEnum};
use comfy_table::Table;
use talaria_dispatch::{
    dispatch::dispatcher::{Dispatcher, PackingPolicy},
    parsers::orders,
};
use talaria_matrix::ZoneMatrix;
use tracing::info;

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    Zone,
    Priority,
}

impl From<PolicyArg> for PackingPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Zone => PackingPolicy::ZoneFifo,
            PolicyArg::Priority => PackingPolicy::Priority,
        }
    }
}

#[derive(Args)]
pub struct DispatchArgs {
    /// Distance matrix file
    #[arg(short, long)]
    matrix: PathBuf,

    /// Order feed file
    #[arg(short, long)]
    orders: PathBuf,

    /// Packing policy
    #[arg(short, long, value_enum, default_value = "zone")]
    policy: PolicyArg,

    /// Fly the packed trips after packing
    #[arg(long)]
    deliver: bool,

    /// Emit the packed trips as JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn run(args: DispatchArgs) -> Result<(), anyhow::Error> {
    let matrix = Arc::new(ZoneMatrix::from_file(&args.matrix)?);
    let feed = orders::from_file(&args.orders)?;
    if let Some(order) = feed.iter().find(|o| !matrix.contains(o.zone())) {
        anyhow::bail!("order {} references unknown zone {}", order.id(), order.zone());
    }
    info!(orders = feed.len(), zones = matrix.num_zones(), "loaded inputs");

    let mut dispatcher = Dispatcher::new(Arc::clone(&matrix));
    dispatcher.extend_orders(feed);
    dispatcher.package_trips(args.policy.into());

    if args.json {
        println!("{}", serde_json::to_string_pretty(dispatcher.trips())?);
    } else {
        let mut table = Table::new();
        table.set_header(vec!["trip", "orders", "distance km", "battery used"]);
        for (index, summary) in dispatcher.trip_summaries().iter().enumerate() {
            table.add_row(vec![
                index.to_string(),
                summary.order_count.to_string(),
                format!("{:.1}", summary.total_distance),
                format!("{:.3}", summary.battery_consumed),
            ]);
        }
        println!("{table}");
    }

    if !dispatcher.backlog().is_empty() {
        info!(
            pending = dispatcher.backlog().len(),
            "orders left unscheduled"
        );
    }

    if args.deliver {
        dispatcher.deliver_trips()?;
        info!("all trips delivered");
    }

    Ok(())
}
