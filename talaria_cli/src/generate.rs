use std::path::PathBuf;

use clap::Args;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::info;

#[derive(Args)]
pub struct GenerateArgs {
    /// Number of zones, including the warehouse
    #[arg(long, default_value_t = 12)]
    zones: usize,

    /// Number of orders
    #[arg(long, default_value_t = 100)]
    orders: usize,

    /// RNG seed, for reproducible datasets
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Output file for the distance matrix
    #[arg(long)]
    matrix_out: PathBuf,

    /// Output file for the order feed
    #[arg(long)]
    orders_out: PathBuf,
}

pub fn run(args: GenerateArgs) -> Result<(), anyhow::Error> {
    if args.zones < 2 {
        anyhow::bail!("need at least the warehouse and one delivery zone");
    }

    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut rows = vec![vec![0u32; args.zones]; args.zones];
    for a in 0..args.zones {
        for b in (a + 1)..args.zones {
            let distance = rng.random_range(3..=40);
            rows[a][b] = distance;
            rows[b][a] = distance;
        }
    }

    let mut matrix_text = format!("{}\n", args.zones);
    for row in &rows {
        let cells: Vec<String> = row.iter().map(u32::to_string).collect();
        matrix_text.push_str(&cells.join(","));
        matrix_text.push('\n');
    }
    std::fs::write(&args.matrix_out, matrix_text)?;

    let mut feed = String::new();
    for id in 0..args.orders {
        let zone = rng.random_range(1..args.zones);
        let weight: u32 = rng.random_range(50..1500);
        let customer = rng.random_range(1..=(args.orders.max(4) / 2));
        let subscriber = rng.random_bool(0.3);
        let fragile = rng.random_bool(0.1);
        let hazardous = !fragile && rng.random_bool(0.05);
        let perishable = rng.random_bool(0.2);

        feed.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            id + 1,
            id,
            zone,
            weight,
            customer,
            token(subscriber),
            token(fragile),
            token(hazardous),
            token(perishable),
        ));
    }
    std::fs::write(&args.orders_out, feed)?;

    info!(
        zones = args.zones,
        orders = args.orders,
        seed = args.seed,
        "wrote synthetic dataset"
    );

    Ok(())
}

fn token(flag: bool) -> &'static str {
    if flag { "TRUE" } else { "FALSE" }
}
