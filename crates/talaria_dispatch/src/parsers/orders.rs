use std::path::Path;

use anyhow::Context;

use crate::problem::order::{Order, OrderBuilder};

/// Reads an order feed: one comma-separated record per non-empty line,
/// `order_id,timestamp,zone,weight,customer_id,subscriber,fragile,hazardous,perishable`,
/// flags spelled as literal `TRUE`/`FALSE` tokens.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Order>, anyhow::Error> {
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading order feed {}", path.as_ref().display()))?;
    parse(&text)
}

pub fn parse(text: &str) -> Result<Vec<Order>, anyhow::Error> {
    let mut orders = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let order =
            parse_record(line).with_context(|| format!("order feed line {}", line_no + 1))?;
        orders.push(order);
    }

    Ok(orders)
}

fn parse_record(line: &str) -> Result<Order, anyhow::Error> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 9 {
        anyhow::bail!("expected 9 fields, found {}", fields.len());
    }

    let mut builder = OrderBuilder::default();
    builder
        .set_id(fields[0].parse().context("order_id")?)
        .set_timestamp(fields[1].parse().context("timestamp")?)
        .set_zone(fields[2].parse().context("zone")?)
        .set_weight_grams(fields[3].parse().context("weight")?)
        .set_customer_id(fields[4].parse().context("customer_id")?)
        .set_subscriber(parse_flag(fields[5])?)
        .set_fragile(parse_flag(fields[6])?)
        .set_hazardous(parse_flag(fields[7])?)
        .set_perishable(parse_flag(fields[8])?);

    Ok(builder.build())
}

fn parse_flag(token: &str) -> Result<bool, anyhow::Error> {
    match token {
        "TRUE" => Ok(true),
        "FALSE" => Ok(false),
        other => anyhow::bail!("expected TRUE or FALSE, found {other:?}"),
    }
}
