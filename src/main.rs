use anyhow::{Context, Result};
use clap::Parser;
use precios::cli::{formatters, Cli, Commands};
use precios::engine::PriceEngine;
use rust_decimal::Decimal;
use std::io::IsTerminal;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let stdout_is_tty = std::io::stdout().is_terminal();
    let disable_color = cli.no_color || !stdout_is_tty || cli.json;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_ansi(!disable_color)
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();
    if disable_color {
        colored::control::set_override(false);
    }

    let engine = PriceEngine::open(&cli.input_dir, &cli.config);

    match &cli.command {
        Commands::Reload => {
            let count = engine.reload();
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({"suppliers_loaded": count, "total_products": engine.total_products()})
                );
            } else {
                println!(
                    "Reloaded catalog: {count} supplier(s), {} product(s) total.",
                    engine.total_products()
                );
            }
        }

        Commands::Search { query, limit, supplier } => {
            engine.reload();
            let hits = engine.search(query, *limit, supplier.as_deref());
            let currency = engine.global_config().moneda;
            if cli.json {
                println!("{}", formatters::format_search_json(&hits));
            } else {
                print!("{}", formatters::format_search_table(&hits, &currency));
            }
        }

        Commands::Suppliers => {
            engine.reload();
            let suppliers = engine.list_suppliers();
            if cli.json {
                println!("{}", formatters::format_suppliers_json(&suppliers));
            } else {
                print!("{}", formatters::format_suppliers_table(&suppliers));
            }
        }

        Commands::Total => {
            engine.reload();
            let total = engine.total_products();
            if cli.json {
                println!("{}", serde_json::json!({"total_products": total}));
            } else {
                println!("{total} product(s) across the catalog.");
            }
        }

        Commands::UpdateMargin {
            supplier,
            markup,
            discount1,
            discount2,
        } => {
            let markup = parse_percentage(markup, "markup")?;
            let discount1 = parse_percentage(discount1, "discount1")?;
            let discount2 = parse_percentage(discount2, "discount2")?;
            engine
                .update_margin(supplier, markup, discount1, discount2)
                .with_context(|| format!("persisting margin update for supplier {supplier}"))?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({"supplier": supplier, "markup_pct": markup.to_string(), "discount1_pct": discount1.to_string(), "discount2_pct": discount2.to_string()})
                );
            } else {
                println!("Updated {supplier}: markup={markup}% discount1={discount1}% discount2={discount2}%");
            }
        }
    }

    Ok(())
}

fn parse_percentage(raw: &str, field: &str) -> Result<Decimal> {
    let value = Decimal::from_str(raw).with_context(|| format!("invalid {field} percentage: {raw:?}"))?;
    anyhow::ensure!(value >= Decimal::ZERO, "{field} percentage must be non-negative, got {value}");
    Ok(value)
}
