//! `match`, `appraise` and `classify`: single-record lookups against the
//! inventory or the brand table.

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use serde_json::json;
use tabled::{Table, Tabled};

use crate::cli::{AppContext, AppraiseArgs, ClassifyArgs, MatchArgs, OutputFormat};
use crate::cli_ext::session::{format_amount, inventory_path, open_inventory, print_json};
use crate::core::appraise::{Appraisal, appraise, asking_price_units};
use crate::core::brand::{Brand, classify_brand};
use crate::core::fuzzy::{FuzzyHit, fuzzy_match, fuzzy_rank};
use crate::core::inventory::normalize_model_name;
use crate::infra::config::Config;

#[derive(Tabled)]
struct MatchRow
{
    model: String,
    brand: String,
    cost: String,
    hits: usize,
}

#[derive(Tabled)]
struct ClassifyRow
{
    name: String,
    brand: String,
}

fn no_match(
    text: &str,
    ctx: &AppContext,
)
{
    if !ctx.quiet
    {
        println!(
            "{} No inventory match for '{}'",
            "∅".if_supports_color(Stream::Stdout, |t| t.yellow()),
            text
        );
    }
}

pub fn run_match(
    args: MatchArgs,
    config: &Config,
    ctx: &AppContext,
) -> Result<()>
{
    let text = args
        .text
        .join(" ");
    let path = inventory_path(&args.inventory, config);

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!("DRY RUN: would match '{}' against {}", text, path.display());
        }
        return Ok(());
    }

    let (inventory, _) = open_inventory(&path, args.format, ctx)?;

    let hits: Vec<FuzzyHit<'_>> = if args.all
    {
        fuzzy_rank(&inventory, &text)
    }
    else
    {
        fuzzy_match(&inventory, &text)
            .map(|record| FuzzyHit::of(record, &text))
            .into_iter()
            .collect()
    };

    match args.format
    {
        OutputFormat::Json => print_json(&json!({
            "query": text,
            "matches": hits,
        })),
        _ if hits.is_empty() =>
        {
            no_match(&text, ctx);
            Ok(())
        }
        OutputFormat::Table =>
        {
            let rows: Vec<MatchRow> = hits
                .iter()
                .map(|h| MatchRow {
                    model: h
                        .record
                        .model_name
                        .clone(),
                    brand: h
                        .record
                        .brand
                        .to_string(),
                    cost: format_amount(
                        h.record
                            .wholesale_price as f64,
                    ),
                    hits: h.hits,
                })
                .collect();
            println!("{}", Table::new(rows));
            Ok(())
        }
        OutputFormat::Text =>
        {
            for h in &hits
            {
                print_record_line(
                    &h.record
                        .model_name,
                    h.record
                        .brand,
                    h.record
                        .wholesale_price,
                    Some(h.hits),
                );
            }
            Ok(())
        }
    }
}

fn print_record_line(
    model_name: &str,
    brand: Brand,
    wholesale_price: u64,
    hits: Option<usize>,
)
{
    let suffix = hits.map_or_else(String::new, |n| format!("  ({n} token hits)"));
    println!(
        "{}  {}  cost {}{}",
        model_name.if_supports_color(Stream::Stdout, |t| t.bold()),
        brand.if_supports_color(Stream::Stdout, |t| t.cyan()),
        format_amount(wholesale_price as f64),
        suffix
    );
}

pub fn run_appraise(
    args: AppraiseArgs,
    config: &Config,
    ctx: &AppContext,
) -> Result<()>
{
    asking_price_units(args.price)?;

    let text = args
        .text
        .join(" ");
    let path = inventory_path(&args.inventory, config);

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!(
                "DRY RUN: would appraise '{}' at {}萬 against {}",
                text,
                args.price,
                path.display()
            );
        }
        return Ok(());
    }

    let (inventory, _) = open_inventory(&path, args.format, ctx)?;
    let Some(record) = fuzzy_match(&inventory, &text)
    else
    {
        return match args.format
        {
            OutputFormat::Json => print_json(&json!({ "query": text, "appraisal": null })),
            _ =>
            {
                no_match(&text, ctx);
                Ok(())
            }
        };
    };

    let appraisal = appraise(record, args.price)?;

    match args.format
    {
        OutputFormat::Json => print_json(&json!({
            "query": text,
            "appraisal": appraisal,
        })),
        OutputFormat::Table =>
        {
            println!("{}", Table::new(appraisal_rows(&appraisal)));
            Ok(())
        }
        OutputFormat::Text =>
        {
            print_appraisal(&appraisal);
            Ok(())
        }
    }
}

#[derive(Tabled)]
struct FieldRow
{
    field: &'static str,
    value: String,
}

fn appraisal_rows(a: &Appraisal) -> Vec<FieldRow>
{
    vec![
        FieldRow { field: "model", value: a.model_name.clone() },
        FieldRow { field: "brand", value: a.brand.to_string() },
        FieldRow { field: "cost floor", value: format_amount(a.wholesale_price as f64) },
        FieldRow { field: "asking", value: format_amount(a.asking_price as f64) },
        FieldRow { field: "margin", value: format_amount(a.margin as f64) },
        FieldRow { field: "margin %", value: format!("{:.1}", a.margin_ratio * 100.0) },
        FieldRow { field: "est. retail", value: format_amount(a.estimated_market_price) },
        FieldRow { field: "above retail", value: a.above_market.to_string() },
    ]
}

fn print_appraisal(a: &Appraisal)
{
    print_record_line(&a.model_name, a.brand, a.wholesale_price, None);

    let margin = format!("{} ({:+.1}%)", format_amount(a.margin as f64), a.margin_ratio * 100.0);
    let margin = if a.margin >= 0
    {
        margin
            .if_supports_color(Stream::Stdout, |t| t.green())
            .to_string()
    }
    else
    {
        margin
            .if_supports_color(Stream::Stdout, |t| t.red())
            .to_string()
    };

    println!("  asking {}  margin over cost {}", format_amount(a.asking_price as f64), margin);
    println!("  est. retail {}", format_amount(a.estimated_market_price));
    if a.above_market
    {
        println!(
            "  {}",
            "asking price is above estimated retail".if_supports_color(Stream::Stdout, |t| t.yellow())
        );
    }
}

pub fn run_classify(
    args: ClassifyArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let results: Vec<(String, Option<_>)> = args
        .names
        .iter()
        .map(|n| (normalize_model_name(n), classify_brand(n)))
        .collect();

    match args.format
    {
        OutputFormat::Json =>
        {
            let items: Vec<_> = results
                .iter()
                .map(|(name, brand)| json!({ "model_name": name, "brand": brand }))
                .collect();
            print_json(&json!(items))
        }
        OutputFormat::Table =>
        {
            let rows: Vec<ClassifyRow> = results
                .into_iter()
                .map(|(name, brand)| ClassifyRow {
                    name,
                    brand: brand.map_or_else(|| "-".to_string(), |b| b.to_string()),
                })
                .collect();
            println!("{}", Table::new(rows));
            Ok(())
        }
        OutputFormat::Text =>
        {
            for (name, brand) in results
            {
                match brand
                {
                    Some(b) => println!("{name} → {}", b.if_supports_color(Stream::Stdout, |t| t.cyan())),
                    None if !ctx.quiet => println!(
                        "{name} → {}",
                        "unclassified".if_supports_color(Stream::Stdout, |t| t.dimmed())
                    ),
                    None => {}
                }
            }
            Ok(())
        }
    }
}
