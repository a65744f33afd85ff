//! `lotscout recommend`: budget + usage + brand preference -> up to three picks.

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use serde_json::json;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::cli::{AppContext, OutputFormat, RecommendArgs};
use crate::cli_ext::session::{format_amount, inventory_path, open_inventory, print_json};
use crate::core::engine::{Engine, Query, RecommendOptions};
use crate::core::selector::{BudgetWindow, Recommendation, Role};
use crate::infra::config::{Config, load_policy};

#[derive(Tabled)]
struct RecommendationRow
{
    #[tabled(rename = "#")]
    rank: usize,
    role: String,
    model: String,
    brand: String,
    cost: String,
    score: i64,
    spread: String,
}

/// Merge config defaults with command-line overrides
pub fn resolve_options(
    args: &RecommendArgs,
    config: &Config,
) -> RecommendOptions
{
    let mut options = config.recommend_options();
    if let Some(ratio) = args.floor_ratio
    {
        options.floor_ratio = ratio;
    }
    options.strict |= args.strict;
    options
}

#[instrument(skip_all, fields(budget = args.budget, usage = %args.usage))]
pub fn run(
    args: RecommendArgs,
    config: &Config,
    ctx: &AppContext,
) -> Result<()>
{
    // Request errors surface before any file is touched
    let query = Query::parse(args.budget, &args.usage, &args.brand)?;
    let options = resolve_options(&args, config);
    options.validate()?;

    let path = inventory_path(&args.inventory, config);
    let window = BudgetWindow::new(query.budget_max(), options.floor_ratio);

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!(
                "{}",
                "DRY RUN: would recommend from:".if_supports_color(Stream::Stdout, |t| t.yellow())
            );
            println!("  Inventory: {}", path.display());
            println!("  Window: {} - {}", format_amount(window.min as f64), format_amount(window.max as f64));
            println!("  Usage: {}", query.usage);
            println!(
                "  Preferred brand: {}",
                query
                    .preferred_brand
                    .map_or_else(|| "none".to_string(), |b| b.to_string())
            );
            println!("  Strict: {}", options.strict);
        }
        return Ok(());
    }

    let engine = Engine::new(load_policy(config)?, options)?;
    let (inventory, stats) = open_inventory(&path, args.format, ctx)?;
    let picks = engine.recommend(&inventory, &query)?;

    match args.format
    {
        OutputFormat::Json => print_json(&json!({
            "query": query,
            "window": window,
            "strict": options.strict,
            "inventory": { "path": path.display().to_string(), "stats": stats },
            "recommendations": picks,
        })),
        OutputFormat::Table =>
        {
            if picks.is_empty()
            {
                print_no_match(&query, ctx);
                return Ok(());
            }
            println!("{}", Table::new(rows(&picks)));
            Ok(())
        }
        OutputFormat::Text =>
        {
            print_text(&query, &picks, ctx);
            Ok(())
        }
    }
}

fn rows(picks: &[Recommendation]) -> Vec<RecommendationRow>
{
    picks
        .iter()
        .enumerate()
        .map(|(i, r)| RecommendationRow {
            rank: i + 1,
            role: r
                .role
                .to_string(),
            model: r
                .candidate
                .record
                .model_name
                .clone(),
            brand: r
                .candidate
                .brand()
                .to_string(),
            cost: format_amount(
                r.candidate
                    .record
                    .wholesale_price as f64,
            ),
            score: r
                .candidate
                .match_score,
            spread: format_amount(
                r.candidate
                    .spread(),
            ),
        })
        .collect()
}

fn print_no_match(
    query: &Query,
    ctx: &AppContext,
)
{
    if ctx.quiet
    {
        return;
    }
    println!(
        "{} No listings fit {}萬 for {}.",
        "∅".if_supports_color(Stream::Stdout, |t| t.yellow()),
        query.budget_limit,
        query.usage
    );
}

fn print_text(
    query: &Query,
    picks: &[Recommendation],
    ctx: &AppContext,
)
{
    if picks.is_empty()
    {
        print_no_match(query, ctx);
        return;
    }

    if !ctx.quiet
    {
        println!(
            "{} {}萬 · {} · preferred {}",
            "Recommendations for".if_supports_color(Stream::Stdout, |t| t.bold()),
            query.budget_limit,
            query.usage,
            query
                .preferred_brand
                .map_or_else(|| "none".to_string(), |b| b.to_string())
        );
    }

    for (i, pick) in picks
        .iter()
        .enumerate()
    {
        let c = &pick.candidate;
        let role = format!("[{}]", pick.role);
        let role = match pick.role
        {
            Role::PrimaryRecommendation => role
                .if_supports_color(Stream::Stdout, |t| t.green())
                .to_string(),
            Role::StrongCompetitor => role
                .if_supports_color(Stream::Stdout, |t| t.cyan())
                .to_string(),
            Role::CrossSegmentComparison => role
                .if_supports_color(Stream::Stdout, |t| t.magenta())
                .to_string(),
            Role::PopularAlternative => role
                .if_supports_color(Stream::Stdout, |t| t.blue())
                .to_string(),
        };

        println!(
            "{:>2}. {} {}  cost {}  score {}  est. spread {}",
            i + 1,
            role,
            c.record
                .model_name
                .if_supports_color(Stream::Stdout, |t| t.bold()),
            format_amount(c.record.wholesale_price as f64),
            c.match_score,
            format_amount(c.spread())
        );
    }
}
