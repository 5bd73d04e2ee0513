//! CLI entry point for the warlock DPS simulator

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use warlock_sim_lib::{
    config::BuildConfig,
    minion::{MinionKind, MinionStats},
    simulation::{compare_builds, compare_builds_sequential},
    stats::SimSummary,
};

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "warlock-sim")]
#[command(version = "1.0")]
#[command(about = "Deterministic warlock DPS simulator", long_about = None)]
struct Args {
    /// Build configuration files (YAML or JSON). Several files run as a
    /// side-by-side comparison.
    #[arg(required = true)]
    configs: Vec<PathBuf>,

    /// Run comparison builds in parallel
    #[arg(short, long, default_value = "false")]
    parallel: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Show timing information
    #[arg(short, long, default_value = "false")]
    timing: bool,
}

fn main() {
    let args = Args::parse();

    let mut builds = Vec::with_capacity(args.configs.len());
    for path in &args.configs {
        match BuildConfig::from_file(path) {
            Ok(config) => builds.push((path.clone(), config)),
            Err(e) => {
                eprintln!("Error loading {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    let configs: Vec<BuildConfig> = builds.iter().map(|(_, c)| c.clone()).collect();
    let start = Instant::now();
    let summaries = if args.parallel {
        compare_builds(&configs)
    } else {
        compare_builds_sequential(&configs)
    };
    let elapsed = start.elapsed();

    match args.output {
        OutputFormat::Text => {
            for ((path, config), summary) in builds.iter().zip(&summaries) {
                print_text(path, config, summary);
            }
            if args.timing {
                println!();
                println!("--- Performance ---");
                println!("Total time: {:.3}s", elapsed.as_secs_f64());
                println!(
                    "Per build: {:.3}ms",
                    elapsed.as_secs_f64() * 1000.0 / builds.len() as f64
                );
            }
        }
        OutputFormat::Json => {
            let results: Vec<_> = builds
                .iter()
                .zip(&summaries)
                .map(|((path, config), summary)| {
                    serde_json::json!({
                        "config": path.display().to_string(),
                        "summary": summary,
                        "minion": minion_report(config),
                    })
                })
                .collect();
            let output = serde_json::json!({
                "builds": results,
                "elapsed_seconds": elapsed.as_secs_f64(),
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
    }
}

fn minion_report(config: &BuildConfig) -> Option<MinionStats> {
    let name = config.minion.as_deref()?;
    let kind = MinionKind::from_name(name)?;
    Some(MinionStats::derive(kind, &config.stats, &config.talents))
}

fn print_text(path: &PathBuf, config: &BuildConfig, summary: &SimSummary) {
    println!("=== {} ===", path.display());
    println!("Fight: {:.0}s, {:.0}ms latency", config.options.duration, config.options.latency);
    println!();
    println!("DPS: {:.1}", summary.dps);
    println!("Overall Damage: {:.0}", summary.overall_damage);
    println!("Active Time: {:.1}s", summary.active_time);
    println!("Mana Used: {:.0}", summary.total_mana_cost);
    println!();
    println!("--- Spells ---");
    for spell in &summary.spells {
        let s = &spell.statistics;
        println!(
            "{}: {} casts, {} hits (avg {:.0}), {} crits (avg {:.0}), {} ticks, {} tick crits, {} misses, {:.0} damage",
            spell.name,
            s.cast_count,
            s.hits.count,
            s.hits.average(),
            s.crits.count,
            s.crits.average(),
            s.tick_hits.count,
            s.tick_crits.count,
            s.misses.count,
            spell.overall_damage,
        );
    }
    if let Some(minion) = minion_report(config) {
        println!();
        println!("--- Minion ---");
        println!(
            "{:?}: {:.0} AP, {:.0} spell power, {:.1} melee DPS, {:.0} health, {:.0} mana",
            minion.kind, minion.attack_power, minion.spell_power, minion.melee_dps, minion.health, minion.mana,
        );
    }
    println!();
}
