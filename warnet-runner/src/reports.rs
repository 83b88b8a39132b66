use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;
use warnet_model::{SimulationRun, SimulationStats, Strategy, Termination};

use crate::runs::SeedRuns;
use crate::util::percent_change;

const CSV_HEADER: &str = "seed,doctrine,turn,network_output,total_workers,reserve_workers,\
destroyed_nodes,damaged_nodes,destroyed_edges,damaged_edges,workers_killed,\
avg_node_capacity,avg_edge_capacity,avg_workers_per_node";

fn termination_label(termination: Termination) -> String {
    match termination {
        Termination::OutputCollapsed { turn } => format!("output collapsed on turn {turn}"),
        Termination::TurnLimit => "turn limit reached".to_string(),
    }
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[SeedRuns],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Doctrine Results".bright_cyan().bold())?;
    writeln!(out, "{}", "===================".cyan())?;

    for seed_runs in results {
        writeln!(out)?;
        writeln!(out, "{}", format!("Seed {}", seed_runs.seed).bold())?;
        for run in &seed_runs.runs {
            write_console_run(out, run)?;
        }
        if let (Some(precision), Some(area)) = (
            seed_runs.get(Strategy::Precision),
            seed_runs.get(Strategy::Area),
        ) {
            write_console_comparison(out, precision, area)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Total time: {total_duration:?}")?;
    Ok(())
}

fn write_console_run(out: &mut dyn Write, run: &SimulationRun) -> Result<()> {
    let label = match run.strategy {
        Strategy::Precision => "🎯 Precision bombing".bright_blue().bold(),
        Strategy::Area => "💥 Area bombing".bright_red().bold(),
    };
    writeln!(out, "{label}")?;
    let Some(last) = run.final_stats() else {
        writeln!(out, "   No turns recorded.")?;
        return Ok(());
    };

    writeln!(
        out,
        "   Turns run: {} ({})",
        run.turns_run(),
        termination_label(run.termination)
    )?;
    writeln!(
        out,
        "   Network output: {}",
        format!("{:.2}", last.network_output).green()
    )?;
    writeln!(
        out,
        "   Workers: {} active, {} reserve, {} killed",
        last.total_workers,
        last.reserve_workers,
        last.workers_killed.to_string().red()
    )?;
    writeln!(
        out,
        "   Nodes: {} destroyed, {} damaged (avg capacity {:.3})",
        last.destroyed_nodes, last.damaged_nodes, last.avg_node_capacity
    )?;
    writeln!(
        out,
        "   Edges: {} destroyed, {} damaged (avg capacity {:.3})",
        last.destroyed_edges, last.damaged_edges, last.avg_edge_capacity
    )?;
    writeln!(out, "   Avg workers per node: {:.2}", last.avg_workers_per_node)?;
    if last.endpoint_outputs.is_empty() {
        writeln!(out, "   Endpoint outputs: none")?;
    } else {
        writeln!(out, "   Endpoint outputs:")?;
        for (endpoint, value) in &last.endpoint_outputs {
            writeln!(out, "     • node {endpoint}: {value:.2}")?;
        }
    }
    Ok(())
}

fn write_console_comparison(
    out: &mut dyn Write,
    precision: &SimulationRun,
    area: &SimulationRun,
) -> Result<()> {
    let (Some(p), Some(a)) = (precision.final_stats(), area.final_stats()) else {
        return Ok(());
    };
    writeln!(out, "{}", "⚖️  Comparison".bright_yellow().bold())?;
    match percent_change(p.network_output, a.network_output) {
        Some(change) => writeln!(
            out,
            "   Area output vs precision: {change:+.1}% ({:.2} vs {:.2})",
            a.network_output, p.network_output
        )?,
        None => writeln!(
            out,
            "   Area output vs precision: {:.2} vs {:.2}",
            a.network_output, p.network_output
        )?,
    }
    writeln!(
        out,
        "   Turns survived: precision {}, area {}",
        precision.turns_run(),
        area.turns_run()
    )?;
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[SeedRuns]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[SeedRuns]) -> Result<()> {
    writeln!(out, "# Warfare Network Doctrine Results\n")?;
    writeln!(out, "## Summary\n")?;
    writeln!(
        out,
        "| Seed | Doctrine | Turns | Termination | Final output | Active workers | Reserve | Killed | Destroyed nodes | Destroyed edges |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|---|---|---|")?;
    for seed_runs in results {
        for run in &seed_runs.runs {
            let Some(summary) = run.summary() else {
                continue;
            };
            writeln!(
                out,
                "| {} | {} | {} | {} | {:.2} | {} | {} | {} | {} | {} |",
                seed_runs.seed,
                summary.strategy,
                summary.turns_run,
                termination_label(summary.termination),
                summary.final_output,
                summary.active_workers,
                summary.reserve_workers,
                summary.workers_killed,
                summary.destroyed_nodes,
                summary.destroyed_edges
            )?;
        }
    }
    Ok(())
}

/// One row per turn per doctrine per seed.
pub fn generate_csv_report(out: &mut dyn Write, results: &[SeedRuns]) -> Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for seed_runs in results {
        for run in &seed_runs.runs {
            for stats in &run.stats {
                write_csv_row(out, seed_runs.seed, run.strategy, stats)?;
            }
        }
    }
    Ok(())
}

fn write_csv_row(
    out: &mut dyn Write,
    seed: u64,
    strategy: Strategy,
    stats: &SimulationStats,
) -> Result<()> {
    writeln!(
        out,
        "{seed},{strategy},{},{:.6},{},{},{},{},{},{},{},{:.6},{:.6},{:.6}",
        stats.turn,
        stats.network_output,
        stats.total_workers,
        stats.reserve_workers,
        stats.destroyed_nodes,
        stats.damaged_nodes,
        stats.destroyed_edges,
        stats.damaged_edges,
        stats.workers_killed,
        stats.avg_node_capacity,
        stats.avg_edge_capacity,
        stats.avg_workers_per_node
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use warnet_model::{SimulationConfig, run_simulation};

    fn sample() -> Vec<SeedRuns> {
        let base = SimulationConfig::new(12, 30, 10).with_max_turns(5).with_seed(8);
        let runs = Strategy::ALL
            .iter()
            .map(|&s| run_simulation(base.clone().with_strategy(s)).unwrap())
            .collect();
        vec![SeedRuns { seed: 8, runs }]
    }

    fn render(f: impl FnOnce(&mut dyn Write) -> Result<()>) -> String {
        let mut buf: Vec<u8> = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn csv_has_one_row_per_turn() {
        let results = sample();
        let text = render(|out| generate_csv_report(out, &results));
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        let expected: usize = results[0].runs.iter().map(SimulationRun::turns_run).sum();
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), expected);
        assert!(rows[0].starts_with("8,precision,0,"));
        let columns = CSV_HEADER.split(',').count();
        assert!(rows.iter().all(|row| row.split(',').count() == columns));
    }

    #[test]
    fn json_report_round_trips_into_values() {
        let results = sample();
        let text = render(|out| generate_json_report(out, &results));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["seed"], 8);
        assert_eq!(value[0]["runs"][1]["strategy"], "area");
        assert!(value[0]["runs"][0]["stats"].is_array());
    }

    #[test]
    fn markdown_lists_every_doctrine() {
        let results = sample();
        let text = render(|out| generate_markdown_report(out, &results));
        assert!(text.starts_with("# Warfare Network Doctrine Results"));
        assert!(text.contains("| 8 | precision |"));
        assert!(text.contains("| 8 | area |"));
    }

    #[test]
    fn console_includes_endpoint_outputs_and_comparison() {
        let results = sample();
        let text = render(|out| generate_console_report(out, &results, Duration::from_millis(5)));
        assert!(text.contains("Seed 8"));
        assert!(text.contains("Turns run:"));
        assert!(text.contains("Endpoint outputs"));
        assert!(text.contains("Turns survived: precision"));
    }

    #[test]
    fn termination_labels_are_readable() {
        assert_eq!(
            termination_label(Termination::OutputCollapsed { turn: 4 }),
            "output collapsed on turn 4"
        );
        assert_eq!(termination_label(Termination::TurnLimit), "turn limit reached");
    }
}
