//! Index command - rebuild the retrieval index from the journal

use anyhow::Result;
use colored::Colorize;

use super::Workspace;
use kairo_recall::RebuildOutcome;

pub fn run(workspace: &Workspace, json: bool) -> Result<()> {
    let engine = workspace.engine()?;

    if !json {
        println!("{} Building retrieval index...", "→".dimmed());
    }

    let outcome = engine.rebuild_index()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        RebuildOutcome::Published {
            generation,
            stats,
            duration_ms,
        } => {
            println!();
            println!(
                "{} Indexed {} entries in {:.2}s (generation {})",
                "✓".green().bold(),
                stats.indexed.to_string().cyan(),
                duration_ms as f64 / 1000.0,
                generation
            );
            if stats.skipped_empty > 0 {
                println!(
                    "  {} {} entries skipped (no text)",
                    "→".dimmed(),
                    stats.skipped_empty
                );
            }
            if stats.skipped_duplicate > 0 {
                println!(
                    "  {} {} duplicate entries skipped",
                    "✗".red(),
                    stats.skipped_duplicate
                );
            }
            println!(
                "  {} Journal: {}",
                "→".dimmed(),
                workspace.db_path.display()
            );
        }
        RebuildOutcome::Coalesced { current_generation } => {
            println!(
                "{} Rebuild already running; generation {} is current",
                "!".yellow().bold(),
                current_generation
            );
        }
    }

    Ok(())
}
