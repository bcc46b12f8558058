//! Seed command - load the demo journal

use anyhow::Result;
use colored::Colorize;

use super::Workspace;
use kairo_recall::core::seed::seed_demo_journal;

pub fn run(workspace: &Workspace, owner: i64, json: bool) -> Result<()> {
    let store = workspace.open_store()?;
    let inserted = seed_demo_journal(&store, owner)?;
    let total = store.count()?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "owner": owner,
                "inserted": inserted,
                "total_entries": total,
                "db_path": workspace.db_path.display().to_string(),
            })
        );
    } else {
        println!(
            "{} Seeded {} demo entries for owner {}",
            "✓".green().bold(),
            inserted.to_string().cyan(),
            owner
        );
        println!(
            "  {} Journal: {} ({} entries)",
            "→".dimmed(),
            workspace.db_path.display(),
            total
        );
    }

    Ok(())
}
