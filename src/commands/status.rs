//! Status command - index health after a startup build

use anyhow::Result;
use colored::Colorize;

use super::Workspace;

pub fn run(workspace: &Workspace, json: bool) -> Result<()> {
    let engine = workspace.engine()?;
    engine.on_startup();
    let status = engine.status();

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Index Status".bold());
    println!();
    println!(
        "  {} Generation {}",
        "→".dimmed(),
        status.generation.to_string().cyan()
    );
    println!(
        "  {} {} vectors ({} dimensions)",
        "→".dimmed(),
        status.vector_count.to_string().cyan(),
        status.dimension
    );
    if status.skipped_empty > 0 {
        println!(
            "  {} {} entries without text",
            "→".dimmed(),
            status.skipped_empty
        );
    }
    println!(
        "  {} Built: {}",
        "→".dimmed(),
        status.built_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  {} Journal root: {}",
        "→".dimmed(),
        workspace.paths.root.display()
    );
    println!(
        "  {} Config: k={} max_results={}",
        "→".dimmed(),
        workspace.config.k_candidates,
        workspace.config.max_results
    );
    if let Some(error) = &status.last_error {
        println!("  {} Last build failed: {}", "✗".red(), error);
    }

    Ok(())
}
