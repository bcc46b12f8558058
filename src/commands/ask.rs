//! Ask command - answer a question from the journal

use anyhow::{Context, Result};
use colored::Colorize;

use super::{truncate, Workspace};

pub fn run(workspace: &Workspace, question: &str, owner: i64, json: bool) -> Result<()> {
    let engine = workspace.engine()?;
    engine.on_startup();

    let result = engine
        .answer_question(question, owner)
        .context("Failed to answer question")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "answer": result.summary(),
                "headline_sentiment": result.headline_sentiment,
                "candidates": result.candidates,
                "generation": result.generation,
            }))?
        );
        return Ok(());
    }

    if result.is_insufficient_data() {
        println!(
            "{} Not enough journal entries yet. Run {} or write a few entries first.",
            "!".yellow().bold(),
            "kairo seed".cyan()
        );
        return Ok(());
    }

    println!(
        "{} {} (mood: {})",
        "→".dimmed(),
        question.cyan(),
        result.headline_sentiment.bold()
    );
    println!();

    if result.candidates.is_empty() {
        println!("{} No related entries found", "→".dimmed());
        return Ok(());
    }

    for (i, candidate) in result.candidates.iter().enumerate() {
        let label = candidate.sentiment_label.as_deref().unwrap_or("untagged");
        println!(
            "{}. [{}] {} {}",
            (i + 1).to_string().bold(),
            format!("{:.3}", candidate.distance).dimmed(),
            candidate.created_at.format("%Y-%m-%d").to_string().cyan(),
            label.yellow()
        );
        println!("   {}", truncate(&candidate.text, 100));
        println!();
    }

    Ok(())
}
