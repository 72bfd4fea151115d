use crate::error::{CliError, Result};
use crate::input::{load_config, load_result};
use crate::ui;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::runtime::Runtime;
use triage::{CategoryKey, RevealFrame, RevealScheduler, TriageCategories};

pub fn execute(result_path: &str, config_path: &str) -> Result<()> {
    let result = load_result(result_path)?;
    let config = load_config(config_path)?;

    let rt = Runtime::new()
        .map_err(|e| CliError::Other(format!("Failed to create async runtime: {}", e)))?;

    let frame = rt.block_on(async {
        let scheduler = RevealScheduler::from_config(&config.reveal);
        let mut frames = scheduler.subscribe();
        tracing::debug!(
            delay_ms = scheduler.delay().as_millis() as u64,
            "Waiting for percentage reveal"
        );
        scheduler.submit(&result.categories);
        frames
            .wait_for(|frame| frame.revealed)
            .await
            .map(|frame| *frame)
            .map_err(|e| CliError::Other(format!("Reveal was interrupted: {}", e)))
    })?;

    ui::section_header(&result.headline);
    render_breakdown(&result.categories, &frame)?;

    if let Some(dominant) = frame.dominant {
        println!();
        println!(
            "{} {}",
            "Most likely:".bold(),
            result.categories[dominant].label.bold()
        );
        println!("{}", dominant.description().dimmed());
    }

    println!();
    ui::disclaimer();
    Ok(())
}

fn render_breakdown(categories: &TriageCategories, frame: &RevealFrame) -> Result<()> {
    let width = categories
        .iter()
        .map(|(_, category)| category.label.len())
        .max()
        .unwrap_or(0);

    for key in CategoryKey::CANONICAL_ORDER {
        let color = if frame.dominant == Some(key) {
            "green"
        } else {
            "white"
        };
        let template = format!(
            "{{prefix:>{}}} [{{bar:30.{}/black}}] {{pos:>3}}%",
            width, color
        );
        let style = ProgressStyle::with_template(&template)
            .map_err(|e| CliError::Other(format!("Invalid progress template: {}", e)))?
            .progress_chars("█▉ ");

        let bar = ProgressBar::new(100).with_style(style);
        bar.set_prefix(categories[key].label.clone());
        bar.set_position(frame.rounded(key).clamp(0, 100) as u64);
        bar.abandon();
    }

    Ok(())
}
