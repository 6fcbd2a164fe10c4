use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use famcal_core::config::Config;
use famcal_core::event::{Category, Owner};
use famcal_core::ids::UuidTempIds;
use famcal_core::import::{self, ImportDefaults, ImportFile};
use famcal_core::store::EventStore;
use famcal_core::sync::SyncController;
use owo_colors::OwoColorize;

use crate::render;

pub async fn run(
    config: &Config,
    files: Vec<PathBuf>,
    text: Option<String>,
    owner: Option<Owner>,
    category: Option<Category>,
) -> Result<()> {
    let defaults = ImportDefaults {
        category: category.unwrap_or_default(),
        owner: owner.unwrap_or(config.default_owner),
    };
    let mut ids = UuidTempIds;

    let report = if let Some(text) = text {
        import::import_text(&text, Local::now().naive_local(), &defaults, &mut ids)
    } else {
        if files.is_empty() {
            bail!("Nothing to import: pass files or --text");
        }
        let mut inputs = Vec::new();
        for path in &files {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read {}", path.display()))?;
            inputs.push(ImportFile {
                name: display_name(path),
                content,
            });
        }
        import::import_files(&inputs, &defaults, &mut ids)
    };

    for name in &report.skipped {
        println!(
            "{}",
            format!("Skipping unsupported file: {name} (use .ics or .csv)").yellow()
        );
    }
    for failure in &report.failures {
        println!("{}", format!("{}: {}", failure.file, failure.reason).red());
    }
    report.ensure_not_empty()?;

    let mut sync = SyncController::new(EventStore::new(&config.server_url));

    let spinner = render::create_spinner(format!(
        "Importing {}",
        render::count_events(report.events.len())
    ));
    let result = sync.import_batch(&report.events).await;
    spinner.finish_and_clear();

    let count = result?;
    println!(
        "{}",
        format!("Imported {}", render::count_events(count)).green()
    );

    Ok(())
}

/// Just the file name; the parsers report it back in failures.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
