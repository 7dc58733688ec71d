use std::io::{BufRead, Write};

use massing_studio_lib::command::{execute_json, CommandResponse};
use massing_studio_lib::fixtures;
use massing_studio_lib::harness::HeadlessStudio;
use massing_studio_lib::state::StudioSettings;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "massing_studio=info,massing_studio_lib=info".into()),
        )
        .init();

    let mut studio = HeadlessStudio::with_settings(StudioSettings::load());
    apply_startup_args(&mut studio);
    tracing::info!(
        masses = studio.mass_count(),
        endpoint = %studio.settings.generator.endpoint,
        "massing studio ready, reading commands from stdin"
    );

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {e}");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        studio.expire_notice();
        let response = execute_json(&mut studio, line).unwrap_or_else(|e| CommandResponse {
            success: false,
            error: Some(e),
            data: None,
        });
        if !write_response(&mut stdout, &response) {
            break;
        }

        // One request at a time: hold the shell until the layout lands.
        if studio.generation.is_busy() {
            let outcome = studio.wait_generation();
            tracing::info!("generation finished: {outcome:?}");
        }
    }
}

fn write_response(out: &mut impl Write, response: &CommandResponse) -> bool {
    let json = match serde_json::to_string(response) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to encode response: {e}");
            return true;
        }
    };
    if let Err(e) = writeln!(out, "{json}").and_then(|_| out.flush()) {
        tracing::error!("Failed to write response: {e}");
        return false;
    }
    true
}

/// `--layout <path>` loads a layout file, `--demo` loads a sample layout.
fn apply_startup_args(studio: &mut HeadlessStudio) {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--layout" if i + 1 < args.len() => {
                let path = &args[i + 1];
                match std::fs::read_to_string(path) {
                    Ok(json) => match studio.ingest_layout_json(&json) {
                        Ok(count) => tracing::info!("Loaded layout from {path} ({count} masses)"),
                        Err(e) => tracing::error!("Failed to load layout from {path}: {e}"),
                    },
                    Err(e) => tracing::error!("Failed to read layout file {path}: {e}"),
                }
                i += 1;
            }
            "--demo" => {
                if let Err(e) = studio
                    .controller
                    .ingest_generated_layout(&fixtures::podium_slab_layout())
                {
                    tracing::error!("Failed to load demo layout: {e}");
                }
            }
            other => tracing::warn!("Ignoring unknown argument {other}"),
        }
        i += 1;
    }
}
