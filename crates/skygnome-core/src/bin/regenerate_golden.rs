use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use skygnome_core::{Decoder, DecodedEvent, StopReason, listen, open_device};
use time::OffsetDateTime;
use time::macros::datetime;

/// Fixed wall clock so `received` and resolved start times are reproducible.
fn golden_clock() -> OffsetDateTime {
    datetime!(2024-03-10 20:00 UTC)
}

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let input = path.join("input.bin");
        if !input.exists() {
            continue;
        }
        let output = path.join("expected_events.json");
        regenerate_one(&input, &output)?;
    }

    Ok(())
}

fn regenerate_one(input: &Path, output: &Path) -> Result<(), String> {
    let mut decoder = Decoder::new().with_clock(golden_clock);
    let mut events: Vec<DecodedEvent> = Vec::new();
    let mut failure = None;
    let summary = listen(
        || open_device(input),
        &mut decoder,
        |result| {
            match result {
                Ok(event) => events.push(event),
                Err(err) => failure = Some(err.to_string()),
            }
            ControlFlow::Continue(())
        },
    );
    if let Some(err) = failure {
        return Err(format!("decoding failed for {}: {}", input.display(), err));
    }
    if summary.reason != StopReason::EndOfStream {
        return Err(format!("decoding of {} stopped early", input.display()));
    }

    let mut json = serde_json::to_string_pretty(&events)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    json.push('\n');
    fs::write(output, json)
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}
