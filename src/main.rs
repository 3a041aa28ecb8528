mod components;
mod engine;
mod host;

use crate::host::FrameRequest;
use log::info;
use std::io::Read;

fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();
    env_logger::init();

    let (raw, source) = read_request()?;
    info!("frame request loaded from {source}");

    let request = FrameRequest::from_json(&raw)
        .map_err(|e| anyhow::anyhow!("invalid frame request ({source}): {e}"))?;
    let report = host::run_frame(&request);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Frame request JSON comes from the first positional argument, the
/// `BRACKETFIT_FRAME_JSON` env var, or stdin, in that order.
fn read_request() -> anyhow::Result<(String, String)> {
    if let Some(path) = std::env::args().nth(1) {
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("could not read {path}: {e}"))?;
        return Ok((raw, path));
    }

    if let Ok(path) = std::env::var("BRACKETFIT_FRAME_JSON")
        && !path.trim().is_empty()
    {
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("could not read {path}: {e}"))?;
        return Ok((raw, path));
    }

    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    Ok((raw, "stdin".to_string()))
}

fn handle_cli_args() -> bool {
    let Some(arg) = std::env::args().nth(1) else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("bracketfit {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => false,
    }
}

fn usage_text() -> &'static str {
    "bracketfit - tournament bracket diagram layout engine

Reads a frame request (bracket data + host measurements, JSON) and writes
the computed geometry frame (match tops, fit scale, connector paths,
overlay placement) to stdout.

Usage:
  bracketfit [request.json]
  bracketfit < request.json
  bracketfit --help

Environment:
  BRACKETFIT_FRAME_JSON   Path to a frame request JSON file
  RUST_LOG                Log filter (e.g. debug)"
}
