//! threat-scan - operator CLI for the analysis core.
//!
//! Usage:
//!   threat-scan file <path> [name]
//!   threat-scan url <url>
//!   threat-scan status
//!
//! Prints the verdict as pretty JSON. Exit codes: 0 benign, 1 error,
//! 2 malicious.

use std::process::ExitCode;

use threat_detector_core::{AnalysisEngine, AnalysisVerdict, ArtifactConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        eprintln!("usage: threat-scan <file|url|status> <target>");
        return ExitCode::from(1);
    };

    let engine = AnalysisEngine::load(&ArtifactConfig::default_probe());

    let verdict = match command {
        "file" => {
            let Some(path) = args.get(1) else {
                eprintln!("usage: threat-scan file <path> [name]");
                return ExitCode::from(1);
            };
            let bytes = match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    eprintln!("cannot read {}: {}", path, e);
                    return ExitCode::from(1);
                }
            };
            let name = args.get(2).map(String::as_str).or_else(|| {
                std::path::Path::new(path)
                    .file_name()
                    .and_then(|n| n.to_str())
            });
            engine.analyze_executable(&bytes, name)
        }
        "url" => {
            let Some(url) = args.get(1) else {
                eprintln!("usage: threat-scan url <url>");
                return ExitCode::from(1);
            };
            engine.analyze_url(url)
        }
        "status" => {
            match serde_json::to_string_pretty(&engine.status()) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("cannot serialize status: {}", e);
                    return ExitCode::from(1);
                }
            }
            return ExitCode::SUCCESS;
        }
        other => {
            eprintln!("unknown command: {}", other);
            return ExitCode::from(1);
        }
    };

    match verdict {
        Ok(verdict) => print_verdict(&verdict),
        Err(e) => {
            match serde_json::to_string_pretty(&e.to_json()) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", e),
            }
            ExitCode::from(1)
        }
    }
}

fn print_verdict(verdict: &AnalysisVerdict) -> ExitCode {
    match serde_json::to_string_pretty(verdict) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("cannot serialize verdict: {}", e);
            return ExitCode::from(1);
        }
    }
    if verdict.malicious {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}
