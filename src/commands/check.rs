// src/commands/check.rs

use super::analyze_source;
use std::path::Path;
use std::process::ExitCode;

pub fn check_file(path: &Path) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };

    match analyze_source(&source) {
        Ok(_) => ExitCode::SUCCESS,
        Err(errors) => {
            for line in errors {
                println!("{line}");
            }
            ExitCode::FAILURE
        }
    }
}
