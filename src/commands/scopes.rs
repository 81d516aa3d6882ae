// src/commands/scopes.rs

use super::analyze_source;
use crate::sema::pretty::pretty_scopes;
use std::path::Path;
use std::process::ExitCode;

pub fn dump_scopes(path: &Path) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };

    match analyze_source(&source) {
        Ok((_, analysis, interner)) => {
            print!("{}", pretty_scopes(&analysis, &interner));
            ExitCode::SUCCESS
        }
        Err(errors) => {
            for line in errors {
                println!("{line}");
            }
            ExitCode::FAILURE
        }
    }
}
