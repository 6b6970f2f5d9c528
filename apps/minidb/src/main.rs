//! `minidb <dbenv-path>` opens (creating if absent) a database environment rooted
//! at the given directory and runs an interactive SQL REPL against it.

mod config;
mod engine_environment;
mod logging;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use config::EngineConfig;
use engine_environment::EngineEnvironment;
use tracing::{error, info};

fn main() -> ExitCode {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "minidb".to_string());
    let Some(dbenv_path) = args.next() else {
        eprintln!("usage: {program} <dbenv-path>");
        return ExitCode::FAILURE;
    };

    let data_dir = PathBuf::from(dbenv_path);
    let config = match EngineConfig::load(&data_dir.join("minidb.toml")) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut environment = match EngineEnvironment::new(data_dir.clone(), config) {
        Ok(environment) => environment,
        Err(err) => {
            eprintln!(
                "failed to prepare database environment at {}: {err}",
                data_dir.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let logs_dir = data_dir.join(&environment.config().storage.logs_dir);
    let _guard = logging::init_logging(&logs_dir);
    info!(dbenv = %data_dir.display(), "starting minidb");

    run_repl(&mut environment);
    ExitCode::SUCCESS
}

fn run_repl(environment: &mut EngineEnvironment) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        print!("SQL> ");
        if stdout.flush().is_err() {
            break;
        }

        line.clear();
        let bytes_read = match stdin.lock().read_line(&mut line) {
            Ok(n) => n,
            Err(err) => {
                error!(error = %err, "error reading from stdin");
                break;
            }
        };
        if bytes_read == 0 {
            println!();
            break;
        }

        let input = line.trim();
        if input == "quit" {
            break;
        }
        if input.is_empty() {
            continue;
        }

        let catalog = match environment.catalog() {
            Ok(catalog) => catalog,
            Err(err) => {
                println!("DbRelationError: {err}");
                continue;
            }
        };

        match sql::parse(input) {
            Ok(statement) => {
                let result = executor::execute(catalog, statement);
                println!("{result}");
            }
            Err(_) => println!("Invalid SQL statement."),
        }
    }
}
