//! Interactive client: reads one command per line from stdin and prints each result
//! before reading the next. `bye` or end of input ends the session.

pub mod args;
mod print;

use args::{get_grouped_help, Cli};
use clinic::api::ClinicApi;
use clinic::config::ClinicConfig;
use clinic::error::{ClinicError, Result};
use clinic::store::fs::FsBackend;
use clinic::store::StorageBackend;
use directories::ProjectDirs;
use std::io::{self, BufRead};
use std::path::PathBuf;

pub fn run(cli: &Cli) -> Result<()> {
    let data_dir = resolve_data_dir(cli)?;
    let config = match ClinicConfig::load(&data_dir) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, dir = %data_dir.display(), "ignoring unreadable config.json");
            ClinicConfig::default()
        }
    };

    let mut backend = FsBackend::new(data_dir, &config);
    if let Some(dir) = &cli.output_dir {
        backend = backend.with_document_dir(dir.clone());
    }
    tracing::info!(
        data_dir = %backend.root().display(),
        document_dir = %backend.document_dir().display(),
        "starting session"
    );

    let (mut api, report) = ClinicApi::open(backend);
    println!("{}", get_grouped_help());
    print::print_messages(&report.messages);

    let stdin = io::stdin();
    repl(&mut api, stdin.lock())
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    ProjectDirs::from("com", "clinicease", "clinic")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            ClinicError::Store(
                "could not determine a data directory, pass --data-dir or set CLINIC_HOME"
                    .to_string(),
            )
        })
}

/// Lines that are not valid UTF-8 are decoded lossily and handled like any other input.
fn repl<B: StorageBackend, R: BufRead>(api: &mut ClinicApi<B>, mut input: R) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).map_err(ClinicError::Io)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }

        print::print_rule();
        match api.run_line(line) {
            Ok(result) => {
                print::print_result(&result);
                if result.exit {
                    println!("Goodbye!");
                    print::print_rule();
                    return Ok(());
                }
            }
            Err(err) => {
                tracing::debug!(line = %line, error = %err, "command failed");
                print::print_error(&err.to_string());
            }
        }
        print::print_rule();
    }

    println!("Goodbye!");
    Ok(())
}
