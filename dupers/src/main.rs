//! The `dupers` binary: parses arguments, opens the index store, and
//! dispatches to the orchestrator.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use clap::Parser;
use dupers::cli::{self, Cli, Command, DbCommand};
use dupers::context::{Common, OperationContext};
use dupers::orchestrator;
use dupers::presentation::{color_enabled, confirm};
use dupers::Error;
use index::{BucketName, Handle};
use log::{debug, info, Level};
use stable_eyre::eyre::Context as _;
use stable_eyre::Result;
use stderrlog::ColorChoice;

fn main() -> Result<()> {
    stable_eyre::install()?;
    let cli = Cli::parse();

    let (quiet, debug_log) = match &cli.command {
        Command::Dupe(args) => (args.common.quiet(), args.common.debug()),
        Command::Search(args) => (args.common.quiet(), args.common.debug()),
        Command::Database(cmd) => db_common(cmd),
    };
    init_logging(quiet, debug_log)?;

    match cli.command {
        Command::Dupe(args) => run_dupe(args),
        Command::Search(args) => run_search(args),
        Command::Database(cmd) => run_database(cmd),
    }
}

fn db_common(cmd: &DbCommand) -> (bool, bool) {
    let common = match cmd {
        DbCommand::Backup(args) => args.common,
        DbCommand::Clean(args) => args.common,
        DbCommand::Ls(args) => args.common,
        DbCommand::Up(args) => args.common,
        DbCommand::UpPlus(args) => args.common,
        DbCommand::Rm(args) => args.common,
        DbCommand::Mv(args) => args.common,
        DbCommand::Export(args) => args.common,
        DbCommand::Import(args) => args.common,
    };
    (common.quiet(), common.debug())
}

fn init_logging(quiet: bool, debug_log: bool) -> Result<()> {
    stderrlog::new()
        .module(module_path!())
        .color(ColorChoice::Never)
        .verbosity(if debug_log {
            Level::Debug
        } else if quiet {
            Level::Error
        } else {
            Level::Info
        })
        .init()?;
    Ok(())
}

fn run_dupe(args: cli::DupeArgs) -> Result<()> {
    let delete = args.delete_mode();
    let index = Handle::open_write(&args.store.db).context("open index store")?;
    let ctx = OperationContext {
        requested_buckets: cli::as_buckets(&args.buckets),
        check_path: args.check_path,
        fast: args.fast,
        delete,
        common: Common::from(args.common),
    };

    match orchestrator::run_dupe(&index, &ctx, false) {
        Ok(report) => {
            println!("{}", orchestrator::render_report(&report.matches));
            for path in &report.removed_duplicates {
                info!("removed {path:?}");
            }
            Ok(())
        }
        Err(err) => finish(err),
    }
}

fn run_search(args: cli::SearchArgs) -> Result<()> {
    let index = Handle::open_read(&args.store.db).context("open index store")?;
    let buckets = cli::as_buckets(&args.buckets);
    let color = color_enabled(args.common.mono());

    match orchestrator::run_search(&index, &buckets, &args.term, args.exact, args.name) {
        Ok(results) => {
            print_search_results(&results, &args.term, args.exact, color);
            Ok(())
        }
        Err(err) => finish(err),
    }
}

fn print_search_results(results: &HashMap<PathBuf, BucketName>, term: &str, exact: bool, color: bool) {
    for (path, bucket) in results {
        let display = path.to_string_lossy();
        let rendered = if color {
            compare::highlight(&display, term, exact)
        } else {
            display.into_owned()
        };
        println!("{rendered} [{bucket}]");
    }
}

fn run_database(cmd: DbCommand) -> Result<()> {
    match cmd {
        DbCommand::Backup(args) => {
            let index = Handle::open_read(&args.store.db).context("open index store")?;
            match index.backup() {
                Ok((path, bytes)) => {
                    println!("backed up {bytes} bytes to {path:?}");
                    Ok(())
                }
                Err(err) => finish(Error::from(err)),
            }
        }
        DbCommand::Clean(args) => {
            let index = Handle::open_write(&args.store.db).context("open index store")?;
            let buckets = cli::as_buckets(&args.buckets);
            let scoped = if buckets.is_empty() { None } else { Some(buckets.as_slice()) };
            match index.clean(scoped, args.common.quiet(), args.common.debug()) {
                Ok(()) => Ok(()),
                Err(err) => finish(Error::from(err)),
            }
        }
        DbCommand::Ls(args) => {
            let index = Handle::open_read(&args.store.db).context("open index store")?;
            match args.bucket {
                Some(path) => {
                    let bucket = BucketName::normalise(&path);
                    match index.list(&bucket) {
                        Ok(entries) => {
                            for (path, digest) in entries {
                                println!("{digest} {}", path.display());
                            }
                            Ok(())
                        }
                        Err(err) => finish(Error::from(err)),
                    }
                }
                None => {
                    for bucket in index.buckets()? {
                        println!("{bucket}");
                    }
                    Ok(())
                }
            }
        }
        DbCommand::Up(args) => scan_into_bucket(args, false),
        DbCommand::UpPlus(args) => scan_into_bucket(args, true),
        DbCommand::Rm(args) => {
            let index = Handle::open_write(&args.store.db).context("open index store")?;
            let bucket = BucketName::normalise(&args.bucket);
            match index.delete_bucket(&bucket) {
                Ok(()) => Ok(()),
                Err(err) => finish(Error::from(err)),
            }
        }
        DbCommand::Mv(args) => {
            let index = Handle::open_write(&args.store.db).context("open index store")?;
            let old = BucketName::normalise(&args.old);
            let new = BucketName::normalise(&args.new);
            match index.rename_bucket(&old, &new) {
                Ok(()) => Ok(()),
                Err(err) => finish(Error::from(err)),
            }
        }
        DbCommand::Export(args) => {
            let index = Handle::open_read(&args.store.db).context("open index store")?;
            let bucket = BucketName::normalise(&args.bucket);
            match index.csv_export(&bucket) {
                Ok(path) => {
                    println!("exported to {path:?}");
                    Ok(())
                }
                Err(err) => finish(Error::from(err)),
            }
        }
        DbCommand::Import(args) => {
            let index = Handle::open_write(&args.store.db).context("open index store")?;
            match index.csv_import(&args.path, args.common.yes()) {
                Ok(rows) => {
                    println!("imported {rows} rows");
                    Ok(())
                }
                Err(index::Error::ConfirmationRequired(bucket)) => {
                    if confirm(&format!("overwrite existing bucket {bucket}?"))
                        .unwrap_or(false)
                    {
                        let rows = index.csv_import(&args.path, true)?;
                        println!("imported {rows} rows");
                        Ok(())
                    } else {
                        info!("import cancelled");
                        Ok(())
                    }
                }
                Err(err) => finish(Error::from(err)),
            }
        }
    }
}

fn scan_into_bucket(args: cli::TargetArgs, expand_archives: bool) -> Result<()> {
    let index = Handle::open_write(&args.store.db).context("open index store")?;
    let scanner = scanner::Scanner::new(index);
    let skip = HashSet::new();
    let bucket = if expand_archives {
        scanner.walk_archiver(&args.target, &skip)
    } else {
        scanner.walk_directory(&args.target, &skip)
    };
    match bucket {
        Ok(bucket) => {
            debug!("scanned into bucket {bucket}");
            Ok(())
        }
        Err(err) => finish(Error::from(err)),
    }
}

/// Map a [`dupers::Error`] to the process's exit behavior: a clean `0` for
/// confirmation refusal, `1` for recoverable user errors, anything else
/// propagated through `stable_eyre` as a failure.
fn finish(err: Error) -> Result<()> {
    if err.is_confirmation_refusal() {
        info!("{err}");
        return Ok(());
    }
    if err.is_recoverable() {
        eprintln!("{err}");
        std::process::exit(1);
    }
    Err(err).context("operation failed")
}
