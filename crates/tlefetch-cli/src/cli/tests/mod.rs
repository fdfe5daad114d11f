//! CLI parse tests.

use super::{Cli, CliCommand, FetchArgs};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

pub(super) fn parse_fetch(args: &[&str]) -> FetchArgs {
    match parse(args).command {
        Some(CliCommand::Fetch(a)) => a,
        other => panic!("expected Fetch, got {:?}", other),
    }
}
