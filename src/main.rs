//! Command-line inspector for SSZ-encoded execution payloads.
//!
//! # Usage
//! ```text
//! payload-ssz <root|decode|verify|prove> <file> [OPTIONS]
//! ```
//!
//! # Arguments
//! - `root`: print the hash tree root
//! - `decode`: print every field and the root
//! - `verify`: compute the root on both hash paths and fail if they differ
//! - `prove`: print the Merkle branch of one field (`--field`)
//! - `file`: raw SSZ bytes, or `0x`-prefixed hex text
//!
//! # Options
//! - `--fork <name>`: layout to decode with (defaults to `deneb`)
//! - `--timestamp <ts>`: pick the layout from a fork schedule instead
//! - `--schedule <forks>`: schedule for `--timestamp`, e.g. `capella=0,deneb=1710338135`
//! - `--header`: the file holds an execution payload header
//! - `--field <name>`: field to prove, e.g. `withdrawals`

use payload_ssz::core::chain_spec::{ChainSpec, ForkSchedule};
use payload_ssz::core::header::ExecutionPayloadHeader;
use payload_ssz::core::payload::ExecutionPayload;
use payload_ssz::core::view::PayloadView;
use payload_ssz::ssz::{Container, DualPathCheck, ForkVersion, HashTreeRootWith, SszResult};
use payload_ssz::{error, info};
use std::env;
use std::error::Error;
use std::fs;
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Root,
    Decode,
    Verify,
    Prove,
}

struct Options {
    command: Command,
    path: String,
    fork: Option<ForkVersion>,
    timestamp: Option<u64>,
    schedule: Option<ForkSchedule>,
    header: bool,
    field: Option<String>,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let options = parse_args(&args);

    let version = match resolve_version(&options) {
        Ok(version) => version,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let bytes = match read_input(&options.path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Failed to read {}: {}", options.path, e);
            process::exit(1);
        }
    };
    info!("Read {} bytes from {} ({} layout)", bytes.len(), options.path, version);

    let result = if options.header {
        run::<ExecutionPayloadHeader>(&options, &bytes, version)
    } else {
        run::<ExecutionPayload>(&options, &bytes, version)
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Options {
    let command = match args[1].as_str() {
        "root" => Command::Root,
        "decode" => Command::Decode,
        "verify" => Command::Verify,
        "prove" => Command::Prove,
        other => {
            eprintln!("Unknown command: {}\n", other);
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    let mut options = Options {
        command,
        path: args[2].clone(),
        fork: None,
        timestamp: None,
        schedule: None,
        header: false,
        field: None,
    };

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--fork" => {
                let value = option_value(args, i, "--fork");
                options.fork = Some(value.parse().unwrap_or_else(|e| {
                    eprintln!("Invalid fork {}: {}", value, e);
                    process::exit(1);
                }));
                i += 2;
            }
            "--timestamp" => {
                let value = option_value(args, i, "--timestamp");
                options.timestamp = Some(value.parse().unwrap_or_else(|_| {
                    eprintln!("Invalid timestamp: {}", value);
                    process::exit(1);
                }));
                i += 2;
            }
            "--schedule" => {
                let value = option_value(args, i, "--schedule");
                options.schedule = Some(value.parse().unwrap_or_else(|e| {
                    eprintln!("Invalid schedule: {}", e);
                    process::exit(1);
                }));
                i += 2;
            }
            "--header" => {
                options.header = true;
                i += 1;
            }
            "--field" => {
                options.field = Some(option_value(args, i, "--field").to_string());
                i += 2;
            }
            other => {
                eprintln!("Unexpected argument: {}\n", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }
    if options.command == Command::Prove && options.field.is_none() {
        eprintln!("prove requires --field\n");
        print_usage(&args[0]);
        process::exit(1);
    }
    options
}

fn option_value<'a>(args: &'a [String], i: usize, name: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("{} requires an argument", name);
            process::exit(1);
        }
    }
}

fn resolve_version(options: &Options) -> Result<ForkVersion, String> {
    match (options.fork, options.timestamp) {
        (Some(_), Some(_)) => Err("--fork and --timestamp are mutually exclusive".into()),
        (Some(fork), None) => Ok(fork),
        (None, Some(ts)) => {
            let schedule = options
                .schedule
                .as_ref()
                .ok_or("--timestamp requires --schedule")?;
            Ok(schedule.version_for_timestamp(ts))
        }
        (None, None) => Ok(ForkVersion::Deneb),
    }
}

/// Reads raw bytes, or hex text when the file starts with `0x`.
fn read_input(path: &str) -> Result<Vec<u8>, String> {
    let raw = fs::read(path).map_err(|e| e.to_string())?;
    parse_input(raw)
}

fn parse_input(raw: Vec<u8>) -> Result<Vec<u8>, String> {
    let Some(text) = raw.strip_prefix(b"0x") else {
        return Ok(raw);
    };
    let digits: Vec<u8> = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    hex::decode(digits).map_err(|e| format!("invalid hex input: {}", e))
}

fn run<T>(options: &Options, bytes: &[u8], version: ForkVersion) -> Result<(), Box<dyn Error>>
where
    T: Container + HashTreeRootWith + PayloadView,
{
    let record = T::decode(bytes, version)?;
    match options.command {
        Command::Root => println!("{}", record.hash_tree_root()?),
        Command::Decode => {
            print_fields(&record)?;
            println!("{:<18} {}", "hash_tree_root", record.hash_tree_root()?);
        }
        Command::Verify => {
            let root = DualPathCheck::verify(&record)?;
            println!("{}", root);
            info!("{} roots agree", T::NAME);
        }
        Command::Prove => {
            let name = options.field.as_deref().unwrap_or_default();
            let index = field_index::<T>(name)?;
            let root = record.hash_tree_root()?;
            let proof = record.field_proof(index)?;
            proof.verify(root)?;
            println!("{:<18} {}", "field", proof.field);
            println!("{:<18} {}", "gindex", proof.gindex);
            println!("{:<18} {}", "leaf", proof.leaf);
            for sibling in &proof.branch {
                println!("{:<18} {}", "branch", sibling);
            }
            println!("{:<18} {}", "hash_tree_root", root);
        }
    }
    Ok(())
}

/// Position of the field called `name` in `T`'s table.
fn field_index<T: Container>(name: &str) -> Result<usize, String> {
    T::FIELDS
        .iter()
        .position(|field| field.name == name)
        .ok_or_else(|| format!("{} has no field named {:?}", T::NAME, name))
}

fn print_fields(view: &dyn PayloadView) -> SszResult<()> {
    println!("{:<18} {}", "parent_hash", view.parent_hash());
    println!("{:<18} {}", "fee_recipient", view.fee_recipient());
    println!("{:<18} {}", "state_root", view.state_root());
    println!("{:<18} {}", "receipts_root", view.receipts_root());
    println!("{:<18} {}", "prev_randao", view.prev_randao());
    println!("{:<18} {}", "block_number", view.block_number());
    println!("{:<18} {}", "gas_limit", view.gas_limit());
    println!("{:<18} {}", "gas_used", view.gas_used());
    println!("{:<18} {}", "timestamp", view.timestamp());
    println!("{:<18} {} bytes", "extra_data", view.extra_data().len());
    println!("{:<18} {}", "base_fee_per_gas", view.base_fee_per_gas());
    println!("{:<18} {}", "block_hash", view.block_hash());
    println!("{:<18} {}", "transactions_root", view.transactions_root()?);
    println!("{:<18} {}", "withdrawals_root", view.withdrawals_root()?);
    println!("{:<18} {}", "blob_gas_used", view.blob_gas_used());
    println!("{:<18} {}", "excess_blob_gas", view.excess_blob_gas());
    Ok(())
}

const USAGE: &str = "\
Execution payload SSZ inspector

USAGE:
    {program} <root|decode|verify|prove> <file> [OPTIONS]

ARGS:
    <file>    Raw SSZ bytes, or 0x-prefixed hex text

OPTIONS:
    --fork <name>          Layout to decode with (default: deneb)
    --timestamp <ts>       Pick the layout from --schedule by block timestamp
    --schedule <forks>     Fork schedule, e.g. capella=0,deneb=1710338135
    --header               Decode an execution payload header instead
    --field <name>         Field to prove (prove only), e.g. withdrawals
    -h, --help             Print this help message

ENVIRONMENT:
    PAYLOAD_SSZ_LOG    Minimum log level: debug, info, warn or error (default: info)

EXAMPLES:
    {program} root payload.ssz --fork capella
    {program} verify payload.hex --timestamp 1710338135 --schedule capella=0,deneb=1710338135
    {program} prove header.ssz --header --field withdrawals_root
";

/// Prints usage information to stderr.
fn print_usage(program: &str) {
    eprintln!("{}", USAGE.replace("{program}", program));
}
