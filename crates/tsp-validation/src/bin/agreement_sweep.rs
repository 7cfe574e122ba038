//! CSV agreement sweep between the exact solvers.
//!
//! Exits non-zero when any instance disagrees, so it can gate CI.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use tsp_core::Result;
use tsp_validation::sweep;

const USAGE: &str = "agreement-sweep: run the exact solvers against each other on seeded instances

usage: agreement-sweep [--sizes 2,3,4] [--instances N] [--seed N] [--out report.csv]

  --sizes      comma-separated waypoint counts to sweep (default 2..=9)
  --instances  instances per size (default 5)
  --seed       generator seed (default 42)
  --out        write the CSV here instead of stdout";

#[derive(Debug)]
struct Args {
    sizes: Vec<usize>,
    instances: u32,
    seed: u64,
    out: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            sizes: (2..=9).collect(),
            instances: 5,
            seed: 42,
            out: None,
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> std::result::Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--sizes" => {
                let value = args.next().ok_or("--sizes needs a comma-separated list")?;
                parsed.sizes = value
                    .split(',')
                    .map(|part| part.trim().parse::<usize>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|err| format!("bad --sizes value `{value}`: {err}"))?;
            }
            "--instances" => {
                let value = args.next().ok_or("--instances needs a number")?;
                parsed.instances = value
                    .parse()
                    .map_err(|err| format!("bad --instances value `{value}`: {err}"))?;
            }
            "--seed" => {
                let value = args.next().ok_or("--seed needs a number")?;
                parsed.seed = value
                    .parse()
                    .map_err(|err| format!("bad --seed value `{value}`: {err}"))?;
            }
            "--out" => {
                let value = args.next().ok_or("--out needs a path")?;
                parsed.out = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => return Err(format!("unknown flag `{other}`\n\n{USAGE}")),
        }
    }
    Ok(parsed)
}

fn run(args: &Args) -> Result<bool> {
    let rows = sweep::run(&args.sizes, args.instances, args.seed)?;

    let mut out: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };
    writeln!(
        out,
        "waypoints,instance,bruteForce,heldKarp,identity,bruteForceMicros,heldKarpMicros,agree"
    )?;

    let mut all_agree = true;
    for row in &rows {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            row.waypoints,
            row.instance,
            row.brute_force_distance,
            row.held_karp_distance,
            row.identity_distance,
            row.brute_force_micros,
            row.held_karp_micros,
            row.agree
        )?;
        if !row.agree {
            all_agree = false;
            eprintln!("disagreement: {}", serde_json::to_string(row)?);
        }
    }
    out.flush()?;

    if all_agree {
        log::info!("{} instances agree across sizes {:?}", rows.len(), args.sizes);
    } else {
        eprintln!("re-run with --seed {} to reproduce", args.seed);
    }
    Ok(all_agree)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("agreement-sweep: {err}");
            ExitCode::FAILURE
        }
    }
}
