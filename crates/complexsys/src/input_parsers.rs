use std::fs::File;
use std::io::{stdin, BufRead, BufReader, Cursor, Read};
use std::path::Path;

use anyhow::{anyhow, Result};
use paste::paste;
use cs_core::Trajectory;
use cs_solvers::ReactionNetwork;

// ============================================================
//  Base parsers
// ============================================================

/// Read a reaction network in the text format of [`ReactionNetwork`].
pub fn read_network<R: BufRead>(mut reader: R) -> Result<ReactionNetwork> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let network: ReactionNetwork = text.parse()?;
    if network.reactions().is_empty() {
        return Err(anyhow!("Reaction network contains no reactions"));
    }
    Ok(network)
}

/// Read a single whitespace or comma separated state vector, e.g. the
/// initial condition of a continuous model. Lines starting with `#` are
/// skipped, the first data line is used.
pub fn read_state<R: BufRead>(reader: R) -> Result<Vec<f64>> {
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        return line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|tok| !tok.is_empty())
            .map(|tok| tok.parse::<f64>().map_err(|e| anyhow!("Invalid value '{}': {}", tok, e)))
            .collect();
    }
    Err(anyhow!("Missing state line"))
}

// ============================================================
//  Macro generating file/string/stdin/input helpers
// ============================================================

/// Generate input adapters for a base parser function `fn base<R: BufRead>(R) -> Result<T>`.
///
/// This expands into:
/// - `base_string(&str)`
/// - `base_file<P: AsRef<Path>>(P)`
/// - `base_stdin()`
/// - `base_input(&str)`  (dispatches "-" → stdin, otherwise → file)
macro_rules! define_input_variants {
    ($base:ident, $ret:ty) => {
        paste! {
            /// Read from a string buffer.
            pub fn [<$base _string>](s: &str) -> $ret {
                $base(Cursor::new(s))
            }

            /// Read from a file path.
            pub fn [<$base _file>]<P: AsRef<Path>>(path: P) -> $ret {
                let reader = BufReader::new(File::open(path)?);
                $base(reader)
            }

            /// Read from stdin.
            pub fn [<$base _stdin>]() -> $ret {
                let reader = BufReader::new(stdin());
                $base(reader)
            }

            /// Read either from stdin ("-") or a file path.
            pub fn [<$base _input>](s: &str) -> $ret {
                if s == "-" {
                    [<$base _stdin>]()
                } else {
                    [<$base _file>](s)
                }
            }
        }
    };
}

define_input_variants!(read_network, Result<ReactionNetwork>);
define_input_variants!(read_state, Result<Vec<f64>>);

/// The last state of a stored trajectory, to continue a simulation where
/// a previous run stopped.
pub fn last_state_of<P: AsRef<Path>>(path: P) -> Result<(f64, Vec<f64>)> {
    let trajectory = Trajectory::from_file(path)?;
    trajectory
        .last()
        .map(|(t, y)| (t, y.to_vec()))
        .ok_or_else(|| anyhow!("Trajectory '{}' has no samples", trajectory.name()))
}

// ============================================================
//  Unit tests
// ============================================================
