//! Command line interface.
//!
//! Argument parsing and command execution live here so they can be tested;
//! `main.rs` only sets up logging, reads input and prints.

use crate::config::Settings;
use crate::error::AddressError;
use crate::models::PrefixLength;
use crate::output;
use crate::processing::{
    calculate_subnet_with, expand_ranges, CalcMode, DerivedView, ExpandOptions, SortOrder,
    SubnetOptions,
};
use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ipv4-range-tools")]
#[command(about = "Expand IPv4 ranges and calculate subnets.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand addresses, dashed ranges and CIDR blocks, one per line
    #[command(alias = "e")]
    Expand(ExpandArgs),
    /// Describe a subnet, optionally dividing or merging it
    #[command(alias = "s")]
    Subnet(SubnetArgs),
}

#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Input file, read from stdin when omitted
    pub file: Option<PathBuf>,
    /// Cap on the number of addresses produced
    #[arg(long)]
    pub max_total: Option<usize>,
    /// Drop repeated addresses
    #[arg(long)]
    pub dedup: bool,
    /// original, asc or desc
    #[arg(long, default_value = "original")]
    pub sort: SortOrder,
    /// Print the full result as JSON
    #[arg(long, conflicts_with = "csv")]
    pub json: bool,
    /// Print per-line diagnostics as CSV instead of the summary
    #[arg(long)]
    pub csv: bool,
}

impl ExpandArgs {
    pub fn options(&self, settings: &Settings) -> ExpandOptions {
        ExpandOptions {
            max_total: self.max_total.unwrap_or(settings.max_total),
            deduplicate: self.dedup,
            sort_order: self.sort,
        }
    }

    /// Read the input text from the file argument or stdin.
    pub fn read_input(&self) -> Result<String, Box<dyn Error>> {
        match &self.file {
            Some(path) => std::fs::read_to_string(path).map_err(|e| -> Box<dyn Error> {
                format!("Error reading {}: {e}", path.display()).into()
            }),
            None => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct SubnetArgs {
    /// IPv4 address, optionally with a /prefix (e.g. 192.168.1.10/24)
    pub address: String,
    /// Prefix length, overrides a /prefix given with the address
    #[arg(short, long)]
    pub prefix: Option<u32>,
    /// Split the subnet into this many equal subnets
    #[arg(long, conflicts_with = "merge")]
    pub divide: Option<u32>,
    /// Merge the subnet into its supernet
    #[arg(long)]
    pub merge: bool,
    /// Shortest prefix that may still be merged
    #[arg(long)]
    pub merge_floor: Option<u8>,
    /// Largest number of subnets --divide may produce
    #[arg(long)]
    pub max_children: Option<u32>,
    /// Print the result as JSON
    #[arg(long, conflicts_with = "csv")]
    pub json: bool,
    /// Print the subnet (or its children) as CSV
    #[arg(long)]
    pub csv: bool,
}

impl SubnetArgs {
    pub fn mode(&self) -> CalcMode {
        match (self.divide, self.merge) {
            (Some(count), _) => CalcMode::Divide(count),
            (None, true) => CalcMode::Merge,
            (None, false) => CalcMode::Basic,
        }
    }

    pub fn options(&self, settings: &Settings) -> SubnetOptions {
        SubnetOptions {
            merge_floor: self.merge_floor.unwrap_or(settings.merge_floor),
            max_children: self.max_children.unwrap_or(settings.max_children),
        }
    }

    /// Address text and prefix length, from `a.b.c.d/p` or `--prefix`.
    ///
    /// An inline prefix must be valid even when `--prefix` overrides it.
    pub fn address_and_prefix(&self) -> Result<(&str, u32), AddressError> {
        let (address, inline_prefix) = match self.address.split_once('/') {
            Some((address, prefix)) => (address, Some(prefix.parse::<PrefixLength>()?)),
            None => (self.address.as_str(), None),
        };
        match (self.prefix, inline_prefix) {
            (Some(prefix), _) => Ok((address, prefix)),
            (None, Some(prefix)) => Ok((address, u32::from(prefix.get()))),
            (None, None) => Err(AddressError::InvalidPrefix(format!(
                "missing for {address}, use a.b.c.d/p or --prefix"
            ))),
        }
    }
}

/// Text destined for stdout and stderr.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

pub fn execute_expand(
    args: &ExpandArgs,
    input: &str,
    settings: &Settings,
) -> Result<CommandOutput, Box<dyn Error>> {
    let result = expand_ranges(input, &args.options(settings));

    if args.json {
        return Ok(CommandOutput {
            stdout: serde_json::to_string_pretty(&result)? + "\n",
            stderr: String::new(),
        });
    }
    let stderr = if args.csv {
        output::diagnostics_csv(&result.diagnostics)
    } else {
        output::render_expand_summary(&result)
    };
    Ok(CommandOutput {
        stdout: output::render_addresses(&result),
        stderr,
    })
}

pub fn execute_subnet(
    args: &SubnetArgs,
    settings: &Settings,
) -> Result<CommandOutput, Box<dyn Error>> {
    let (address, prefix) = args.address_and_prefix()?;
    let calc = calculate_subnet_with(address, prefix, args.mode(), &args.options(settings))?;

    let stdout = if args.json {
        serde_json::to_string_pretty(&calc)? + "\n"
    } else if args.csv {
        match &calc.derived {
            DerivedView::Divided(children) => output::subnets_csv(children),
            DerivedView::Merged(Some(supernet)) => {
                output::subnets_csv(&[calc.subnet.clone(), supernet.clone()])
            }
            _ => output::subnets_csv(std::slice::from_ref(&calc.subnet)),
        }
    } else {
        output::render_calculation(&calc)
    };
    Ok(CommandOutput {
        stdout,
        stderr: String::new(),
    })
}

/// Run a parsed command line.
pub fn execute(cli: &CommandLine, settings: &Settings) -> Result<CommandOutput, Box<dyn Error>> {
    match &cli.command {
        Commands::Expand(args) => {
            let input = args.read_input()?;
            execute_expand(args, &input, settings)
        }
        Commands::Subnet(args) => execute_subnet(args, settings),
    }
}
