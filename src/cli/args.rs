//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

/// Command line client for the management REST API of cloud cache clusters
#[derive(Parser, Debug)]
#[command(name = "pccctl")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
Examples:
  pccctl pcc1 commands
  pccctl pcc1 list regions -g=groupA,groupB
  pccctl pcc1 get region -id=region1 -j
  pccctl pcc1 create region -body=@region.json

Options after the command are passed to the cluster:
  -j                  print JSON instead of a table
  -g=<groups>         keep records in the given comma separated groups
  -u=<user> -p=<pw>   override the cluster credentials
  -body=<json>, -d    request body, @<file> reads it from a file
  -h                  show the endpoint and parameters of a command")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Additional config file layered over the global one
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,

    /// Generate shell completions and exit
    #[arg(long = "completions", value_name = "SHELL", value_enum)]
    pub generator: Option<clap_complete::Shell>,

    /// Target cluster followed by the command words and their options
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}
