//! `acf-sparc` - scaffold a SPARC-aligned Roo Code workspace.
//!
//! See `DESIGN.md` for architecture.

use anyhow::Result;
use clap::Parser;

use acf_sparc::cli::{Cli, Command};

fn main() -> Result<()> {
    acf_sparc::logging::init();
    let cli = Cli::parse();
    let exit_code = match cli.command {
        Command::Init(args) => acf_sparc::engine::init(args)?,
        Command::Schema => {
            let schema = acf_sparc::events::generate_schema();
            println!("{}", schema);
            acf_sparc::exit_codes::exit::SUCCESS
        }
    };
    std::process::exit(exit_code);
}
