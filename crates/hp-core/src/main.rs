use clap::Parser;
use hp_core::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();
    let code = cli::run(&cli);
    std::process::exit(code.as_i32());
}
