use clap::Parser;
use go2type::interface::{run_cli, Go2TypeCli};

fn main() {
    let cli = Go2TypeCli::parse();
    std::process::exit(run_cli(cli));
}
