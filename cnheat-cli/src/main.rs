mod heatmap;

use anyhow::Result;
use clap::Command;
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "cnheat";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Copy-number heatmaps and hierarchical clustering of single-cell sequencing data.")
        .subcommand_required(true)
        .subcommand(heatmap::cli::create_heatmap_cli())
}

fn main() -> Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // HEATMAP
        //
        Some((heatmap::cli::HEATMAP_CMD, matches)) => {
            heatmap::handlers::run_heatmap(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
