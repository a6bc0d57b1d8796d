use clap::{Arg, ArgAction, Command, arg, value_parser};

use cnheat::core::consts::{ALL_GROUP, DEFAULT_COLOR_COL};

pub const HEATMAP_CMD: &str = "heatmap";

pub fn create_heatmap_cli() -> Command {
    Command::new(HEATMAP_CMD)
        .about("Cluster single cells by copy-number profile and plot paginated heatmaps.")
        .arg(
            arg!(--input <INPUT>)
                .required(true)
                .help("Segment table: one row per cell and bin (plain or .gz)"),
        )
        .arg(
            arg!(--metrics <METRICS>)
                .required(true)
                .help("Per-cell metrics table (plain or .gz)"),
        )
        .arg(
            arg!(--column_name <COLUMN_NAME>)
                .required(true)
                .help("Segment table column to plot; integer_copy_number uses the discrete state palette"),
        )
        .arg(
            arg!(--separator <SEPARATOR>)
                .required(true)
                .value_parser(["comma", "tab"])
                .help("Field separator of both tables"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Heatmap document (HTML). No plot is drawn without it"),
        )
        .arg(
            arg!(--order_data <ORDER_DATA>)
                .required(false)
                .help("Cluster order CSV. No clustering is done without it"),
        )
        .arg(
            arg!(--plot_title <PLOT_TITLE>)
                .required(false)
                .default_value("")
                .help("Prefix for every page title"),
        )
        .arg(
            Arg::new("cellcalls")
                .long("cellcalls")
                .num_args(0..)
                .action(ArgAction::Append)
                .help("Categories of --color_by_col to keep"),
        )
        .arg(
            arg!(--mad_threshold <MAD_THRESHOLD>)
                .required(false)
                .value_parser(value_parser!(f64))
                .help("Keep cells with mad_neutral_state at or below this value"),
        )
        .arg(
            arg!(--numreads_threshold <NUMREADS_THRESHOLD>)
                .required(false)
                .value_parser(value_parser!(u64))
                .help("Keep cells with total_mapped_reads at or above this value"),
        )
        .arg(
            arg!(--plot_by_col <PLOT_BY_COL>)
                .required(false)
                .default_value(ALL_GROUP)
                .help("Metrics column splitting cells into one heatmap per group"),
        )
        .arg(
            arg!(--color_by_col <COLOR_BY_COL>)
                .required(false)
                .default_value(DEFAULT_COLOR_COL)
                .help("Metrics column used for the row color strip"),
        )
        .arg(
            arg!(--high_memory)
                .help("Draw each group on a single page instead of pages of 1000 cells")
                .action(ArgAction::SetTrue),
        )
}
