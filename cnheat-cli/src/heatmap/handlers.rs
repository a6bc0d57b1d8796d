use std::path::Path;

use anyhow::Result;
use clap::ArgMatches;
use log::info;

use cnheat::HeatmapPipeline;
use cnheat::core::{HeatmapConfig, Separator};

/// Turn parsed flags into a run configuration.
pub fn config_from_matches(matches: &ArgMatches) -> Result<HeatmapConfig> {
    let column_name = matches
        .get_one::<String>("column_name")
        .expect("--column_name is required");

    let mut config = HeatmapConfig::new(column_name);

    config.separator = matches
        .get_one::<String>("separator")
        .expect("--separator is required")
        .parse::<Separator>()?;

    if let Some(title) = matches.get_one::<String>("plot_title") {
        config.plot_title = title.clone();
    }
    if let Some(col) = matches.get_one::<String>("plot_by_col") {
        config.plot_by_col = col.clone();
    }
    if let Some(col) = matches.get_one::<String>("color_by_col") {
        config.color_by_col = col.clone();
    }

    config.cellcalls = matches
        .get_many::<String>("cellcalls")
        .map(|calls| calls.cloned().collect());
    config.mad_threshold = matches.get_one::<f64>("mad_threshold").copied();
    config.numreads_threshold = matches.get_one::<u64>("numreads_threshold").copied();
    config.high_memory = matches.get_flag("high_memory");

    Ok(config)
}

pub fn run_heatmap(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .expect("--input is required");
    let metrics = matches
        .get_one::<String>("metrics")
        .expect("--metrics is required");

    let config = config_from_matches(matches)?;

    let mut pipeline = HeatmapPipeline::new(config, Path::new(input), Path::new(metrics));
    if let Some(order_data) = matches.get_one::<String>("order_data") {
        pipeline = pipeline.with_order_data(Path::new(order_data));
    }
    if let Some(output) = matches.get_one::<String>("output") {
        pipeline = pipeline.with_output(Path::new(output));
    }

    let summary = pipeline.run()?;

    info!(
        "Done: {} sample(s) x {} bin(s), {} ordered, {} page(s)",
        summary.samples, summary.bins, summary.ordered, summary.pages
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::heatmap::cli::create_heatmap_cli;

    fn matches(extra: &[&str]) -> ArgMatches {
        let mut args = vec![
            "heatmap",
            "--input",
            "reads.csv",
            "--metrics",
            "metrics.csv",
            "--column_name",
            "integer_copy_number",
            "--separator",
            "tab",
        ];
        args.extend_from_slice(extra);
        create_heatmap_cli().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = config_from_matches(&matches(&[])).unwrap();

        assert_eq!(config.separator, Separator::Tab);
        assert_eq!(config.column_name, "integer_copy_number");
        assert_eq!(config.plot_by_col, "all");
        assert_eq!(config.cellcalls, None);
        assert_eq!(config.mad_threshold, None);
        assert!(!config.high_memory);
        assert!(!config.clustering_filters_configured());
    }

    #[test]
    fn test_config_filters() {
        let config = config_from_matches(&matches(&[
            "--cellcalls",
            "A",
            "B",
            "--mad_threshold",
            "0.2",
            "--numreads_threshold",
            "500000",
            "--plot_by_col",
            "library_id",
            "--high_memory",
        ]))
        .unwrap();

        assert_eq!(config.cellcalls, Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(config.mad_threshold, Some(0.2));
        assert_eq!(config.numreads_threshold, Some(500_000));
        assert_eq!(config.order_column(), "library_id_heatmap_order");
        assert!(config.high_memory);
        assert!(config.clustering_filters_configured());
    }

    #[test]
    fn test_empty_cellcalls_is_unset() {
        let config = config_from_matches(&matches(&["--cellcalls"])).unwrap();
        assert_eq!(config.category_allow_list(), None);
    }
}
