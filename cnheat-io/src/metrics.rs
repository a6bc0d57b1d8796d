use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use fxhash::FxHashMap as HashMap;
use log::{info, warn};

use cnheat_core::consts::{ALL_GROUP, CELL_ID_COL, QUALITY_COL, READS_COL};
use cnheat_core::utils::{column_index, get_dynamic_reader, parse_integer, parse_value, table_reader};
use cnheat_core::{HeatmapConfig, Result};

/// Per-cell values taken from the metrics table.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMetrics {
    /// MAD of the neutral state; NaN when reported as `NA`
    pub quality_score: f64,
    pub group_key: String,
    pub color_key: String,
    pub read_count: u64,
}

///
/// Group key to member samples, in the order groups were first seen.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    groups: Vec<(String, Vec<String>)>,
}

impl Grouping {
    pub fn new() -> Self {
        Grouping::default()
    }

    /// Every sample in one group called `name`.
    pub fn single(name: &str, samples: Vec<String>) -> Self {
        Grouping {
            groups: vec![(name.to_string(), samples)],
        }
    }

    pub fn push(&mut self, group: &str, sample: &str) {
        match self.groups.iter_mut().find(|(key, _)| key == group) {
            Some((_, members)) => members.push(sample.to_string()),
            None => self
                .groups
                .push((group.to_string(), vec![sample.to_string()])),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(key, members)| (key.as_str(), members.as_slice()))
    }

    pub fn get(&self, group: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(key, _)| key == group)
            .map(|(_, members)| members.as_slice())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

///
/// Metrics of the cells that made it into the matrix, plus their grouping.
///
#[derive(Debug, Clone, Default)]
pub struct MetricsTable {
    pub samples: HashMap<String, SampleMetrics>,
    pub grouping: Grouping,
    /// rows skipped because their cell is not in the matrix
    pub unknown: usize,
}

impl MetricsTable {
    ///
    /// Read the metrics table from disk, keeping only cells listed in `known_samples`.
    ///
    pub fn from_path(path: &Path, config: &HeatmapConfig, known_samples: &[String]) -> Result<Self> {
        let reader = get_dynamic_reader(path)?;
        let table = Self::from_reader(reader, config, known_samples)?;

        info!(
            "Read metrics for {} sample(s) in {} group(s) from {}",
            table.samples.len(),
            table.grouping.len(),
            path.display()
        );

        Ok(table)
    }

    ///
    /// Parse a metrics table from any reader.
    ///
    /// Rows are skipped when the cell is unknown, or when a category allow-list is active and
    /// the row's category is not on it.
    pub fn from_reader<R: Read>(
        reader: R,
        config: &HeatmapConfig,
        known_samples: &[String],
    ) -> Result<Self> {
        let known: HashSet<&str> = known_samples.iter().map(String::as_str).collect();
        let allow_list = config.category_allow_list();

        let mut table = table_reader(reader, config.separator);

        let headers = table.headers()?.clone();
        let cell_idx = column_index(&headers, CELL_ID_COL)?;
        let quality_idx = column_index(&headers, QUALITY_COL)?;
        let reads_idx = column_index(&headers, READS_COL)?;
        let color_idx = column_index(&headers, &config.color_by_col)?;
        let group_idx = match config.grouping_enabled() {
            true => Some(column_index(&headers, &config.plot_by_col)?),
            false => None,
        };

        let mut samples: HashMap<String, SampleMetrics> = HashMap::default();
        let mut grouping = Grouping::new();
        let mut unknown = 0usize;

        for record in table.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());

            let field = |idx: usize| record.get(idx).unwrap_or_default();

            let sample_id = field(cell_idx);
            if !known.contains(sample_id) {
                unknown += 1;
                continue;
            }

            let color_key = field(color_idx);
            if let Some(calls) = allow_list {
                if !calls.iter().any(|c| c == color_key) {
                    continue;
                }
            }

            if samples.contains_key(sample_id) {
                warn!("Sample {} is listed twice in the metrics table, keeping the first row", sample_id);
                continue;
            }

            let quality_score = parse_value(field(quality_idx), QUALITY_COL, line)?;
            let read_count = parse_integer(field(reads_idx), READS_COL, line)?;
            let group_key = match group_idx {
                Some(idx) => field(idx),
                None => ALL_GROUP,
            };

            grouping.push(group_key, sample_id);
            samples.insert(
                sample_id.to_string(),
                SampleMetrics {
                    quality_score,
                    group_key: group_key.to_string(),
                    color_key: color_key.to_string(),
                    read_count,
                },
            );
        }

        if unknown > 0 {
            warn!("Skipped {} metrics row(s) for samples absent from the matrix", unknown);
        }

        Ok(MetricsTable {
            samples,
            grouping,
            unknown,
        })
    }

    pub fn quality_score(&self, sample: &str) -> Option<f64> {
        self.samples.get(sample).map(|m| m.quality_score)
    }

    pub fn read_count(&self, sample: &str) -> Option<u64> {
        self.samples.get(sample).map(|m| m.read_count)
    }

    pub fn category(&self, sample: &str) -> Option<&str> {
        self.samples.get(sample).map(|m| m.color_key.as_str())
    }

    /// sample id -> category, for every sample with metrics.
    pub fn categories(&self) -> HashMap<String, String> {
        self.samples
            .iter()
            .map(|(id, m)| (id.clone(), m.color_key.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn metrics() -> &'static str {
        "cell_id,mad_neutral_state,total_mapped_reads,cell_call,library_id,experimental_condition\n\
         A,0.10,500000,C1,LIB1,gm\n\
         B,NA,200000,C2,LIB2,gm\n\
         C,0.30,900000,C1,LIB1,nc\n\
         Z,0.05,100000,C1,LIB1,gm\n"
    }

    #[fixture]
    fn known() -> Vec<String> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    }

    #[rstest]
    fn test_read_without_grouping(metrics: &str, known: Vec<String>) {
        let config = HeatmapConfig::new("copy");
        let table = MetricsTable::from_reader(metrics.as_bytes(), &config, &known).unwrap();

        assert_eq!(table.samples.len(), 3);
        assert_eq!(table.grouping.len(), 1);
        assert_eq!(
            table.grouping.get("all").unwrap(),
            &["A".to_string(), "B".to_string(), "C".to_string()]
        );
        assert_eq!(table.read_count("C"), Some(900_000));
        assert_eq!(table.category("B"), Some("C2"));
        assert!(table.quality_score("B").unwrap().is_nan());
        assert_eq!(table.quality_score("Z"), None);
        assert_eq!(table.unknown, 1);
    }

    #[rstest]
    fn test_grouping_keeps_first_seen_order(metrics: &str, known: Vec<String>) {
        let mut config = HeatmapConfig::new("copy");
        config.plot_by_col = "library_id".to_string();
        let table = MetricsTable::from_reader(metrics.as_bytes(), &config, &known).unwrap();

        let groups: Vec<(&str, &[String])> = table.grouping.iter().collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "LIB1");
        assert_eq!(groups[0].1, &["A".to_string(), "C".to_string()]);
        assert_eq!(groups[1].0, "LIB2");
    }

    #[rstest]
    fn test_allow_list_skips_rows(metrics: &str, known: Vec<String>) {
        let mut config = HeatmapConfig::new("copy");
        config.cellcalls = Some(vec!["C1".to_string()]);
        let table = MetricsTable::from_reader(metrics.as_bytes(), &config, &known).unwrap();

        assert_eq!(table.samples.len(), 2);
        assert_eq!(table.category("B"), None);
        // B is known, only Z counts as unknown
        assert_eq!(table.unknown, 1);
    }

    #[rstest]
    fn test_custom_color_column(metrics: &str, known: Vec<String>) {
        let mut config = HeatmapConfig::new("copy");
        config.color_by_col = "experimental_condition".to_string();
        let table = MetricsTable::from_reader(metrics.as_bytes(), &config, &known).unwrap();

        assert_eq!(table.category("C"), Some("nc"));
        assert_eq!(table.categories().len(), 3);
    }

    #[rstest]
    fn test_missing_group_column(metrics: &str, known: Vec<String>) {
        let mut config = HeatmapConfig::new("copy");
        config.plot_by_col = "sample_type".to_string();

        let err = MetricsTable::from_reader(metrics.as_bytes(), &config, &known).unwrap_err();
        assert!(matches!(err, cnheat_core::HeatmapError::MissingColumn { .. }));
    }
}
