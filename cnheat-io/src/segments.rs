use std::io::Read;
use std::path::Path;

use fxhash::FxHashMap as HashMap;
use log::info;

use cnheat_core::consts::{CELL_ID_COL, CHR_COL, END_COL, START_COL};
use cnheat_core::models::{Bin, ObservedBins};
use cnheat_core::utils::{column_index, get_dynamic_reader, parse_integer, parse_value, table_reader};
use cnheat_core::{HeatmapError, Result, Separator};

///
/// Sparse per-cell, per-bin values of one value column of the segment table.
///
#[derive(Debug, Clone, Default)]
pub struct SegmentTable {
    /// sample id -> bin -> value (NaN for `NA`)
    pub values: HashMap<String, HashMap<Bin, f64>>,
    /// every `(start, end)` seen per chromosome, across all samples
    pub bins: ObservedBins,
    /// distinct sample ids, sorted
    pub samples: Vec<String>,
}

impl SegmentTable {
    ///
    /// Read a segment table from disk.
    ///
    /// # Arguments
    /// - path: path to the (optionally gzipped) table
    /// - separator: field delimiter
    /// - value_column: column holding the plotted value
    pub fn from_path(path: &Path, separator: Separator, value_column: &str) -> Result<Self> {
        let reader = get_dynamic_reader(path)?;
        let table = Self::from_reader(reader, separator, value_column)?;

        info!(
            "Read {} sample(s) over {} chromosome(s) from {}",
            table.samples.len(),
            table.bins.len(),
            path.display()
        );

        Ok(table)
    }

    ///
    /// Parse a segment table from any reader. The header must name `cell_id`, `chr`,
    /// `start`, `end` and `value_column`.
    ///
    /// # Errors
    /// [HeatmapError::DuplicateSegment] when a (sample, bin) pair appears twice.
    pub fn from_reader<R: Read>(reader: R, separator: Separator, value_column: &str) -> Result<Self> {
        let mut table = table_reader(reader, separator);

        let headers = table.headers()?.clone();
        let cell_idx = column_index(&headers, CELL_ID_COL)?;
        let value_idx = column_index(&headers, value_column)?;
        let chr_idx = column_index(&headers, CHR_COL)?;
        let start_idx = column_index(&headers, START_COL)?;
        let end_idx = column_index(&headers, END_COL)?;

        let mut values: HashMap<String, HashMap<Bin, f64>> = HashMap::default();
        let mut bins = ObservedBins::new();

        for record in table.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());

            let field = |idx: usize| record.get(idx).unwrap_or_default();

            let sample_id = field(cell_idx);
            let value = parse_value(field(value_idx), value_column, line)?;
            let chrom = field(chr_idx);
            let start = parse_integer(field(start_idx), START_COL, line)?;
            let end = parse_integer(field(end_idx), END_COL, line)?;

            if start >= end {
                return Err(HeatmapError::InvalidValue {
                    column: END_COL.to_string(),
                    value: end.to_string(),
                    line,
                });
            }

            let bin = Bin::new(chrom, start, end);

            bins.entry(chrom.to_string())
                .or_default()
                .insert((start, end));

            let sample_values = values.entry(sample_id.to_string()).or_default();
            if sample_values.contains_key(&bin) {
                return Err(HeatmapError::DuplicateSegment {
                    sample: sample_id.to_string(),
                    bin: bin.to_string(),
                });
            }
            sample_values.insert(bin, value);
        }

        let mut samples: Vec<String> = values.keys().cloned().collect();
        samples.sort();

        Ok(SegmentTable {
            values,
            bins,
            samples,
        })
    }

    /// Value of one sample at one bin, if the pair was present in the table.
    pub fn value(&self, sample: &str, bin: &Bin) -> Option<f64> {
        self.values.get(sample).and_then(|v| v.get(bin)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn csv_table() -> &'static str {
        "cell_id,chr,start,end,copy,state\n\
         B,1,1,500000,2.1,2\n\
         A,1,1,500000,NA,2\n\
         A,1,500001,1000000,3.0,3\n\
         B,X,1,500000,1.0,1\n"
    }

    #[rstest]
    fn test_read_values(csv_table: &str) {
        let table = SegmentTable::from_reader(csv_table.as_bytes(), Separator::Comma, "copy").unwrap();

        assert_eq!(table.samples, vec!["A".to_string(), "B".to_string()]);
        assert!(table.value("A", &Bin::new("1", 1, 500_000)).unwrap().is_nan());
        assert_eq!(table.value("A", &Bin::new("1", 500_001, 1_000_000)), Some(3.0));
        assert_eq!(table.value("B", &Bin::new("X", 1, 500_000)), Some(1.0));
        assert_eq!(table.value("B", &Bin::new("1", 500_001, 1_000_000)), None);
    }

    #[rstest]
    fn test_observed_bins(csv_table: &str) {
        let table = SegmentTable::from_reader(csv_table.as_bytes(), Separator::Comma, "state").unwrap();

        assert_eq!(table.bins.len(), 2);
        assert_eq!(table.bins["1"].len(), 2);
        assert_eq!(table.bins["X"].len(), 1);
    }

    #[rstest]
    fn test_tab_separated() {
        let raw = "cell_id\tchr\tstart\tend\tcopy\nA\t2\t0\t10\t1.5\n";
        let table = SegmentTable::from_reader(raw.as_bytes(), Separator::Tab, "copy").unwrap();

        assert_eq!(table.value("A", &Bin::new("2", 0, 10)), Some(1.5));
    }

    #[rstest]
    fn test_duplicate_segment() {
        let raw = "cell_id,chr,start,end,copy\nA,1,0,10,1.0\nA,1,0,10,2.0\n";
        let err = SegmentTable::from_reader(raw.as_bytes(), Separator::Comma, "copy").unwrap_err();

        match err {
            HeatmapError::DuplicateSegment { sample, bin } => {
                assert_eq!(sample, "A");
                assert_eq!(bin, "1:0-10");
            }
            other => panic!("expected duplicate segment error, got {:?}", other),
        }
    }

    #[rstest]
    fn test_missing_value_column(csv_table: &str) {
        let err = SegmentTable::from_reader(csv_table.as_bytes(), Separator::Comma, "reads").unwrap_err();
        assert!(matches!(err, HeatmapError::MissingColumn { .. }));
    }

    #[rstest]
    #[case("A,1,x,10,1.0")]
    #[case("A,1,0,10,one")]
    #[case("A,1,10,10,1.0")]
    fn test_invalid_rows(#[case] row: &str) {
        let raw = format!("cell_id,chr,start,end,copy\n{}\n", row);
        let err = SegmentTable::from_reader(raw.as_bytes(), Separator::Comma, "copy").unwrap_err();
        assert!(matches!(err, HeatmapError::InvalidValue { .. }));
    }
}
