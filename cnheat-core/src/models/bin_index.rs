use std::collections::{BTreeSet, HashMap, HashSet};

use crate::consts::canonical_chromosomes;
use crate::errors::{HeatmapError, Result};
use crate::models::Bin;

/// `(start, end)` pairs observed per chromosome across all samples.
pub type ObservedBins = HashMap<String, BTreeSet<(u64, u64)>>;

///
/// The canonical column layout of every heatmap: chromosomes `1..22, X, Y` in that order,
/// bins within a chromosome sorted by start.
///
#[derive(Debug, Clone)]
pub struct GenomicBinIndex {
    bins: Vec<Bin>,
    positions: HashMap<Bin, usize>,
    chromosomes: Vec<String>,
    boundaries: Vec<usize>,
}

impl GenomicBinIndex {
    ///
    /// Build the canonical bin order from the bins observed in the segment table.
    ///
    /// # Arguments
    /// - observed: chromosome to set of `(start, end)` pairs
    ///
    /// # Errors
    /// [HeatmapError::Schema] when the observed chromosomes are not exactly `1..22, X, Y`.
    pub fn build(observed: &ObservedBins) -> Result<Self> {
        let chromosomes = canonical_chromosomes();

        let expected: HashSet<&str> = chromosomes.iter().map(String::as_str).collect();
        let seen: HashSet<&str> = observed.keys().map(String::as_str).collect();

        if expected != seen {
            let missing = chromosomes
                .iter()
                .filter(|c| !seen.contains(c.as_str()))
                .cloned()
                .collect();
            let mut unexpected: Vec<String> = seen
                .difference(&expected)
                .map(|c| c.to_string())
                .collect();
            unexpected.sort();
            return Err(HeatmapError::Schema {
                missing,
                unexpected,
            });
        }

        // BTreeSet iteration is already ascending by (start, end)
        let bins: Vec<Bin> = chromosomes
            .iter()
            .flat_map(|chrom| {
                observed[chrom]
                    .iter()
                    .map(move |&(start, end)| Bin::new(chrom, start, end))
            })
            .collect();

        let positions = bins
            .iter()
            .enumerate()
            .map(|(i, bin)| (bin.clone(), i))
            .collect();

        let boundaries = chromosome_boundaries(&bins);

        Ok(GenomicBinIndex {
            bins,
            positions,
            chromosomes,
            boundaries,
        })
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Column index of a bin in the canonical order.
    pub fn position(&self, bin: &Bin) -> Option<usize> {
        self.positions.get(bin).copied()
    }

    /// Chromosome labels, one per entry of [GenomicBinIndex::chromosome_boundaries].
    pub fn chromosomes(&self) -> &[String] {
        &self.chromosomes
    }

    /// First column index of every chromosome; used for axis ticks.
    pub fn chromosome_boundaries(&self) -> &[usize] {
        &self.boundaries
    }
}

///
/// Scan an ordered bin sequence and record the index at which the chromosome label
/// changes. The first chromosome always starts at 0.
///
pub fn chromosome_boundaries(bins: &[Bin]) -> Vec<usize> {
    let mut boundaries = vec![0];

    let mut current = match bins.first() {
        Some(bin) => bin.chr.as_str(),
        None => return boundaries,
    };

    for (i, bin) in bins.iter().enumerate() {
        if bin.chr != current {
            boundaries.push(i);
            current = bin.chr.as_str();
        }
    }

    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn observed() -> ObservedBins {
        let mut observed = ObservedBins::new();
        for chrom in canonical_chromosomes() {
            let bins = observed.entry(chrom).or_default();
            // inserted out of order on purpose
            bins.insert((1_000, 2_000));
            bins.insert((0, 1_000));
        }
        observed
    }

    #[rstest]
    fn test_build_orders_chromosomes_and_starts(observed: ObservedBins) {
        let index = GenomicBinIndex::build(&observed).unwrap();

        assert_eq!(index.len(), 48);
        assert_eq!(index.bins()[0], Bin::new("1", 0, 1_000));
        assert_eq!(index.bins()[1], Bin::new("1", 1_000, 2_000));
        assert_eq!(index.bins()[2], Bin::new("2", 0, 1_000));
        assert_eq!(index.bins()[44], Bin::new("X", 0, 1_000));
        assert_eq!(index.bins()[47], Bin::new("Y", 1_000, 2_000));
        assert_eq!(index.position(&Bin::new("10", 1_000, 2_000)), Some(19));
    }

    #[rstest]
    fn test_build_is_deterministic(observed: ObservedBins) {
        let first = GenomicBinIndex::build(&observed).unwrap();
        let second = GenomicBinIndex::build(&observed.clone()).unwrap();
        assert_eq!(first.bins(), second.bins());
    }

    #[rstest]
    fn test_boundaries(observed: ObservedBins) {
        let index = GenomicBinIndex::build(&observed).unwrap();
        let expected: Vec<usize> = (0..24).map(|i| i * 2).collect();

        assert_eq!(index.chromosome_boundaries(), expected.as_slice());
        assert_eq!(index.chromosomes().len(), index.chromosome_boundaries().len());
    }

    #[rstest]
    fn test_missing_y_is_schema_error(mut observed: ObservedBins) {
        observed.remove("Y");

        match GenomicBinIndex::build(&observed) {
            Err(HeatmapError::Schema {
                missing,
                unexpected,
            }) => {
                assert_eq!(missing, vec!["Y".to_string()]);
                assert!(unexpected.is_empty());
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[rstest]
    fn test_extra_chromosome_is_schema_error(mut observed: ObservedBins) {
        observed.entry("MT".to_string()).or_default().insert((0, 100));

        let err = GenomicBinIndex::build(&observed).unwrap_err();
        assert!(matches!(err, HeatmapError::Schema { .. }));
    }

    #[rstest]
    fn test_boundaries_of_empty_sequence() {
        assert_eq!(chromosome_boundaries(&[]), vec![0]);
    }
}
