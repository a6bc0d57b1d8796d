use log::{debug, warn};

use cnheat_core::consts::{MAX_SAMPLES_PER_PAGE, MIN_SAMPLES};
use cnheat_io::Grouping;
use cnheat_matrix::CopyNumberMatrix;

///
/// The samples drawn together on one heatmap page.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub group: String,
    /// rows of the page, in matrix order
    pub samples: Vec<String>,
    /// number of group members listed in the metrics table, filtered or not
    pub group_total: usize,
}

impl Page {
    /// `<plot_title> (<group>) n=<page>/<total>`
    pub fn title(&self, plot_title: &str) -> String {
        format!(
            "{} ({}) n={}/{}",
            plot_title,
            self.group,
            self.samples.len(),
            self.group_total
        )
        .trim_start()
        .to_string()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

///
/// Lay out the pages of a document.
///
/// Every group contributes the members that survived filtering. Groups with fewer than two
/// survivors are left out. Larger groups are split into pages of at most
/// [MAX_SAMPLES_PER_PAGE] rows unless `high_memory` is set.
///
pub fn plan_pages(matrix: &CopyNumberMatrix, grouping: &Grouping, high_memory: bool) -> Vec<Page> {
    let mut pages = Vec::new();

    for (group, members) in grouping.iter() {
        let survivors = matrix.select(members).samples().to_vec();

        if survivors.len() < MIN_SAMPLES {
            debug!(
                "Not plotting group {} with {} sample(s) left after filtering",
                group,
                survivors.len()
            );
            continue;
        }

        let chunk_size = match high_memory {
            true => survivors.len(),
            false => MAX_SAMPLES_PER_PAGE,
        };

        if survivors.len() > chunk_size {
            warn!(
                "Group {} has {} samples, splitting into pages of {}. Set high_memory to draw one page per group.",
                group,
                survivors.len(),
                chunk_size
            );
        }

        for chunk in survivors.chunks(chunk_size) {
            pages.push(Page {
                group: group.to_string(),
                samples: chunk.to_vec(),
                group_total: members.len(),
            });
        }
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    use cnheat_core::models::Bin;
    use ndarray::Array2;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn matrix(n: usize) -> CopyNumberMatrix {
        let samples: Vec<String> = (0..n).map(|i| format!("cell_{:05}", i)).collect();
        let bins = vec![Bin::new("1", 0, 10)];
        let values = Array2::from_elem((n, 1), 2.0);
        CopyNumberMatrix::from_parts(samples, bins, values)
    }

    #[rstest]
    fn test_large_group_is_split() {
        let matrix = matrix(1500);
        let grouping = Grouping::single("all", matrix.samples().to_vec());

        let pages = plan_pages(&matrix, &grouping, false);
        let titles: Vec<String> = pages.iter().map(|p| p.title("")).collect();

        assert_eq!(titles, vec!["(all) n=1000/1500", "(all) n=500/1500"]);
        assert_eq!(pages[1].samples[0], "cell_01000");
    }

    #[rstest]
    fn test_high_memory_keeps_one_page() {
        let matrix = matrix(1500);
        let grouping = Grouping::single("all", matrix.samples().to_vec());

        let pages = plan_pages(&matrix, &grouping, true);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title("SA1234"), "SA1234 (all) n=1500/1500");
    }

    #[rstest]
    #[case(1000, 1)]
    #[case(1001, 2)]
    #[case(2000, 2)]
    #[case(2001, 3)]
    fn test_page_count(#[case] n: usize, #[case] expected: usize) {
        let matrix = matrix(n);
        let grouping = Grouping::single("all", matrix.samples().to_vec());
        assert_eq!(plan_pages(&matrix, &grouping, false).len(), expected);
    }

    #[rstest]
    fn test_denominator_counts_filtered_members() {
        let matrix = matrix(3);
        let mut grouping = Grouping::new();
        for (group, sample) in [
            ("LIB1", "cell_00000"),
            ("LIB1", "cell_00001"),
            ("LIB1", "filtered_out"),
            ("LIB2", "cell_00002"),
            ("LIB2", "also_gone"),
        ] {
            grouping.push(group, sample);
        }

        let pages = plan_pages(&matrix, &grouping, false);

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title("run"), "run (LIB1) n=2/3");
    }
}
