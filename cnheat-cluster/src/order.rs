use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info};

use cnheat_core::consts::{CELL_ID_COL, MIN_SAMPLES};
use cnheat_core::utils::{column_index, get_dynamic_reader, parse_integer, table_reader};
use cnheat_core::{Result, Separator};
use cnheat_io::Grouping;
use cnheat_matrix::CopyNumberMatrix;

use crate::distance::CondensedDistances;
use crate::linkage::Dendrogram;

///
/// Sample ids of `matrix` in average-linkage leaf order.
///
pub fn leaf_order(matrix: &CopyNumberMatrix) -> Vec<String> {
    let distances = CondensedDistances::euclidean(matrix.values());
    let dendrogram = Dendrogram::average_linkage(distances);

    dendrogram
        .leaves()
        .into_iter()
        .map(|i| matrix.samples()[i].clone())
        .collect()
}

/// Leaf order of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOrder {
    pub group: String,
    pub samples: Vec<String>,
}

/// One line of the order file.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub cell_id: String,
    pub order: usize,
}

///
/// Clustering order of every group with enough samples, in group order.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOrder {
    /// header of the order column, `<plot_by_col>_heatmap_order`
    pub column: String,
    pub groups: Vec<GroupOrder>,
}

impl ClusterOrder {
    ///
    /// Cluster each group separately. Group members missing from the matrix are ignored and
    /// groups left with fewer than two samples are skipped.
    ///
    pub fn compute(matrix: &CopyNumberMatrix, grouping: &Grouping, column: &str) -> Self {
        let mut groups = Vec::with_capacity(grouping.len());

        for (group, members) in grouping.iter() {
            let subset = matrix.select(members);
            if subset.nrows() < MIN_SAMPLES {
                debug!(
                    "Skipping clustering of group {} with {} sample(s)",
                    group,
                    subset.nrows()
                );
                continue;
            }

            debug!("Clustering {} sample(s) of group {}", subset.nrows(), group);
            groups.push(GroupOrder {
                group: group.to_string(),
                samples: leaf_order(&subset),
            });
        }

        ClusterOrder {
            column: column.to_string(),
            groups,
        }
    }

    /// Total number of ordered samples over all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.samples.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Order file rows: group after group, index restarting at 0 for each group.
    pub fn records(&self) -> Vec<OrderRecord> {
        self.groups
            .iter()
            .flat_map(|g| {
                g.samples.iter().enumerate().map(|(order, cell_id)| OrderRecord {
                    cell_id: cell_id.clone(),
                    order,
                })
            })
            .collect()
    }

    ///
    /// Write the order as CSV: header `cell_id,<column>`, then one `cell_id,index` line per
    /// sample.
    ///
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);

        out.write_record([CELL_ID_COL, self.column.as_str()])?;
        for record in self.records() {
            out.write_record([record.cell_id.as_str(), record.order.to_string().as_str()])?;
        }
        out.flush()?;

        Ok(())
    }

    /// The whole order is already in memory, so the file is only created once there is
    /// something complete to write.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write(BufWriter::new(file))?;

        info!(
            "Wrote cluster order of {} sample(s) in {} group(s) to {}",
            self.len(),
            self.groups.len(),
            path.display()
        );

        Ok(())
    }
}

///
/// Read an order file back. Returns the order column name and the records in file order.
///
pub fn read_cluster_order(path: &Path) -> Result<(String, Vec<OrderRecord>)> {
    read_cluster_order_from(get_dynamic_reader(path)?)
}

pub fn read_cluster_order_from<R: Read>(reader: R) -> Result<(String, Vec<OrderRecord>)> {
    let mut table = table_reader(reader, Separator::Comma);

    let headers = table.headers()?.clone();
    let cell_idx = column_index(&headers, CELL_ID_COL)?;
    let order_idx = if cell_idx == 0 { 1 } else { 0 };
    let column = headers.get(order_idx).unwrap_or_default().to_string();
    let order_idx = column_index(&headers, &column)?;

    let mut records = Vec::new();
    for record in table.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let raw_order = record.get(order_idx).unwrap_or_default();

        records.push(OrderRecord {
            cell_id: record.get(cell_idx).unwrap_or_default().to_string(),
            order: parse_integer(raw_order, &column, line)? as usize,
        });
    }

    Ok((column, records))
}

#[cfg(test)]
mod tests {
    use super::*;

    use cnheat_core::models::Bin;
    use ndarray::array;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    #[fixture]
    fn matrix() -> CopyNumberMatrix {
        let samples = ["A", "B", "C", "D", "E"].iter().map(|s| s.to_string()).collect();
        let bins = vec![Bin::new("1", 0, 10), Bin::new("2", 0, 10)];
        let values = array![[0.0, 0.0], [10.0, 10.0], [1.0, 0.0], [11.0, 10.0], [5.0, 5.0]];
        CopyNumberMatrix::from_parts(samples, bins, values)
    }

    fn ids(samples: &[&str]) -> Vec<String> {
        samples.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    fn test_leaf_order_places_similar_rows_together(matrix: CopyNumberMatrix) {
        let subset = matrix.select(&ids(&["A", "B", "C", "D"]));
        assert_eq!(leaf_order(&subset), ids(&["A", "C", "B", "D"]));
    }

    #[rstest]
    fn test_single_group(matrix: CopyNumberMatrix) {
        let grouping = Grouping::single("all", matrix.samples().to_vec());
        let order = ClusterOrder::compute(&matrix, &grouping, "all_heatmap_order");

        assert_eq!(order.groups.len(), 1);
        assert_eq!(order.len(), 5);

        let records = order.records();
        let indices: Vec<usize> = records.iter().map(|r| r.order).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[rstest]
    fn test_small_groups_are_skipped(matrix: CopyNumberMatrix) {
        let mut grouping = Grouping::new();
        for (group, sample) in [("g1", "A"), ("g2", "B"), ("g1", "C"), ("g2", "Q")] {
            grouping.push(group, sample);
        }
        let order = ClusterOrder::compute(&matrix, &grouping, "library_id_heatmap_order");

        assert_eq!(order.groups.len(), 1);
        assert_eq!(order.groups[0].group, "g1");
        assert_eq!(order.groups[0].samples.len(), 2);
    }

    #[rstest]
    fn test_indices_restart_per_group(matrix: CopyNumberMatrix) {
        let mut grouping = Grouping::new();
        for (group, sample) in [("g1", "A"), ("g1", "C"), ("g2", "B"), ("g2", "D"), ("g2", "E")] {
            grouping.push(group, sample);
        }
        let order = ClusterOrder::compute(&matrix, &grouping, "x_heatmap_order");

        let indices: Vec<usize> = order.records().iter().map(|r| r.order).collect();
        assert_eq!(indices, vec![0, 1, 0, 1, 2]);
    }

    #[rstest]
    fn test_write_format(matrix: CopyNumberMatrix) {
        let subset = matrix.select(&ids(&["A", "B", "C", "D"]));
        let grouping = Grouping::single("all", subset.samples().to_vec());
        let order = ClusterOrder::compute(&subset, &grouping, "all_heatmap_order");

        let mut buffer: Vec<u8> = Vec::new();
        order.write(&mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "cell_id,all_heatmap_order\nA,0\nC,1\nB,2\nD,3\n"
        );
    }

    #[rstest]
    fn test_round_trip(matrix: CopyNumberMatrix) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("order.csv");

        let grouping = Grouping::single("all", matrix.samples().to_vec());
        let order = ClusterOrder::compute(&matrix, &grouping, "all_heatmap_order");
        order.write_to_file(&path).unwrap();

        let (column, records) = read_cluster_order(&path).unwrap();
        assert_eq!(column, "all_heatmap_order");
        assert_eq!(records, order.records());
    }
}
