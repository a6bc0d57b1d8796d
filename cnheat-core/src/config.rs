use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{ALL_GROUP, DEFAULT_COLOR_COL, INTEGER_COPY_NUMBER, ORDER_COL_SUFFIX};
use crate::errors::HeatmapError;

/// Field delimiter of the segment and metrics tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    #[default]
    Comma,
    Tab,
}

impl Separator {
    pub fn as_byte(&self) -> u8 {
        match self {
            Separator::Comma => b',',
            Separator::Tab => b'\t',
        }
    }
}

impl FromStr for Separator {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "comma" => Ok(Separator::Comma),
            "tab" => Ok(Separator::Tab),
            _ => Err(HeatmapError::InvalidSeparator(s.to_string())),
        }
    }
}

impl Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Separator::Comma => write!(f, "comma"),
            Separator::Tab => write!(f, "tab"),
        }
    }
}

///
/// Options controlling how the tables are read, which samples are kept, and how the
/// heatmap pages are laid out.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapConfig {
    /// Delimiter for both input tables.
    pub separator: Separator,
    /// Segment table column holding the plotted value. `integer_copy_number` switches the
    /// heatmap to the discrete copy-number palette.
    pub column_name: String,
    /// Metrics column used to split samples into groups. `all` puts every sample in one group.
    pub plot_by_col: String,
    /// Metrics column used for the row color strip and the category allow-list.
    pub color_by_col: String,
    /// Categories to keep. `None` (or an empty list) keeps every category.
    pub cellcalls: Option<Vec<String>>,
    /// Inclusive upper bound on the MAD score. NaN scores never pass.
    pub mad_threshold: Option<f64>,
    /// Inclusive lower bound on the number of mapped reads.
    pub numreads_threshold: Option<u64>,
    /// Draw every sample of a group on one page instead of chunks of 1000.
    pub high_memory: bool,
    /// Prefix for every page title.
    pub plot_title: String,
}

impl HeatmapConfig {
    pub fn new(column_name: &str) -> Self {
        HeatmapConfig {
            separator: Separator::default(),
            column_name: column_name.to_string(),
            plot_by_col: ALL_GROUP.to_string(),
            color_by_col: DEFAULT_COLOR_COL.to_string(),
            cellcalls: None,
            mad_threshold: None,
            numreads_threshold: None,
            high_memory: false,
            plot_title: String::new(),
        }
    }

    pub fn grouping_enabled(&self) -> bool {
        self.plot_by_col != ALL_GROUP
    }

    /// The active category allow-list, if any.
    pub fn category_allow_list(&self) -> Option<&[String]> {
        match &self.cellcalls {
            Some(calls) if !calls.is_empty() => Some(calls.as_slice()),
            _ => None,
        }
    }

    ///
    /// Clustering honours the metrics filters (and grouping) only when all three of them
    /// are set; otherwise it runs once over every sample.
    ///
    pub fn clustering_filters_configured(&self) -> bool {
        self.category_allow_list().is_some()
            && self.mad_threshold.is_some()
            && self.numreads_threshold.is_some()
    }

    pub fn is_integer_copy_number(&self) -> bool {
        self.column_name == INTEGER_COPY_NUMBER
    }

    /// Header of the second column of the cluster-order file.
    pub fn order_column(&self) -> String {
        format!("{}{}", self.plot_by_col, ORDER_COL_SUFFIX)
    }
}
