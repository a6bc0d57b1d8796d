use std::fmt::{self, Display};

///
/// Bin struct, one fixed-width genomic window of the copy-number segmentation.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
pub struct Bin {
    pub chr: String,
    pub start: u64,
    pub end: u64,
}

impl Bin {
    pub fn new(chr: &str, start: u64, end: u64) -> Self {
        Bin {
            chr: chr.to_string(),
            start,
            end,
        }
    }

    ///
    /// Get width of the bin
    ///
    pub fn width(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
}

impl Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chr, self.start, self.end)
    }
}
