//! Progress markers of a single pipeline run.

use std::fmt;

/// The state a pipeline run is in.
///
/// A run moves `Idle → Fetching → Hashing → {Comparing | Reporting} →
/// Materializing → Done`, skipping `Materializing` when only reporting. A
/// failure stops the run in whatever stage it happened, see
/// [`Error::stage`](crate::Error::stage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Idle,
    Fetching,
    Hashing,
    Comparing,
    Reporting,
    Materializing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Fetching => "fetching",
            Stage::Hashing => "hashing",
            Stage::Comparing => "comparing",
            Stage::Reporting => "reporting",
            Stage::Materializing => "materializing",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}
