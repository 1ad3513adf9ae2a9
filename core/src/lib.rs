pub mod error;
pub mod format;
pub mod report;
pub mod resolver;
pub mod test_utils;
pub mod volume;

pub use error::ClusterError;
pub use format::readable_size;
pub use report::{normalize_identifier, select_volumes, ClusterReport, ReportSummary};
pub use resolver::{ClusterSizeResolver, CONSISTENCY_SAMPLES};
pub use volume::{GeometryProvider, Volume, VolumeGeometry, VolumeId, VolumeKind, VolumeManager};
