use std::io::{self, Write};

use crate::{readable_size, ClusterError, ClusterSizeResolver, VolumeId, VolumeManager};

/// Strips drive separators so `D:\`, `D:` and `D` all name the same volume.
pub fn normalize_identifier(raw: &str) -> VolumeId {
    VolumeId::new(raw.replace(':', "").replace('\\', ""))
}

/// Volumes to report on: the one the caller named, or every ready local volume.
pub fn select_volumes(
    manager: &dyn VolumeManager,
    requested: Option<&str>,
) -> Result<Vec<VolumeId>, ClusterError> {
    if let Some(raw) = requested {
        let id = normalize_identifier(raw);
        log::debug!("Using requested volume '{}' as '{}'", raw, id);
        return Ok(vec![id]);
    }

    let volumes = manager.enumerate_volumes()?;
    log::info!("Enumerated {} volumes", volumes.len());

    let mut selected: Vec<VolumeId> = Vec::new();
    for volume in &volumes {
        if !volume.is_ready || !volume.kind.is_reportable() {
            log::debug!(
                "Skipping {} ({:?}, ready: {})",
                volume.name,
                volume.kind,
                volume.is_ready
            );
            continue;
        }

        let id = manager.identifier_for(volume);
        log::debug!(
            "Selected {} as {} ({:?}, {})",
            volume.name,
            id,
            volume.kind,
            volume.filesystem.as_deref().unwrap_or("unknown filesystem")
        );
        if !selected.contains(&id) {
            selected.push(id);
        }
    }

    Ok(selected)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub reported: usize,
    pub failed: usize,
}

/// Writes one cluster size line per volume, carrying on past per-volume failures.
pub struct ClusterReport<'a> {
    resolver: ClusterSizeResolver<'a>,
}

impl<'a> ClusterReport<'a> {
    pub fn new(resolver: ClusterSizeResolver<'a>) -> Self {
        Self { resolver }
    }

    pub fn run<W: Write>(&self, targets: &[VolumeId], out: &mut W) -> io::Result<ReportSummary> {
        let mut summary = ReportSummary::default();

        for id in targets {
            match self.resolver.cluster_size(id) {
                Ok(bytes) => {
                    writeln!(out, "Drive {}: Cluster Size - {}", id, readable_size(bytes))?;
                    summary.reported += 1;
                }
                Err(e) => {
                    log::debug!("Drive {} failed: {:?}", id, e);
                    writeln!(out, "Drive {}: Error {}", id, e)?;
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}
