use crate::posix;
use anyhow::{bail, Context};
use clustinfo_core::{ClusterError, GeometryProvider, Volume, VolumeGeometry, VolumeId, VolumeKind, VolumeManager};
use std::process::Command;

const OPTICAL_FILESYSTEMS: &[&str] = &["cd9660", "udf", "cddafs"];

#[derive(Debug, PartialEq, Eq)]
struct MountEntry {
    source: String,
    target: String,
    fstype: String,
    local: bool,
}

pub struct MacOSVolumeManager;

impl MacOSVolumeManager {
    fn read_mounts() -> anyhow::Result<Vec<MountEntry>> {
        let output = Command::new("mount").output().context("Failed to run mount")?;
        if !output.status.success() {
            bail!("mount exited with {}", output.status);
        }
        Ok(Self::parse_mounts(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Parses `mount` lines of the form `/dev/disk3s1 on / (apfs, local, journaled)`.
    fn parse_mounts(output: &str) -> Vec<MountEntry> {
        output
            .lines()
            .filter_map(|line| {
                let (source, rest) = line.split_once(" on ")?;
                let open = rest.rfind(" (")?;
                let target = &rest[..open];
                let options: Vec<&str> = rest[open + 2..]
                    .trim_end_matches(')')
                    .split(',')
                    .map(str::trim)
                    .collect();
                let fstype = options.first()?.to_string();
                Some(MountEntry {
                    source: source.to_string(),
                    target: target.to_string(),
                    fstype,
                    local: options.contains(&"local"),
                })
            })
            .collect()
    }

    fn classify(entry: &MountEntry) -> VolumeKind {
        if !entry.local {
            return VolumeKind::Network;
        }

        if OPTICAL_FILESYSTEMS.contains(&entry.fstype.as_str()) {
            return VolumeKind::Optical;
        }

        if !entry.source.starts_with("/dev/disk") {
            return VolumeKind::Unknown;
        }

        // External media is attached under /Volumes; internal APFS volumes live elsewhere.
        if entry.target.starts_with("/Volumes/") {
            VolumeKind::Removable
        } else {
            VolumeKind::Fixed
        }
    }
}

impl VolumeManager for MacOSVolumeManager {
    fn enumerate_volumes(&self) -> Result<Vec<Volume>, ClusterError> {
        let mounts = Self::read_mounts().map_err(|e| ClusterError::Enumeration(format!("{:#}", e)))?;

        Ok(mounts
            .into_iter()
            .map(|entry| {
                let kind = Self::classify(&entry);
                let is_ready = posix::is_ready(&entry.target);
                log::debug!("Found mount {} on {} ({:?}, ready: {})", entry.source, entry.target, kind, is_ready);
                Volume {
                    name: entry.target,
                    kind,
                    is_ready,
                    filesystem: Some(entry.fstype),
                }
            })
            .collect())
    }

    fn total_capacity(&self, id: &VolumeId) -> Result<u64, ClusterError> {
        posix::capacity(id)
    }

    fn identifier_for(&self, volume: &Volume) -> VolumeId {
        VolumeId::new(volume.name.clone())
    }
}

impl GeometryProvider for MacOSVolumeManager {
    fn query_geometry(&self, id: &VolumeId) -> Result<VolumeGeometry, ClusterError> {
        posix::geometry(id)
    }
}
