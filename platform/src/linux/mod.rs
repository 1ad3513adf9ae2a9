pub mod volume;

pub use volume::LinuxVolumeManager;
