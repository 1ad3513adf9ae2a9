pub mod volume;

pub use volume::MacOSVolumeManager;
