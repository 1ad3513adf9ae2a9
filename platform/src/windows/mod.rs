pub mod volume;

pub use volume::WindowsVolumeManager;
