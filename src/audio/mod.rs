//! Audio output module.
//!
//! Provides the playback collaborator the scheduler dispatches chimes to.

#[cfg(feature = "playback")]
pub mod device;
pub mod player;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used items
#[cfg(feature = "playback")]
pub use device::DevicePlayer;
pub use player::{
    clamp_volume, preflight, volume_to_gain, AudioPlayer, DryRunPlayer, DEFAULT_VOLUME,
};
