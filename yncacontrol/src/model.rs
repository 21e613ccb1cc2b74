use std::time::Duration;

/// Player transport state as reported by the daemon.
///
/// Only held as a previous/current pair across controller iterations; the
/// bridge keeps no further playback history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Paused,
    Playing,
    /// The daemon reported something with no transport meaning.
    Unknown,
}

/// One status poll from the player daemon.
#[derive(Clone, Debug)]
pub struct PlayerSnapshot {
    pub state: PlaybackState,
    /// Elapsed position in the current track, if one is loaded.
    pub elapsed: Option<Duration>,
    /// Audio channel count of the current track, 0 when unavailable.
    pub channels: u8,
}
