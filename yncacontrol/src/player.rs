use std::time::Duration;

use crate::errors::BridgeError;
use crate::model::PlayerSnapshot;

/// Consumed surface of the player daemon.
///
/// The daemon's wire protocol is not this crate's business; implementations
/// adapt a full client library to the handful of capabilities the controller
/// needs. Every method maps daemon failures to
/// [`BridgeError::PlayerProtocol`], which is fatal to the current daemon
/// connection.
pub trait PlayerLink {
    /// Polls playback state, elapsed position and audio format.
    fn snapshot(&mut self) -> Result<PlayerSnapshot, BridgeError>;

    /// Blocks until the daemon reports a player-subsystem change. There is
    /// no timeout: a hung daemon connection blocks the controller until the
    /// daemon itself reports an error.
    fn wait_player_change(&mut self) -> Result<(), BridgeError>;

    fn play(&mut self) -> Result<(), BridgeError>;

    fn pause(&mut self) -> Result<(), BridgeError>;

    fn stop(&mut self) -> Result<(), BridgeError>;

    /// Seeks within the current track.
    fn seek_current(&mut self, position: Duration) -> Result<(), BridgeError>;

    /// Identity of the track currently loaded, if any.
    fn current_track_uri(&mut self) -> Result<Option<String>, BridgeError>;

    /// Whether this daemon build exposes the per-track annotation store.
    fn supports_annotations(&mut self) -> Result<bool, BridgeError>;

    /// First stored sound-program annotation for `uri`. Absence is `None`,
    /// not an error.
    fn sound_annotation(&mut self, uri: &str) -> Result<Option<String>, BridgeError>;
}
