//! Bridges a music-player daemon's playback state to a home-theater
//! receiver's TCP control port: power the receiver on, select the right
//! scene and sound mode when music starts, and leave it alone otherwise.

pub mod commands;
pub mod controller;
pub mod errors;
pub mod link;
pub mod model;
pub mod mpd_player;
pub mod player;
pub mod ynca_tcp;

pub use commands::{CommandSet, ReceiverCommand};
pub use controller::{BridgeSettings, PlaybackController};
pub use errors::BridgeError;
pub use link::{ReceiverLink, response_has_line};
pub use model::{PlaybackState, PlayerSnapshot};
pub use mpd_player::MpdPlayer;
pub use player::PlayerLink;
pub use ynca_tcp::{DEFAULT_TIMEOUT_SECS, YNCA_TCP_PORT, YncaTcpLink};
