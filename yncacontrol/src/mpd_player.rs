use std::time::Duration;

use mpd::error::{Error as MpdError, ErrorCode};
use mpd::{Client, Idle, State, Subsystem};
use tracing::debug;

use crate::errors::BridgeError;
use crate::model::{PlaybackState, PlayerSnapshot};
use crate::player::PlayerLink;

/// Annotation key holding a per-track sound program override.
const SOUND_PROGRAM_KEY: &str = "ynca_program";

/// Daemon command whose presence in the allowed-command list signals
/// annotation support.
const ANNOTATION_COMMAND: &str = "sticker";

/// [`PlayerLink`] over an MPD client connection.
pub struct MpdPlayer {
    client: Client,
}

impl MpdPlayer {
    pub fn connect(addr: &str) -> Result<Self, BridgeError> {
        let client = Client::connect(addr).map_err(|err| {
            BridgeError::player_protocol(&format!(
                "Failed to connect to player daemon at {addr}: {err}"
            ))
        })?;
        Ok(MpdPlayer { client })
    }
}

impl PlayerLink for MpdPlayer {
    fn snapshot(&mut self) -> Result<PlayerSnapshot, BridgeError> {
        let status = self.client.status().map_err(daemon_error)?;
        Ok(PlayerSnapshot {
            state: map_state(status.state),
            elapsed: status.elapsed,
            channels: status.audio.map(|format| format.chans).unwrap_or(0),
        })
    }

    fn wait_player_change(&mut self) -> Result<(), BridgeError> {
        let changed = self.client.wait(&[Subsystem::Player]).map_err(daemon_error)?;
        debug!("Player daemon reported changes: {:?}", changed);
        Ok(())
    }

    fn play(&mut self) -> Result<(), BridgeError> {
        self.client.play().map_err(daemon_error)
    }

    fn pause(&mut self) -> Result<(), BridgeError> {
        self.client.pause(true).map_err(daemon_error)
    }

    fn stop(&mut self) -> Result<(), BridgeError> {
        self.client.stop().map_err(daemon_error)
    }

    fn seek_current(&mut self, position: Duration) -> Result<(), BridgeError> {
        self.client.rewind(position.as_secs_f64()).map_err(daemon_error)
    }

    fn current_track_uri(&mut self) -> Result<Option<String>, BridgeError> {
        let song = self.client.currentsong().map_err(daemon_error)?;
        Ok(song.map(|song| song.file))
    }

    fn supports_annotations(&mut self) -> Result<bool, BridgeError> {
        let commands = self.client.commands().map_err(daemon_error)?;
        Ok(commands.iter().any(|command| command == ANNOTATION_COMMAND))
    }

    fn sound_annotation(&mut self, uri: &str) -> Result<Option<String>, BridgeError> {
        // The daemon answers a lookup miss with a "no such sticker" error
        // rather than an empty result.
        match self.client.sticker("song", uri, SOUND_PROGRAM_KEY) {
            Ok(value) => Ok(Some(value)),
            Err(MpdError::Server(ref err)) if err.code == ErrorCode::NoExist => Ok(None),
            Err(err) => Err(daemon_error(err)),
        }
    }
}

fn daemon_error(err: MpdError) -> BridgeError {
    BridgeError::player_protocol(&err.to_string())
}

fn map_state(state: State) -> PlaybackState {
    match state {
        State::Stop => PlaybackState::Stopped,
        State::Pause => PlaybackState::Paused,
        State::Play => PlaybackState::Playing,
    }
}
