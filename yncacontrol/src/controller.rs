use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::commands::CommandSet;
use crate::errors::BridgeError;
use crate::link::{ReceiverLink, response_has_line};
use crate::model::{PlaybackState, PlayerSnapshot};
use crate::player::PlayerLink;

/// Fixed pause before reconnecting to the player daemon after an error.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Immutable control parameters for the process lifetime.
#[derive(Clone, Debug)]
pub struct BridgeSettings {
    /// Receiver input the player is wired to.
    pub input: String,
    /// Scene preset selected when playback starts.
    pub scene: String,
    /// Sound program applied when no per-track annotation overrides it.
    /// Sound-mode selection is disabled entirely when unset.
    pub default_program: Option<String>,
    /// How long the receiver needs from power-on until it makes sound.
    pub startup_delay: Duration,
}

/// Drives receiver commands from player-state transitions.
///
/// Tracks exactly one piece of state across iterations: the previous
/// playback state. Everything else is re-fetched per iteration or fixed for
/// the session.
pub struct PlaybackController<R: ReceiverLink> {
    receiver: R,
    commands: CommandSet,
    settings: BridgeSettings,
}

impl<R: ReceiverLink> PlaybackController<R> {
    pub fn new(receiver: R, settings: BridgeSettings) -> Self {
        let commands = CommandSet::new(&settings.input, &settings.scene);
        PlaybackController {
            receiver,
            commands,
            settings,
        }
    }

    /// Runs the bridge until the process is killed.
    ///
    /// Each daemon connection from `connect` is driven until it fails; the
    /// failure is logged with the daemon's own message, and after a fixed
    /// pause everything restarts from scratch: fresh connection, fresh
    /// capability probe, fresh initial state. No backoff, no retry limit.
    pub fn run_forever<P, F>(&mut self, mut connect: F) -> !
    where
        P: PlayerLink,
        F: FnMut() -> Result<P, BridgeError>,
    {
        loop {
            match connect() {
                Ok(mut player) => {
                    if let Err(err) = self.run_session(&mut player) {
                        error!("{}", err);
                    }
                }
                Err(err) => error!("{}", err),
            }
            thread::sleep(RECONNECT_DELAY);
        }
    }

    /// Drives one player-daemon connection until the daemon errors out.
    pub fn run_session<P: PlayerLink>(&mut self, player: &mut P) -> Result<(), BridgeError> {
        let overrides_enabled = self.probe_annotation_support(player)?;

        let mut previous = player.snapshot()?.state;
        info!("Player daemon connected, initial state {:?}", previous);

        loop {
            player.wait_player_change()?;
            let current = player.snapshot()?;

            if current.state == PlaybackState::Playing {
                self.handle_playing(player, previous, &current, overrides_enabled);
            }

            previous = current.state;
        }
    }

    /// Startup capability probe, run once per daemon connection. A daemon
    /// whose capability set changes without a reconnect will not be noticed
    /// until the next restart cycle.
    fn probe_annotation_support<P: PlayerLink>(
        &self,
        player: &mut P,
    ) -> Result<bool, BridgeError> {
        if self.settings.default_program.is_none() {
            return Ok(false);
        }

        let supported = player.supports_annotations()?;
        if !supported {
            warn!(
                "Player daemon lacks the annotation store, ignoring per-track sound programs. \
                 The daemon was built without it or its storage file is not configured."
            );
        }
        Ok(supported)
    }

    /// One receiver session for one observed-playing iteration.
    ///
    /// Receiver transport failures abandon the pass silently; the next
    /// player event triggers another attempt. Player failures inside the
    /// pass resurface on the next daemon wait.
    fn handle_playing<P: PlayerLink>(
        &mut self,
        player: &mut P,
        previous: PlaybackState,
        current: &PlayerSnapshot,
        overrides_enabled: bool,
    ) {
        let PlaybackController {
            receiver,
            commands,
            settings,
        } = self;

        receiver.with_connection(|link| {
            if previous != PlaybackState::Playing {
                let power_report = link.send_query(&commands.power_query)?;
                let was_powered_on =
                    response_has_line(&power_report, commands.power_on.as_str());

                if !was_powered_on {
                    // Park the player so no audio is lost while the receiver
                    // comes up. A paused player already has a position worth
                    // keeping; anything else starts the track over anyway.
                    if previous == PlaybackState::Paused {
                        player.pause()?;
                        if let Some(position) = current.elapsed {
                            player.seek_current(position)?;
                        }
                    } else {
                        player.stop()?;
                    }
                    link.send_directive(&commands.power_on)?;
                }

                link.send_directive(&commands.scene_select)?;

                if !was_powered_on {
                    thread::sleep(settings.startup_delay);
                    player.play()?;
                }
            } else {
                // Someone switched the receiver to another input while we
                // were playing; it is theirs now.
                let input_report = link.send_query(&commands.input_query)?;
                if !response_has_line(&input_report, &commands.input_active_line) {
                    info!(
                        "Receiver input moved away from {}, stopping playback",
                        settings.input
                    );
                    player.stop()?;
                    return Ok(());
                }
            }

            if let Some(default_program) = settings.default_program.as_deref() {
                let annotation = if overrides_enabled {
                    track_annotation(player)
                } else {
                    None
                };

                let sound_mode = match annotation {
                    Some(program) => CommandSet::sound_program(&program),
                    None if current.channels > 2 => commands.straight_on.clone(),
                    None => CommandSet::sound_program(default_program),
                };
                link.send_directive(&sound_mode)?;
            }

            Ok(())
        });
    }
}

/// Per-track override lookup. Any daemon hiccup here falls back to the
/// defaults rather than killing the session; a real connection loss
/// resurfaces on the next daemon wait.
fn track_annotation<P: PlayerLink>(player: &mut P) -> Option<String> {
    let uri = match player.current_track_uri() {
        Ok(Some(uri)) => uri,
        Ok(None) => return None,
        Err(err) => {
            debug!("Current track lookup failed: {}", err);
            return None;
        }
    };

    match player.sound_annotation(&uri) {
        Ok(annotation) => annotation,
        Err(err) => {
            debug!("Annotation lookup failed for {}: {}", uri, err);
            None
        }
    }
}
