//! Receiver command values.
//!
//! The control protocol is line oriented: `@ZONE:PARAMETER=VALUE`, CRLF
//! terminated. Commands ending in `=?` are queries; the receiver reports the
//! current value with the same `@ZONE:PARAMETER=` prefix, so a query's
//! expected reply looks exactly like the directive that would set it.

use std::fmt;

/// The zone this bridge drives. Multi-zone receivers expose the same
/// parameters under other zone names, but the bridge only ever controls the
/// main one.
const ZONE: &str = "MAIN";

/// A single line of the receiver control protocol, without the CRLF.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiverCommand(String);

impl ReceiverCommand {
    fn new(text: String) -> Self {
        ReceiverCommand(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiverCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Command values for one controller session, built once from the configured
/// input and scene names.
#[derive(Clone, Debug)]
pub struct CommandSet {
    /// Query for the current power state.
    pub power_query: ReceiverCommand,
    /// Power-on directive; also the report line a powered-on receiver sends
    /// back for the power query.
    pub power_on: ReceiverCommand,
    /// Query for the currently selected input.
    pub input_query: ReceiverCommand,
    /// Report line the receiver sends when the configured input is active.
    pub input_active_line: String,
    /// Directive selecting the configured scene preset.
    pub scene_select: ReceiverCommand,
    /// Directive enabling DSP-bypass passthrough for multi-channel material.
    pub straight_on: ReceiverCommand,
}

impl CommandSet {
    pub fn new(input: &str, scene: &str) -> Self {
        CommandSet {
            power_query: ReceiverCommand::new(format!("@{ZONE}:PWR=?")),
            power_on: ReceiverCommand::new(format!("@{ZONE}:PWR=On")),
            input_query: ReceiverCommand::new(format!("@{ZONE}:INP=?")),
            input_active_line: format!("@{ZONE}:INP={input}"),
            scene_select: ReceiverCommand::new(format!("@{ZONE}:SCENE={scene}")),
            straight_on: ReceiverCommand::new(format!("@{ZONE}:STRAIGHT=On")),
        }
    }

    /// Directive selecting a named DSP sound program.
    pub fn sound_program(program: &str) -> ReceiverCommand {
        ReceiverCommand::new(format!("@{ZONE}:SOUNDPRG={program}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_set_construction() {
        let commands = CommandSet::new("HDMI1", "Scene 2");
        assert_eq!(commands.power_query.as_str(), "@MAIN:PWR=?");
        assert_eq!(commands.power_on.as_str(), "@MAIN:PWR=On");
        assert_eq!(commands.input_query.as_str(), "@MAIN:INP=?");
        assert_eq!(commands.input_active_line, "@MAIN:INP=HDMI1");
        assert_eq!(commands.scene_select.as_str(), "@MAIN:SCENE=Scene 2");
        assert_eq!(commands.straight_on.as_str(), "@MAIN:STRAIGHT=On");
    }

    #[test]
    fn test_sound_program_command() {
        let command = CommandSet::sound_program("2ch Stereo");
        assert_eq!(command.as_str(), "@MAIN:SOUNDPRG=2ch Stereo");
    }

    #[test]
    fn test_command_display_matches_wire_text() {
        let commands = CommandSet::new("AV4", "Scene 1");
        assert_eq!(format!("{}", commands.power_query), "@MAIN:PWR=?");
    }
}
