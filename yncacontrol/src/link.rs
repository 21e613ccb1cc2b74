use tracing::warn;

use crate::commands::ReceiverCommand;
use crate::errors::BridgeError;

/// Control link to the receiver.
///
/// Implementations hold at most one live connection, opened immediately
/// before a command sequence and released on every exit path. The link is
/// driven synchronously by a single caller; concurrent use is not supported.
pub trait ReceiverLink {
    /// Establishes the connection. Failure is non-fatal to the caller; the
    /// driver loop retries on the next relevant player event.
    fn connect(&mut self) -> Result<(), BridgeError>;

    /// Closes the connection. Close failures are ignored.
    fn disconnect(&mut self);

    /// Writes the command and waits out the inter-command settle interval.
    /// No reply is read.
    fn send_directive(&mut self, command: &ReceiverCommand) -> Result<(), BridgeError>;

    /// Writes the command and collects everything the receiver says until it
    /// goes silent. The result may contain unrelated status lines; use
    /// [`response_has_line`] to look for the expected reply.
    fn send_query(&mut self, command: &ReceiverCommand) -> Result<String, BridgeError>;

    /// Runs `sequence` inside a connect/disconnect scope.
    ///
    /// Transport errors from `connect` or from the sequence itself are
    /// logged and swallowed; the connection is closed on every path,
    /// including an early return out of `sequence`.
    fn with_connection<F>(&mut self, sequence: F)
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<(), BridgeError>,
    {
        if let Err(err) = self.connect() {
            warn!("Receiver connection failed: {}", err);
            return;
        }

        if let Err(err) = sequence(self) {
            warn!("Receiver command sequence abandoned: {}", err);
        }

        self.disconnect();
    }
}

/// True when `response` contains `line` as a complete CRLF-terminated line.
///
/// Replies are indistinguishable from unsolicited status broadcasts, so this
/// is the only way to recognize the answer to a query.
pub fn response_has_line(response: &str, line: &str) -> bool {
    response.contains(&format!("{line}\r\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_line_match() {
        let response = "@MAIN:VOL=-38.5\r\n@MAIN:PWR=On\r\n";
        assert!(response_has_line(response, "@MAIN:PWR=On"));
        assert!(response_has_line(response, "@MAIN:VOL=-38.5"));
    }

    #[test]
    fn test_unterminated_line_does_not_match() {
        // A partial line is not a complete report yet.
        assert!(!response_has_line("@MAIN:PWR=On", "@MAIN:PWR=On"));
        assert!(!response_has_line("", "@MAIN:PWR=On"));
    }

    #[test]
    fn test_mismatched_value_does_not_match() {
        let response = "@MAIN:INP=AV4\r\n";
        assert!(!response_has_line(response, "@MAIN:INP=HDMI1"));
    }
}
