use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::commands::ReceiverCommand;
use crate::errors::BridgeError;
use crate::link::ReceiverLink;

/// Well-known control port of the receiver.
pub const YNCA_TCP_PORT: u16 = 50000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// The receiver wants at least 100ms of quiet after every command; 200ms is
/// the value that holds up in practice. The same interval doubles as the
/// silence window marking the end of a query response.
const COMMAND_SETTLE: Duration = Duration::from_millis(200);

/// TCP link speaking the receiver's line-oriented control protocol.
///
/// The protocol has no message boundaries, sequence numbers or framing
/// beyond CRLF-terminated lines, and the receiver freely interleaves
/// unsolicited status lines with replies. Message completion is therefore
/// inferred from communication silence, which makes every exchange cost at
/// least one settle interval. Acceptable: commands only flow on rare
/// playback-state transitions.
pub struct YncaTcpLink {
    host: String,
    port: u16,
    timeout: Duration,
    stream: Option<TcpStream>,
}

impl YncaTcpLink {
    pub fn new(host: &str, port: u16) -> Self {
        YncaTcpLink {
            host: host.to_string(),
            port,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            stream: None,
        }
    }
}

impl ReceiverLink for YncaTcpLink {
    fn connect(&mut self) -> Result<(), BridgeError> {
        let address = if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        };

        let mut last_err = None;
        for addr in address.to_socket_addrs().map_err(|_| {
            BridgeError::receiver_transport(&format!("Failed to resolve {address}"))
        })? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    stream.set_write_timeout(Some(self.timeout)).map_err(|_| {
                        BridgeError::receiver_transport(&format!(
                            "Failed to set socket timeout for {address}"
                        ))
                    })?;

                    debug!("Connected to receiver at {}", addr);
                    self.stream = Some(stream);
                    return Ok(());
                }
                Err(err) => {
                    last_err = Some((addr, err));
                }
            }
        }

        match last_err {
            Some((addr, err)) => Err(BridgeError::receiver_transport(&format!(
                "Failed to connect to {} via {}: {}",
                self.host, addr, err
            ))),
            None => Err(BridgeError::receiver_transport(&format!(
                "No socket addresses resolved for {address}"
            ))),
        }
    }

    fn disconnect(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    fn send_directive(&mut self, command: &ReceiverCommand) -> Result<(), BridgeError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| BridgeError::receiver_transport("Receiver link is not connected"))?;

        write_command(stream, command).map_err(|err| {
            BridgeError::receiver_transport(&format!(
                "Failed to send {} to {}: {}",
                command, self.host, err
            ))
        })?;

        debug!("Directive sent to {}: {}", self.host, command);
        thread::sleep(COMMAND_SETTLE);
        Ok(())
    }

    fn send_query(&mut self, command: &ReceiverCommand) -> Result<String, BridgeError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| BridgeError::receiver_transport("Receiver link is not connected"))?;

        // Drain unsolicited output already sitting in the socket buffer so it
        // cannot be mistaken for part of the reply.
        let mut stale = Vec::new();
        read_available(stream, &mut stale).map_err(|err| {
            BridgeError::receiver_transport(&format!(
                "Failed to drain receiver socket for {}: {}",
                self.host, err
            ))
        })?;
        if !stale.is_empty() {
            debug!("Discarded {} stale byte(s) from {}", stale.len(), self.host);
        }

        write_command(stream, command).map_err(|err| {
            BridgeError::receiver_transport(&format!(
                "Failed to send {} to {}: {}",
                command, self.host, err
            ))
        })?;

        // Keep collecting until the socket stays quiet for one full settle
        // interval. The first line received is not assumed to be the reply:
        // the receiver may emit it after unrelated status lines.
        let mut response = Vec::new();
        loop {
            thread::sleep(COMMAND_SETTLE);
            let appended = read_available(stream, &mut response).map_err(|err| {
                BridgeError::receiver_transport(&format!(
                    "Failed to read receiver response from {}: {}",
                    self.host, err
                ))
            })?;
            if appended == 0 {
                break;
            }
        }

        let response = String::from_utf8_lossy(&response).into_owned();
        debug!("Query {} on {} returned {:?}", command, self.host, response);
        Ok(response)
    }
}

fn write_command(stream: &mut TcpStream, command: &ReceiverCommand) -> io::Result<()> {
    stream.write_all(format!("{command}\r\n").as_bytes())?;
    stream.flush()
}

/// Reads whatever is currently buffered on the socket without blocking.
/// Returns the number of bytes appended to `buf`.
fn read_available(stream: &mut TcpStream, buf: &mut Vec<u8>) -> io::Result<usize> {
    stream.set_nonblocking(true)?;

    let mut appended = 0;
    let mut chunk = [0u8; 4096];
    let outcome = loop {
        match stream.read(&mut chunk) {
            // Peer closed; whatever was buffered has been consumed.
            Ok(0) => break Ok(appended),
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                appended += n;
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => break Ok(appended),
            Err(err) => break Err(err),
        }
    };

    stream.set_nonblocking(false)?;
    outcome
}
