use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    // Resolution, connect and write failures on the receiver control port.
    // Swallowed at the connection scope; the next player event retries.
    #[error("Receiver transport error: {0}")]
    ReceiverTransport(String),
    // Fatal to the current player-daemon connection; triggers a restart.
    #[error("Player protocol error: {0}")]
    PlayerProtocol(String),
}

impl BridgeError {
    pub fn receiver_transport(message: &str) -> Self {
        BridgeError::ReceiverTransport(message.to_string())
    }

    pub fn player_protocol(message: &str) -> Self {
        BridgeError::PlayerProtocol(message.to_string())
    }
}
