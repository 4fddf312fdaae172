// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::time::Duration;

/// The port the listener binds to when none is given.
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerConfig {
    /// The `host:port` to listen on.
    pub address: String,

    /// The maximum number of bytes read from the socket at once. Every read
    /// is fed to the parser as one chunk.
    pub chunk_length: usize,

    /// If the client doesn't transmit anything within this time, the
    /// request is abandoned.
    pub read_timeout: Duration,
}

impl ListenerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            address: format!("{host}:{port}"),
            ..Default::default()
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            address: format!("127.0.0.1:{DEFAULT_PORT}"),
            chunk_length: 1024,
            read_timeout: Duration::from_secs(45),
        }
    }
}
