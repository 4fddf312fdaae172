// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! HTTP/1.1 request intake: the incremental [`RequestParser`] and the TCP
//! transport feeding it.

mod config;
mod parser;

pub use config::*;
pub use parser::*;

use frammento_http::{
    HttpParseError,
    Request,
};

use log::{debug, error, info, trace, warn};

use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpListener,
    task,
    time::timeout,
};

use std::{
    fmt,
    io,
    net::SocketAddr,
    sync::Arc,
};

/// The bytes a telnet client sends when the user presses `Ctrl+C`
/// (IAC IP IAC DO TIMING-MARK).
pub const TELNET_INTERRUPT: &[u8] = b"\xff\xf4\xff\xfd\x06";

const RESPONSE_NO_CONTENT: &[u8] = b"HTTP/1.1 204 No Content\r\n\r\n";
const RESPONSE_BAD_REQUEST: &[u8] = b"HTTP/1.1 400 Bad Request\r\nConnection: close\r\n\r\n";

#[derive(Debug)]
pub enum ExchangeError {
    MalformedData(HttpParseError),
    TimedOut,
    ConnectionClosed,
    TerminatedByClient,
    Io(io::Error),
}

impl From<io::Error> for ExchangeError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<HttpParseError> for ExchangeError {
    fn from(value: HttpParseError) -> Self {
        Self::MalformedData(value)
    }
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedData(error) => write!(f, "malformed request: {error}"),
            Self::TimedOut => f.write_str("timed out waiting for the client"),
            Self::ConnectionClosed => f.write_str("connection closed before the request was complete"),
            Self::TerminatedByClient => f.write_str("connection was terminated by client"),
            Self::Io(error) => write!(f, "I/O error: {error}"),
        }
    }
}

impl std::error::Error for ExchangeError {}

/// Reads chunks from the stream and feeds them to the parser until a full
/// request has been received.
///
/// On failure the parser is reset, so it can be reused for another attempt.
pub async fn read_request<R>(stream: &mut R, parser: &mut RequestParser, config: &ListenerConfig) -> Result<Request, ExchangeError>
        where R: AsyncRead + Unpin {
    let result = read_chunks_until_complete(stream, parser, config).await;
    if result.is_err() {
        parser.reset();
    }
    result
}

async fn read_chunks_until_complete<R>(stream: &mut R, parser: &mut RequestParser, config: &ListenerConfig) -> Result<Request, ExchangeError>
        where R: AsyncRead + Unpin {
    let mut buffer = vec![0u8; config.chunk_length.max(1)];

    loop {
        let read = match timeout(config.read_timeout, stream.read(&mut buffer)).await {
            Ok(read) => read?,
            Err(_) => return Err(ExchangeError::TimedOut),
        };

        if read == 0 {
            return Err(ExchangeError::ConnectionClosed);
        }

        let chunk = &buffer[..read];
        if chunk == TELNET_INTERRUPT {
            return Err(ExchangeError::TerminatedByClient);
        }

        trace!("Received chunk of {} bytes", read);

        #[cfg(feature = "debugging")]
        println!("[DEBUG] Received data: {:?}", String::from_utf8_lossy(chunk));

        parser.feed(chunk)?;

        if let Some(request) = parser.extract() {
            return Ok(request);
        }
    }
}

/// Reads a single request from the stream and answers it with a fixed status
/// line. The stream is shut down afterwards.
pub async fn handle_connection<S>(mut stream: S, config: &ListenerConfig) -> Result<Request, ExchangeError>
        where S: AsyncRead + AsyncWrite + Unpin {
    let mut parser = RequestParser::new();
    let result = read_request(&mut stream, &mut parser, config).await;

    let response = match &result {
        Ok(_) => Some(RESPONSE_NO_CONTENT),
        Err(ExchangeError::MalformedData(_)) => Some(RESPONSE_BAD_REQUEST),
        Err(_) => None,
    };

    if let Some(response) = response {
        stream.write_all(response).await?;
        stream.flush().await?;
    }

    _ = stream.shutdown().await;
    result
}

/// Start listening on the address of the configuration. Every complete
/// request is handed to `consumer`, together with the address of the peer.
pub async fn start<F>(config: ListenerConfig, consumer: F) -> io::Result<()>
        where F: Fn(SocketAddr, Request) + Send + Sync + 'static {
    let listener = TcpListener::bind(&config.address).await?;
    info!("Started listening on {}", listener.local_addr()?);
    serve(listener, config, consumer).await
}

/// Accept connections from an already bound listener, one task per
/// connection.
pub async fn serve<F>(listener: TcpListener, config: ListenerConfig, consumer: F) -> io::Result<()>
        where F: Fn(SocketAddr, Request) + Send + Sync + 'static {
    let config = Arc::new(config);
    let consumer = Arc::new(consumer);

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Error accepting connection: {}", e);
                task::yield_now().await;
                continue;
            }
        };

        debug!("Accepted connection from {}", peer);
        let config = Arc::clone(&config);
        let consumer = Arc::clone(&consumer);
        task::spawn(async move {
            match handle_connection(stream, &config).await {
                Ok(request) => (*consumer)(peer, request),
                Err(ExchangeError::MalformedData(e)) => warn!("Rejected request from {}: {}", peer, e),
                Err(e) => debug!("Client error ({}): {}", peer, e),
            }
        });
    }
}
