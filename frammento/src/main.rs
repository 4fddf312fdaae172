// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::time::{Duration, Instant};

use clap::Parser;
use frammento_http1::{ListenerConfig, DEFAULT_PORT};
use owo_colors::OwoColorize;

#[derive(Parser, Debug)]
#[command(author, version, about = "Receives HTTP/1.1 requests and prints them", long_about = None)]
pub struct Args {
    /// The address to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// The port number to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// The maximum number of bytes fed to the parser at once.
    #[arg(long, default_value_t = 1024)]
    chunk_length: usize,

    /// Seconds to wait for more data before abandoning a request.
    #[arg(long, default_value_t = 45)]
    read_timeout: u64,
}

impl From<Args> for ListenerConfig {
    fn from(args: Args) -> Self {
        Self {
            chunk_length: args.chunk_length,
            read_timeout: Duration::from_secs(args.read_timeout),
            ..ListenerConfig::new(&args.host, args.port)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let start = Instant::now();
    let config = ListenerConfig::from(Args::parse());

    let server = frammento_http1::start(config, |peer, request| {
        println!("{} {}", "Request from".green(), peer);
        println!("{}", request);
    });

    tokio::select! {
        result = server => result?,
        _ = tokio::signal::ctrl_c() => println!("\nShutting down server now."),
    }

    log::info!("Stopped after {} ms", start.elapsed().as_millis());
    Ok(())
}
