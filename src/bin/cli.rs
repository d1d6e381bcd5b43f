//! chunkwire CLI Client
//!
//! Command-line driver for a chunk service.

use std::io::Write;
use std::path::PathBuf;
use std::process;

use chunkwire::{ChunkError, ChunkId, Client, Config, CHUNK_SIZE};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// chunkwire CLI
#[derive(Parser, Debug)]
#[command(name = "chunkwire-cli")]
#[command(about = "CLI for a chunk storage service")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8111")]
    server: String,

    /// Read timeout in milliseconds (0 waits forever)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Write timeout in milliseconds (0 waits forever)
    #[arg(long, default_value = "0")]
    write_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ping the server
    Ping {
        /// Text to send
        #[arg(default_value = "Hello world!")]
        text: String,
    },

    /// Write one chunk
    Write {
        /// Chunk id (UUID)
        id: ChunkId,

        /// File holding exactly one chunk of data
        #[arg(required_unless_present = "zero")]
        file: Option<PathBuf>,

        /// Write a zero-filled chunk instead of a file
        #[arg(long, conflicts_with = "file")]
        zero: bool,
    },

    /// Read one chunk
    Read {
        /// Chunk id (UUID)
        id: ChunkId,

        /// Write the chunk here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete one chunk
    #[command(alias = "del")]
    Delete {
        /// Chunk id (UUID)
        id: ChunkId,
    },

    /// Ping, then write, read back and delete a random zero-filled chunk
    Demo,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,chunkwire=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = Config::builder()
        .server_addr(&args.server)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    let mut client = match Client::connect(config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Dial failed: {}", e);
            process::exit(1);
        }
    };

    let outcome = run(&mut client, args.command);
    client.close();

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn run(client: &mut Client, command: Commands) -> Result<(), ChunkError> {
    match command {
        Commands::Ping { text } => {
            let reply = client.ping(&text)?;
            println!("{}", reply);
        }
        Commands::Write { id, file, zero } => {
            let data = match file {
                Some(path) if !zero => std::fs::read(&path)?,
                _ => vec![0u8; CHUNK_SIZE],
            };
            client.chunk_write(id.as_bytes(), &data)?;
            println!("wrote {}", id);
        }
        Commands::Read { id, output } => {
            let data = client.chunk_read(id.as_bytes())?;
            match output {
                Some(path) => std::fs::write(&path, &data)?,
                None => std::io::stdout().write_all(&data)?,
            }
        }
        Commands::Delete { id } => {
            client.chunk_delete(id.as_bytes())?;
            println!("deleted {}", id);
        }
        Commands::Demo => demo(client)?,
    }

    Ok(())
}

fn demo(client: &mut Client) -> Result<(), ChunkError> {
    let reply = client.ping("Hello world!").map_err(|e| step("Ping", e))?;
    tracing::info!("Ping result {}", reply);

    let id = ChunkId::random();
    client
        .chunk_write(id.as_bytes(), &vec![0u8; CHUNK_SIZE])
        .map_err(|e| step("Chunk write", e))?;
    tracing::info!("Wrote chunk {}", id);

    client
        .chunk_read(id.as_bytes())
        .map_err(|e| step("Chunk read", e))?;
    tracing::info!("Read chunk {}", id);

    client
        .chunk_delete(id.as_bytes())
        .map_err(|e| step("Chunk delete", e))?;
    tracing::info!("Deleted chunk {}", id);

    Ok(())
}

fn step(name: &str, e: ChunkError) -> ChunkError {
    tracing::error!("{} failed", name);
    e
}
