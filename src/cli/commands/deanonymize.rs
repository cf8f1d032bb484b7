//! Deanonymize command implementation
//!
//! Replays a text through a session the same way a model reply would
//! arrive: split into fragments, fed one by one, released as soon as it is
//! safe. De-anonymized text goes to stdout; everything else to stderr.

use super::read_map_file;
use crate::config::load_config_or_default;
use crate::domain::SessionId;
use crate::session::{deanonymize_stream, DeanonymizationSession, MemorySessionStore, SessionStore};
use anyhow::Context;
use clap::Args;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::watch;

/// Exit code when the run is interrupted by a signal
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Arguments for the deanonymize command
#[derive(Args, Debug)]
pub struct DeanonymizeArgs {
    /// JSON file mapping fake values to real values
    #[arg(short, long)]
    pub map: PathBuf,

    /// Text file to de-anonymize (defaults to stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Fragment size in characters used to replay the input
    #[arg(long, default_value_t = 16)]
    pub chunk_size: usize,

    /// Pause between fragments, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,

    /// Print stream statistics to stderr when done
    #[arg(long)]
    pub stats: bool,
}

impl DeanonymizeArgs {
    /// Execute the deanonymize command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(map = %self.map.display(), "Starting deanonymize command");

        let config = match load_config_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2); // Configuration error exit code
            }
        };
        if self.chunk_size == 0 {
            eprintln!("❌ --chunk-size must be greater than 0");
            return Ok(2);
        }

        let map = match read_map_file(&self.map) {
            Ok(map) => map,
            Err(e) => {
                eprintln!("❌ Anonymization map unavailable: {e}");
                return Ok(3); // Map unavailable exit code
            }
        };

        let input = self.read_input().await?;

        let store = MemorySessionStore::new();
        let session_id = SessionId::generate();
        if let Err(e) = store.put(&session_id, map, config.session.ttl()).await {
            eprintln!("❌ {e}");
            return Ok(3);
        }
        let session =
            match DeanonymizationSession::open(&store, &session_id, &config.stream).await {
                Ok(session) => session,
                Err(e) => {
                    eprintln!("❌ {e}");
                    return Ok(3);
                }
            };

        let mut engine = session.deanonymizer();
        let delay = Duration::from_millis(self.delay_ms);
        let upstream = stream::iter(split_fragments(&input, self.chunk_size))
            .then(move |fragment| async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok::<_, std::io::Error>(fragment)
            });

        let mut stdout = tokio::io::stdout();
        let interrupted = {
            let output = deanonymize_stream(&mut engine, Box::pin(upstream));
            tokio::pin!(output);
            loop {
                tokio::select! {
                    item = output.next() => match item {
                        Some(text) => {
                            stdout.write_all(text?.as_bytes()).await?;
                            stdout.flush().await?;
                        }
                        None => break false,
                    },
                    Ok(()) = shutdown_signal.changed() => {
                        if *shutdown_signal.borrow() {
                            break true;
                        }
                    }
                }
            }
        };

        store.delete(&session_id).await?;

        if interrupted {
            tracing::warn!(
                retained_chars = engine.retained_chars(),
                "Interrupted, retained text discarded"
            );
            eprintln!();
            eprintln!("⚠️  Interrupted, output is incomplete");
            return Ok(INTERRUPTED_EXIT_CODE);
        }

        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        crate::log_session_event!(session_id, "finalized");

        if self.stats {
            eprintln!("📊 Stream statistics:");
            eprintln!("{}", serde_json::to_string_pretty(engine.stats())?);
        }

        Ok(0)
    }

    async fn read_input(&self) -> anyhow::Result<String> {
        let mut input = String::new();
        match &self.input {
            Some(path) => {
                tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open input file {}", path.display()))?
                    .read_to_string(&mut input)
                    .await
                    .with_context(|| format!("Failed to read input file {}", path.display()))?;
            }
            None => {
                tokio::io::stdin()
                    .read_to_string(&mut input)
                    .await
                    .context("Failed to read stdin")?;
            }
        }
        Ok(input)
    }
}

/// Split text into fragments of `chunk_size` characters
fn split_fragments(text: &str, chunk_size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(chunk_size.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}
