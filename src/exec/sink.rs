// src/exec/sink.rs

//! Log sink: persist a byte stream line by line with timestamps.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};

use crate::errors::Result;

/// Drain a readable stream into a file, one timestamped line at a time.
///
/// The file is opened in append-create mode, so a path reused across runs
/// accumulates output; callers wanting per-run isolation supply a
/// per-run-unique path. Each line is written as
/// `[<RFC3339 now>] <line>\n` and synced to stable storage before the next
/// line is read, so external tailers see output promptly.
///
/// End of stream (the child closed its pipe) ends the sink without error.
/// Open, write, sync and stream-read errors are terminal for the sink;
/// already-written lines are kept.
pub async fn drain_to_file<R>(reader: R, path: &Path) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .await?;

    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let stamped = format!(
            "[{}] {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            line
        );
        file.write_all(stamped.as_bytes()).await?;
        file.sync_data().await?;
    }

    Ok(())
}
