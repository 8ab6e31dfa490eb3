#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

pub mod playlist;
pub mod util;
pub mod youtube;

/// Builds and maintains a YAML music playlist from YouTube video URLs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Video URLs to add, or a single path to a text file with one URL per line
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Playlist file to create or extend
    #[arg(short, long, default_value = "music.yaml")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let urls = collect_urls(&args.inputs).await?;
    if urls.is_empty() {
        info!("No URLs to process");
        return Ok(());
    }

    let client = util::init_http_client();

    playlist::process_urls(&urls, &args.output, |video_id| {
        let client = client.clone();
        async move { youtube::fetch_metadata(&client, &video_id).await }
    })
    .await;

    Ok(())
}

/// A single argument naming an existing file is read as a URL list, one per
/// line; anything else is taken as URL arguments directly.
async fn collect_urls(inputs: &[String]) -> Result<Vec<String>> {
    if let [single] = inputs {
        let path = Path::new(single);
        if path.is_file() {
            let contents = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Reading URL list {}", path.display()))?;

            let urls: Vec<String> = contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();

            info!("Loaded {} URLs from {}", urls.len(), path.display());
            return Ok(urls);
        }
    }

    Ok(inputs.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn single_file_argument_is_read_line_by_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "https://youtu.be/abcdefghijk").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  https://www.youtube.com/watch?v=dQw4w9WgXcQ  ").unwrap();

        let inputs = vec![file.path().to_str().unwrap().to_string()];
        let urls = collect_urls(&inputs).await.unwrap();

        assert_eq!(
            urls,
            vec![
                "https://youtu.be/abcdefghijk".to_string(),
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn url_arguments_are_passed_through() {
        let inputs = vec![
            "https://youtu.be/abcdefghijk".to_string(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
        ];

        assert_eq!(collect_urls(&inputs).await.unwrap(), inputs);
    }
}
