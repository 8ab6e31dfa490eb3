use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::warn;

use crate::playlist::Track;

/// Ordered URL rules; the first capture wins. Each rule requires the
/// identifier to end at a non-identifier character so a 12-character token is
/// rejected instead of truncated.
static VIDEO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(
            r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
        )
        .unwrap(),
        Regex::new(r"youtube\.com/watch\?.*v=([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)").unwrap(),
    ]
});

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

/// Channel lookup strategies, tried in order. Each reads the `content`
/// attribute if present and non-empty, falling back to the element text.
static CHANNEL_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        r#"link[itemprop="name"]"#,
        r#"meta[name="author"]"#,
        r#"span[itemprop="author"]"#,
    ]
    .iter()
    .map(|s| Selector::parse(s).unwrap())
    .collect()
});

static LD_JSON_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

const TITLE_SUFFIX: &str = " - YouTube";
const FALLBACK_CHANNEL: &str = "Unknown channel";

/// Extracts an 11-character video ID out from a user-inputted URL string.
/// Returns `None` when no rule matches; never errors.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url).map(|c| c[1].to_string()))
}

/// Canonical watch URL for a video ID; doubles as the playlist dedup key.
#[must_use]
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Placeholder record used whenever the watch page cannot be resolved.
#[must_use]
pub fn placeholder_track(video_id: &str) -> Track {
    Track {
        title: format!("Video {video_id}"),
        channel: FALLBACK_CHANNEL.to_string(),
        url: watch_url(video_id),
    }
}

/// Fetches title and channel name for a video by scraping its watch page.
///
/// Never fails: any network or parse error is logged and converted into a
/// placeholder-filled record, so the returned [`Track`] is always fully
/// populated.
pub async fn fetch_metadata(client: &reqwest::Client, video_id: &str) -> Track {
    let url = watch_url(video_id);

    match scrape_watch_page(client, &url).await {
        Ok((title, channel)) => Track {
            title: title.unwrap_or_else(|| format!("Video {video_id}")),
            channel: channel.unwrap_or_else(|| FALLBACK_CHANNEL.to_string()),
            url,
        },
        Err(e) => {
            warn!("Failed to fetch metadata for {video_id}: {e:#}");
            placeholder_track(video_id)
        }
    }
}

async fn scrape_watch_page(
    client: &reqwest::Client,
    url: &str,
) -> Result<(Option<String>, Option<String>)> {
    let res = client
        .get(url)
        .send()
        .await
        .context("Requesting watch page")?
        .error_for_status()
        .context("Watch page returned an error status")?;

    let body = res.text().await.context("Decoding watch page body")?;

    Ok(parse_watch_page(&body))
}

/// Best-effort `(title, channel)` extraction from a watch page document.
fn parse_watch_page(html: &str) -> (Option<String>, Option<String>) {
    let document = Html::parse_document(html);

    let mut title = title_from_markup(&document);
    let mut channel = channel_from_markup(&document);

    if title.is_none() || channel.is_none() {
        fill_from_ld_json(&document, &mut title, &mut channel);
    }

    (title, channel)
}

fn title_from_markup(document: &Html) -> Option<String> {
    let element = document.select(&TITLE_SELECTOR).next()?;
    let text: String = element.text().collect();
    let text = text.trim();
    let text = text.strip_suffix(TITLE_SUFFIX).unwrap_or(text).trim();

    (!text.is_empty()).then(|| text.to_string())
}

fn channel_from_markup(document: &Html) -> Option<String> {
    CHANNEL_SELECTORS.iter().find_map(|selector| {
        let element = document.select(selector).next()?;
        let value = match element.value().attr("content") {
            Some(content) if !content.trim().is_empty() => content.to_string(),
            _ => element.text().collect::<String>(),
        };
        let value = value.trim();

        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Scans embedded JSON-LD blocks and fills any still-missing field. A block
/// holding a top-level array stands for its first element. Blocks that fail
/// to parse are skipped.
fn fill_from_ld_json(document: &Html, title: &mut Option<String>, channel: &mut Option<String>) {
    for script in document.select(&LD_JSON_SELECTOR) {
        let raw: String = script.text().collect();
        let Ok(data) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };
        let data = match data {
            Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
            other => other,
        };

        if title.is_none() {
            if let Some(name) = data.get("name").and_then(Value::as_str) {
                *title = Some(name.to_string());
            }
        }

        // Only an `author` object with a `name` key counts; a bare string
        // author is ignored.
        if channel.is_none() {
            let author_name = data
                .get("author")
                .and_then(|author| author.get("name"))
                .and_then(Value::as_str);
            if let Some(name) = author_name {
                *channel = Some(name.to_string());
            }
        }
    }
}
