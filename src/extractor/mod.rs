//! Media extraction via an external `yt-dlp` process.
//!
//! Search, channel listings and playback-locator resolution are all delegated
//! to the extractor binary; this module owns the argument templates, the
//! tab-delimited output parsing and the short-form filter. Every call spawns a
//! fresh process; nothing is cached and nothing is retried.

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::{AuthorRef, MediaItem, ResolvedTracks};
use crate::error::{Error, Result};

/// Results below or at this duration are dropped from search (short-form filter).
pub const MIN_DURATION_SECS: u64 = 60;

/// Maximum number of search results requested from the extractor.
pub const SEARCH_RESULT_LIMIT: u32 = 20;

/// Maximum number of channel entries requested from the extractor.
pub const CHANNEL_RESULT_LIMIT: u32 = 20;

/// Format selector for the combined video+audio track.
pub const VIDEO_FORMAT: &str = "best[ext=mp4]";

/// Format selector for the audio-only track.
pub const AUDIO_FORMAT: &str = "bestaudio[ext=m4a]";

/// Fields printed per search result: id, title, duration (seconds),
/// channel name, channel URL, view count.
const SEARCH_PRINT_TEMPLATE: &str =
    "%(id)s\t%(title)s\t%(duration)s\t%(channel)s\t%(channel_url)s\t%(view_count)s";

/// Fields printed per channel entry: id, title, duration label, uploader.
const CHANNEL_PRINT_TEMPLATE: &str = "%(id)s\t%(title)s\t%(duration_string)s\t%(uploader)s";

/// Lines with fewer fields than this are treated as data loss and skipped.
const MIN_LINE_FIELDS: usize = 2;

fn thumbnail_for(video_id: &str) -> String {
    // Flat listings carry no thumbnail; synthesize one from the id.
    format!("https://i.ytimg.com/vi/{video_id}/mqdefault.jpg")
}

fn watch_page_for(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Format a duration in seconds as a label, e.g. `3:45` or `1:02:10`.
fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// External media extraction capability.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Free-text search, short-form results already filtered out.
    async fn search(&self, query: &str) -> Result<Vec<MediaItem>>;

    /// Flat listing of a channel's latest uploads.
    async fn channel_listing(&self, channel_url: &str) -> Result<Vec<MediaItem>>;

    /// Resolve a media identifier to playback locators.
    async fn resolve(&self, video_id: &str) -> Result<ResolvedTracks>;
}

/// [`MediaExtractor`] backed by the `yt-dlp` command-line tool.
pub struct YtDlpExtractor {
    binary: String,
}

impl YtDlpExtractor {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Binary path from `YTDLP_PATH`, falling back to `yt-dlp` on PATH.
    pub fn from_env() -> Self {
        let binary = std::env::var("YTDLP_PATH").unwrap_or_else(|_| "yt-dlp".to_string());
        Self::new(binary)
    }

    /// Run the extractor and return its stdout, or a generic extractor error
    /// on spawn failure or non-zero exit. Details stay in the logs.
    async fn run(&self, args: &[&str]) -> Result<String> {
        tracing::debug!(binary = %self.binary, ?args, "invoking extractor");

        let output = Command::new(&self.binary)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                tracing::error!(binary = %self.binary, error = %e, "failed to spawn extractor");
                Error::extractor("Failed to start extractor process")
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(
                code = ?output.status.code(),
                stderr = %stderr.trim(),
                "extractor exited with failure"
            );
            return Err(Error::extractor("Extractor process failed"));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn search(&self, query: &str) -> Result<Vec<MediaItem>> {
        let selector = format!("ytsearch{SEARCH_RESULT_LIMIT}:{query}");
        let stdout = self
            .run(&[
                "--flat-playlist",
                "--print",
                SEARCH_PRINT_TEMPLATE,
                selector.as_str(),
            ])
            .await?;
        Ok(collect_search_items(&stdout))
    }

    async fn channel_listing(&self, channel_url: &str) -> Result<Vec<MediaItem>> {
        let limit = CHANNEL_RESULT_LIMIT.to_string();
        let stdout = self
            .run(&[
                "--flat-playlist",
                "--print",
                CHANNEL_PRINT_TEMPLATE,
                "--playlist-end",
                limit.as_str(),
                channel_url,
            ])
            .await?;
        Ok(collect_channel_items(&stdout, channel_url))
    }

    async fn resolve(&self, video_id: &str) -> Result<ResolvedTracks> {
        let url = watch_page_for(video_id);

        // Two independent invocations; each failure is caught on its own so
        // it degrades to "no locator" instead of aborting the other track.
        let video_args = ["-g", "-f", VIDEO_FORMAT, url.as_str()];
        let audio_args = ["-g", "-f", AUDIO_FORMAT, url.as_str()];
        let (video, audio) = tokio::join!(self.run(&video_args), self.run(&audio_args));

        let video = video.ok().as_deref().and_then(first_locator);
        let audio = audio.ok().as_deref().and_then(first_locator);
        resolve_tracks(video, audio)
    }
}

/// Combine the two track outcomes into a playable pair.
///
/// No video locator fails the whole resolution; a missing audio locator falls
/// back to the video locator (the mp4 container already carries audio).
fn resolve_tracks(video: Option<String>, audio: Option<String>) -> Result<ResolvedTracks> {
    let video_url = video.ok_or_else(|| Error::extractor("No playback locator resolved"))?;
    let audio_url = audio.unwrap_or_else(|| video_url.clone());
    Ok(ResolvedTracks {
        video_url,
        audio_url,
    })
}

/// First non-empty line of `-g` output, which prints one locator per line.
fn first_locator(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(String::from)
}

fn is_missing(field: &str) -> bool {
    field.is_empty() || field == "NA"
}

struct SearchHit {
    item: MediaItem,
    duration_secs: u64,
}

/// Parse one search line; `None` for malformed lines (skipped, never an error).
fn parse_search_line(line: &str) -> Option<SearchHit> {
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() < MIN_LINE_FIELDS {
        tracing::debug!(line, "skipping malformed search line");
        return None;
    }

    let video_id = parts[0].to_string();
    // `%(duration)s` prints seconds, possibly fractional or NA for live items.
    let duration_secs = parts
        .get(2)
        .and_then(|s| s.parse::<f64>().ok())
        .map_or(0, |s| s.round() as u64);
    let author_url = parts
        .get(4)
        .copied()
        .filter(|s| !is_missing(s))
        .map(String::from);
    let views = parts
        .get(5)
        .copied()
        .filter(|s| !is_missing(s))
        .unwrap_or_default()
        .to_string();

    Some(SearchHit {
        item: MediaItem {
            thumbnail: thumbnail_for(&video_id),
            video_id,
            title: parts.get(1).copied().unwrap_or("No Title").to_string(),
            timestamp: format_duration(duration_secs),
            author: AuthorRef {
                name: parts.get(3).copied().unwrap_or("Channel").to_string(),
                url: author_url,
            },
            views,
        },
        duration_secs,
    })
}

/// Parse search output, dropping malformed lines and short-form results.
fn collect_search_items(stdout: &str) -> Vec<MediaItem> {
    stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(parse_search_line)
        .filter(|hit| hit.duration_secs > MIN_DURATION_SECS)
        .map(|hit| hit.item)
        .collect()
}

/// Parse one channel line; `None` for lines with fewer than 2 fields.
fn parse_channel_line(line: &str, channel_url: &str) -> Option<MediaItem> {
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() < MIN_LINE_FIELDS {
        tracing::debug!(line, "skipping malformed channel line");
        return None;
    }

    let video_id = parts[0].to_string();
    Some(MediaItem {
        thumbnail: thumbnail_for(&video_id),
        video_id,
        title: parts
            .get(1)
            .copied()
            .filter(|s| !s.is_empty())
            .unwrap_or("No Title")
            .to_string(),
        timestamp: parts
            .get(2)
            .copied()
            .filter(|s| !is_missing(s))
            .unwrap_or("0:00")
            .to_string(),
        author: AuthorRef {
            name: parts
                .get(3)
                .copied()
                .filter(|s| !is_missing(s))
                .unwrap_or("Channel")
                .to_string(),
            url: Some(channel_url.to_string()),
        },
        views: String::new(),
    })
}

/// Parse flat channel-listing output, skipping malformed lines.
fn collect_channel_items(stdout: &str, channel_url: &str) -> Vec<MediaItem> {
    stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|line| parse_channel_line(line, channel_url))
        .collect()
}
