use crate::{
    config::Config,
    error::FetchError,
    source::{Page, VideoSource},
    video::{ChannelId, PageToken, PlaylistId, Video},
};

use async_trait::async_trait;
use chrono::DateTime;
use log::{debug, trace};
use serde::{de::DeserializeOwned, Deserialize};

// Channel lookups are decoded with every field optional; a channel without an
// uploads playlist resolves to `None` instead of failing.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChannelListResponse {
    items: Vec<Channel>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Channel {
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ContentDetails {
    related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

impl ChannelListResponse {
    fn uploads(self) -> Option<PlaylistId> {
        self.items
            .into_iter()
            .next()?
            .content_details?
            .related_playlists?
            .uploads
            .filter(|uploads| !uploads.is_empty())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemListResponse {
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: PlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    title: String,
    published_at: String,
    #[serde(default)]
    thumbnails: Thumbnails,
    resource_id: ResourceId,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

impl PlaylistItem {
    /// Returns `Ok(None)` for placeholder entries such as deleted or private videos.
    fn into_video(self, playlist_id: &PlaylistId) -> Result<Option<Video>, FetchError> {
        let snippet = self.snippet;
        let Some(id) = snippet.resource_id.video_id else {
            return Ok(None);
        };
        let published_at = DateTime::parse_from_rfc3339(&snippet.published_at)
            .map_err(|_| FetchError::ParseDate(snippet.published_at.clone()))?;

        Ok(Some(Video {
            id,
            title: snippet.title,
            thumbnail_url: snippet
                .thumbnails
                .medium
                .map(|thumbnail| thumbnail.url)
                .unwrap_or_default(),
            published_at,
            playlist_id: playlist_id.clone(),
        }))
    }
}

/// Client for the two read-only YouTube Data API endpoints the feed needs.
pub struct YoutubeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    page_size: u32,
}

impl YoutubeClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            page_size: config.page_size,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}/youtube/v3/{}", self.base_url, resource);
        debug!("GET {} {:?}", url, params);

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                resource: resource.to_owned(),
            });
        }

        let body = response.json::<T>().await?;
        trace!("Decoded {} response", resource);
        Ok(body)
    }
}

#[async_trait]
impl VideoSource for YoutubeClient {
    async fn uploads_playlist(
        &self,
        channel_id: &ChannelId,
    ) -> Result<Option<PlaylistId>, FetchError> {
        let response: ChannelListResponse = self
            .get(
                "channels",
                &[("part", "contentDetails"), ("id", channel_id.as_str())],
            )
            .await?;
        Ok(response.uploads())
    }

    async fn fetch_page(
        &self,
        playlist_id: &PlaylistId,
        page_token: Option<&PageToken>,
    ) -> Result<Page, FetchError> {
        let page_size = self.page_size.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id.as_str()),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(page_token) = page_token {
            params.push(("pageToken", page_token.as_str()));
        }

        let response: PlaylistItemListResponse = self.get("playlistItems", &params).await?;

        let mut videos = Vec::with_capacity(response.items.len());
        for item in response.items {
            if let Some(video) = item.into_video(playlist_id)? {
                videos.push(video);
            }
        }

        Ok(Page {
            videos,
            next_page_token: response.next_page_token.filter(|token| !token.is_empty()),
        })
    }
}
