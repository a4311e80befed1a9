use crate::{
    error::FetchError,
    video::{ChannelId, PageToken, PlaylistId, Video},
};

use async_trait::async_trait;

/// One page of a playlist in the order the remote side returns it.
#[derive(Clone, Debug, Default)]
pub struct Page {
    pub videos: Vec<Video>,
    pub next_page_token: Option<PageToken>,
}

#[async_trait]
pub trait VideoSource {
    /// Looks up the uploads playlist of a channel. `Ok(None)` means the channel has none.
    async fn uploads_playlist(&self, channel_id: &ChannelId)
        -> Result<Option<PlaylistId>, FetchError>;

    async fn fetch_page(
        &self,
        playlist_id: &PlaylistId,
        page_token: Option<&PageToken>,
    ) -> Result<Page, FetchError>;
}

#[cfg(test)]
pub mod fake {
    use super::*;

    use chrono::DateTime;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    pub fn video(id: &str, published_at: &str, playlist_id: &str) -> Video {
        Video {
            id: id.to_owned(),
            title: format!("Video {}", id),
            thumbnail_url: format!("https://i.ytimg.com/vi/{}/mqdefault.jpg", id),
            published_at: DateTime::parse_from_rfc3339(published_at).unwrap(),
            playlist_id: playlist_id.to_owned(),
        }
    }

    /// In-memory source keyed by `(playlist, page token)`, recording every page request.
    #[derive(Default)]
    pub struct FakeSource {
        pub channels: HashMap<ChannelId, Result<Option<PlaylistId>, String>>,
        pub pages: HashMap<(PlaylistId, Option<PageToken>), Result<Page, String>>,
        pub requests: Mutex<Vec<(PlaylistId, Option<PageToken>)>>,
    }

    impl FakeSource {
        pub fn with_channel(mut self, channel_id: &str, playlist_id: Option<&str>) -> Self {
            self.channels.insert(
                channel_id.to_owned(),
                Ok(playlist_id.map(String::from)),
            );
            self
        }

        pub fn with_failing_channel(mut self, channel_id: &str) -> Self {
            self.channels
                .insert(channel_id.to_owned(), Err(String::from("offline")));
            self
        }

        pub fn with_page(
            mut self,
            playlist_id: &str,
            page_token: Option<&str>,
            videos: Vec<Video>,
            next_page_token: Option<&str>,
        ) -> Self {
            self.pages.insert(
                (playlist_id.to_owned(), page_token.map(String::from)),
                Ok(Page {
                    videos,
                    next_page_token: next_page_token.map(String::from),
                }),
            );
            self
        }

        pub fn with_failing_page(mut self, playlist_id: &str, page_token: Option<&str>) -> Self {
            self.pages.insert(
                (playlist_id.to_owned(), page_token.map(String::from)),
                Err(String::from("offline")),
            );
            self
        }

        pub fn requests(&self) -> Vec<(PlaylistId, Option<PageToken>)> {
            self.requests.lock().clone()
        }

        pub fn requests_for(&self, playlist_id: &str) -> usize {
            self.requests
                .lock()
                .iter()
                .filter(|(id, _)| id == playlist_id)
                .count()
        }
    }

    fn failure(resource: &str) -> FetchError {
        FetchError::Status {
            status: 503,
            resource: resource.to_owned(),
        }
    }

    #[async_trait]
    impl VideoSource for FakeSource {
        async fn uploads_playlist(
            &self,
            channel_id: &ChannelId,
        ) -> Result<Option<PlaylistId>, FetchError> {
            match self.channels.get(channel_id) {
                Some(Ok(playlist_id)) => Ok(playlist_id.clone()),
                Some(Err(_)) => Err(failure("channels")),
                None => Ok(None),
            }
        }

        async fn fetch_page(
            &self,
            playlist_id: &PlaylistId,
            page_token: Option<&PageToken>,
        ) -> Result<Page, FetchError> {
            let key = (playlist_id.clone(), page_token.cloned());
            self.requests.lock().push(key.clone());
            match self.pages.get(&key) {
                Some(Ok(page)) => Ok(page.clone()),
                Some(Err(_)) => Err(failure("playlistItems")),
                None => Ok(Page::default()),
            }
        }
    }
}
