use crate::{
    error::FetchError,
    source::VideoSource,
    video::{PageToken, PlaylistId, Video},
};

use log::{info, warn};
use std::collections::HashMap;

/// Videos from every playlist, newest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Feed {
    videos: Vec<Video>,
}

impl Feed {
    pub fn from_videos(mut videos: Vec<Video>) -> Self {
        sort_newest_first(&mut videos);
        Self { videos }
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn get(&self, index: usize) -> Option<&Video> {
        self.videos.get(index)
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    fn extended(&self, more: Vec<Video>) -> Self {
        let mut videos = Vec::with_capacity(self.videos.len() + more.len());
        videos.extend_from_slice(&self.videos);
        videos.extend(more);
        Self::from_videos(videos)
    }
}

fn sort_newest_first(videos: &mut [Video]) {
    videos.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// Page token per playlist. A playlist without an entry hasn't delivered a page
/// yet, an entry of `None` means the playlist is exhausted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CursorTable(HashMap<PlaylistId, Option<PageToken>>);

impl CursorTable {
    #[cfg(test)]
    pub fn get(&self, playlist_id: &PlaylistId) -> Option<Option<&PageToken>> {
        self.0.get(playlist_id).map(Option::as_ref)
    }

    pub fn record(&mut self, playlist_id: &PlaylistId, next_page_token: Option<PageToken>) {
        self.0.insert(playlist_id.clone(), next_page_token);
    }

    /// The token to continue `playlist_id` from, or `None` if it's exhausted.
    fn pending(&self, playlist_id: &PlaylistId) -> Option<Option<PageToken>> {
        match self.0.get(playlist_id) {
            None => Some(None),
            Some(Some(token)) => Some(Some(token.clone())),
            Some(None) => None,
        }
    }

    pub fn is_exhausted(&self, playlist_id: &PlaylistId) -> bool {
        self.pending(playlist_id).is_none()
    }

    pub fn has_more(&self, playlists: &[PlaylistId]) -> bool {
        playlists
            .iter()
            .any(|playlist_id| !self.is_exhausted(playlist_id))
    }
}

/// Outcome of one pass over the eligible playlists.
#[derive(Debug, Default)]
pub struct Round {
    pub feed: Feed,
    pub cursors: CursorTable,
    pub added: usize,
    /// Playlists queried in this round.
    pub requested: usize,
    pub errors: Vec<(PlaylistId, FetchError)>,
}

/// Fetches the first page of every playlist and merges them into a fresh feed.
pub async fn initial_load<S>(source: &S, playlists: &[PlaylistId]) -> Round
where
    S: VideoSource + ?Sized,
{
    let requests = playlists
        .iter()
        .map(|playlist_id| (playlist_id, None))
        .collect();

    run_round(source, &Feed::default(), &CursorTable::default(), requests).await
}

/// Fetches the next page of every playlist that isn't exhausted. The inputs are
/// left untouched; the returned round holds the merged copies.
pub async fn load_more<S>(
    source: &S,
    feed: &Feed,
    cursors: &CursorTable,
    playlists: &[PlaylistId],
) -> Round
where
    S: VideoSource + ?Sized,
{
    let requests = playlists
        .iter()
        .filter_map(|playlist_id| {
            cursors
                .pending(playlist_id)
                .map(|page_token| (playlist_id, page_token))
        })
        .collect();

    run_round(source, feed, cursors, requests).await
}

async fn run_round<S>(
    source: &S,
    feed: &Feed,
    cursors: &CursorTable,
    requests: Vec<(&PlaylistId, Option<PageToken>)>,
) -> Round
where
    S: VideoSource + ?Sized,
{
    let requested = requests.len();
    let mut cursors = cursors.clone();
    let mut fetched = Vec::new();
    let mut errors = Vec::new();

    for (playlist_id, page_token) in requests {
        match source.fetch_page(playlist_id, page_token.as_ref()).await {
            Ok(page) => {
                cursors.record(playlist_id, page.next_page_token);
                fetched.extend(page.videos);
            }
            Err(error) => {
                warn!("Failed to fetch playlist {}: {}", playlist_id, error);
                errors.push((playlist_id.clone(), error));
            }
        }
    }

    let added = fetched.len();
    let feed = feed.extended(fetched);
    info!(
        "Fetched {} videos, feed holds {} ({} playlists failed)",
        added,
        feed.len(),
        errors.len()
    );

    Round {
        feed,
        cursors,
        added,
        requested,
        errors,
    }
}
