use crate::{
    error::FetchError,
    source::VideoSource,
    video::{ChannelId, PlaylistId},
};

use futures::future::join_all;
use log::warn;

pub struct Resolution {
    pub playlists: Vec<PlaylistId>,
    pub errors: Vec<(ChannelId, FetchError)>,
}

/// Resolves every channel concurrently and waits for all of them. Results keep
/// the order of `channel_ids` regardless of completion order; channels without
/// an uploads playlist are left out.
pub async fn resolve_all<S>(source: &S, channel_ids: &[ChannelId]) -> Resolution
where
    S: VideoSource + ?Sized,
{
    let lookups = channel_ids
        .iter()
        .map(|channel_id| source.uploads_playlist(channel_id));
    let results = join_all(lookups).await;

    let mut playlists: Vec<PlaylistId> = Vec::new();
    let mut errors = Vec::new();
    for (channel_id, result) in channel_ids.iter().zip(results) {
        match result {
            Ok(Some(playlist_id)) => {
                if !playlists.contains(&playlist_id) {
                    playlists.push(playlist_id);
                }
            }
            Ok(None) => warn!("Channel {} has no uploads playlist", channel_id),
            Err(error) => {
                warn!("Failed to resolve channel {}: {}", channel_id, error);
                errors.push((channel_id.clone(), error));
            }
        }
    }

    Resolution { playlists, errors }
}
