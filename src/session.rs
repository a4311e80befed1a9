use crate::{
    error::SessionError,
    feed::{self, CursorTable, Feed, Round},
    navigator::{Navigation, Next},
    source::VideoSource,
    video::{PlaylistId, Video},
};

use log::{debug, info};
use parking_lot::Mutex;
use std::sync::Arc;

pub type SharedSource = Arc<dyn VideoSource + Send + Sync>;

/// Everything the views render from. Replaced as a whole once a round finishes,
/// so readers never observe a half merged feed.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub feed: Feed,
    pub cursors: CursorTable,
    pub navigation: Navigation,
    pub loading: bool,
    pub exhausted: bool,
    /// Index a boundary Next is waiting to advance from. Cleared by any other
    /// navigation, which cancels the advance.
    pending_next: Option<usize>,
}

impl SessionState {
    pub fn current_video(&self) -> Option<&Video> {
        self.navigation
            .current()
            .and_then(|index| self.feed.get(index))
    }

    fn navigate(&mut self, navigation: Navigation) {
        self.navigation = navigation;
        self.pending_next = None;
    }

    /// Marks a round as in flight; returns false if one already is.
    fn begin_round(&mut self) -> bool {
        if self.loading {
            debug!("Round already in flight, ignoring");
            return false;
        }
        self.loading = true;
        true
    }
}

pub struct Session {
    source: SharedSource,
    playlists: Vec<PlaylistId>,
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new(source: SharedSource, playlists: Vec<PlaylistId>) -> Self {
        Self {
            source,
            playlists,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.lock().clone()
    }

    pub fn navigation(&self) -> Navigation {
        self.state.lock().navigation
    }

    pub async fn initial_load(&self) -> Result<(), SessionError> {
        if !self.state.lock().begin_round() {
            return Ok(());
        }

        let round = feed::initial_load(self.source.as_ref(), &self.playlists).await;
        self.finish_round(round)
    }

    /// Fetches another page from every playlist that has more to give.
    pub async fn load_more(&self) -> Result<(), SessionError> {
        let (feed, cursors) = {
            let mut state = self.state.lock();
            if !state.begin_round() {
                return Ok(());
            }
            (state.feed.clone(), state.cursors.clone())
        };

        self.run_load_more(feed, cursors).await
    }

    pub fn select(&self, index: usize) {
        let mut state = self.state.lock();
        let navigation = state.navigation.select(index, state.feed.len());
        state.navigate(navigation);
        debug!("Select {} -> {:?}", index, state.navigation);
    }

    pub fn home(&self) {
        let mut state = self.state.lock();
        let navigation = state.navigation.home();
        state.navigate(navigation);
    }

    pub fn previous(&self) {
        let mut state = self.state.lock();
        let navigation = state.navigation.previous();
        state.navigate(navigation);
    }

    /// Moves to the next video, loading more first when the last one is playing.
    pub async fn next(&self) -> Result<(), SessionError> {
        let (feed, cursors) = {
            let mut state = self.state.lock();
            match state.navigation.next(state.feed.len()) {
                Next::Moved(navigation) => {
                    state.navigate(navigation);
                    return Ok(());
                }
                Next::NeedsMore { from } => {
                    if !state.begin_round() {
                        return Ok(());
                    }
                    state.pending_next = Some(from);
                    (state.feed.clone(), state.cursors.clone())
                }
            }
        };

        self.run_load_more(feed, cursors).await
    }

    async fn run_load_more(&self, feed: Feed, cursors: CursorTable) -> Result<(), SessionError> {
        let round = feed::load_more(self.source.as_ref(), &feed, &cursors, &self.playlists).await;
        self.finish_round(round)
    }

    fn finish_round(&self, round: Round) -> Result<(), SessionError> {
        let Round {
            feed,
            cursors,
            added,
            requested,
            errors,
        } = round;

        {
            let mut state = self.state.lock();
            let len = feed.len();
            state.exhausted = !cursors.has_more(&self.playlists);
            state.navigation = match state.pending_next.take() {
                Some(from) => state.navigation.after_load_more(from, len),
                None => state.navigation.clamp(len),
            };
            state.feed = feed;
            state.cursors = cursors;
            state.loading = false;
            info!(
                "Round finished: {} new, {} total, navigation {:?}",
                added, len, state.navigation
            );
        }

        match SessionError::from_failures(errors, requested) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::FetchError,
        source::{
            fake::{video, FakeSource},
            Page,
        },
    };
    use async_trait::async_trait;
    use tokio::sync::Semaphore;

    fn ids(ids: &[&str]) -> Vec<PlaylistId> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn videos(range: std::ops::Range<u32>) -> Vec<Video> {
        range
            .map(|n| {
                let published_at = format!("2024-01-{:02}T00:00:00Z", 20 - n);
                video(&format!("a{}", n), &published_at, "A")
            })
            .collect()
    }

    /// Five videos on the first page of A, three more behind `tokA`.
    fn paged_source() -> FakeSource {
        FakeSource::default()
            .with_page("A", None, videos(0..5), Some("tokA"))
            .with_page("A", Some("tokA"), videos(5..8), None)
    }

    /// Holds continuation pages until a permit is added.
    struct GatedSource {
        inner: FakeSource,
        gate: Semaphore,
    }

    #[async_trait]
    impl VideoSource for GatedSource {
        async fn uploads_playlist(
            &self,
            channel_id: &String,
        ) -> Result<Option<PlaylistId>, FetchError> {
            self.inner.uploads_playlist(channel_id).await
        }

        async fn fetch_page(
            &self,
            playlist_id: &PlaylistId,
            page_token: Option<&String>,
        ) -> Result<Page, FetchError> {
            if page_token.is_some() {
                let _permit = self.gate.acquire().await;
            }
            self.inner.fetch_page(playlist_id, page_token).await
        }
    }

    async fn loaded(source: FakeSource) -> (Arc<FakeSource>, Session) {
        let source = Arc::new(source);
        let session = Session::new(source.clone(), ids(&["A"]));
        session.initial_load().await.unwrap();
        (source, session)
    }

    #[tokio::test]
    async fn starts_browsing_with_loaded_feed() {
        let (_, session) = loaded(paged_source()).await;
        let state = session.snapshot();

        assert_eq!(state.navigation, Navigation::Browsing);
        assert_eq!(state.feed.len(), 5);
        assert!(!state.loading);
        assert!(!state.exhausted);
        assert!(state.current_video().is_none());
    }

    #[tokio::test]
    async fn select_previous_home() {
        let (_, session) = loaded(paged_source()).await;

        session.select(2);
        assert_eq!(session.snapshot().navigation, Navigation::Playing(2));
        assert_eq!(session.snapshot().current_video().unwrap().id, "a2");

        session.previous();
        session.previous();
        session.previous();
        assert_eq!(session.snapshot().navigation, Navigation::Playing(0));

        session.home();
        assert_eq!(session.snapshot().navigation, Navigation::Browsing);
    }

    #[tokio::test]
    async fn next_within_feed_does_not_fetch() {
        let (source, session) = loaded(paged_source()).await;

        session.select(1);
        session.next().await.unwrap();

        assert_eq!(session.snapshot().navigation, Navigation::Playing(2));
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn next_on_last_video_loads_exactly_once_then_advances() {
        let (source, session) = loaded(paged_source()).await;

        session.select(4);
        session.next().await.unwrap();

        let state = session.snapshot();
        assert_eq!(source.requests_for("A"), 2);
        assert_eq!(state.navigation, Navigation::Playing(5));
        assert_eq!(state.feed.len(), 8);
        assert_eq!(state.current_video().unwrap().id, "a5");
    }

    #[tokio::test]
    async fn next_past_everything_stays_on_last_video() {
        let (source, session) = loaded(paged_source()).await;

        session.select(4);
        session.next().await.unwrap();
        session.next().await.unwrap();
        session.next().await.unwrap();
        session.next().await.unwrap();

        let state = session.snapshot();
        assert_eq!(state.navigation, Navigation::Playing(7));
        assert!(state.exhausted);
        assert_eq!(source.requests_for("A"), 2);
    }

    #[tokio::test]
    async fn load_more_from_feed_keeps_browsing() {
        let (_, session) = loaded(paged_source()).await;

        session.load_more().await.unwrap();

        let state = session.snapshot();
        assert_eq!(state.navigation, Navigation::Browsing);
        assert_eq!(state.feed.len(), 8);
        assert!(state.exhausted);
    }

    #[tokio::test]
    async fn failures_are_reported_and_feed_stays_consistent() {
        let source = FakeSource::default()
            .with_page(
                "A",
                None,
                vec![video("a1", "2024-01-01T00:00:00Z", "A")],
                Some("tokA"),
            )
            .with_failing_page("A", Some("tokA"));
        let (_, session) = loaded(source).await;

        session.select(0);
        let result = session.next().await;

        assert!(matches!(
            result,
            Err(SessionError::Partial { failed: 1, total: 1, .. })
        ));
        let state = session.snapshot();
        assert_eq!(state.feed.len(), 1);
        assert_eq!(state.navigation, Navigation::Playing(0));
        assert!(!state.loading);
        assert!(!state.exhausted);
    }

    #[tokio::test]
    async fn home_during_load_returns_to_feed_and_keeps_results() {
        let source = Arc::new(GatedSource {
            inner: paged_source(),
            gate: Semaphore::new(0),
        });
        let session = Arc::new(Session::new(source.clone(), ids(&["A"])));
        session.initial_load().await.unwrap();

        session.select(4);
        let next = {
            let session = session.clone();
            tokio::spawn(async move { session.next().await })
        };
        while !session.snapshot().loading {
            tokio::task::yield_now().await;
        }

        session.next().await.unwrap();
        session.home();
        assert_eq!(session.snapshot().feed.len(), 5);

        source.gate.add_permits(1);
        next.await.unwrap().unwrap();

        let state = session.snapshot();
        assert_eq!(state.navigation, Navigation::Browsing);
        assert_eq!(state.feed.len(), 8);
    }

    async fn gated_session() -> (Arc<GatedSource>, Arc<Session>) {
        let source = Arc::new(GatedSource {
            inner: paged_source(),
            gate: Semaphore::new(0),
        });
        let session = Arc::new(Session::new(source.clone(), ids(&["A"])));
        session.initial_load().await.unwrap();
        (source, session)
    }

    async fn wait_for_round(session: &Session) {
        while !session.snapshot().loading {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn reselecting_after_home_does_not_resume_the_cancelled_next() {
        let (source, session) = gated_session().await;

        session.select(4);
        let next = {
            let session = session.clone();
            tokio::spawn(async move { session.next().await })
        };
        wait_for_round(&session).await;

        session.home();
        session.select(4);
        assert_eq!(session.snapshot().navigation, Navigation::Playing(4));

        source.gate.add_permits(1);
        next.await.unwrap().unwrap();

        let state = session.snapshot();
        assert_eq!(state.navigation, Navigation::Playing(4));
        assert_eq!(state.feed.len(), 8);
    }

    #[tokio::test]
    async fn stepping_back_and_forth_during_load_cancels_the_advance() {
        let (source, session) = gated_session().await;

        session.select(4);
        let next = {
            let session = session.clone();
            tokio::spawn(async move { session.next().await })
        };
        wait_for_round(&session).await;

        session.previous();
        session.next().await.unwrap();
        assert_eq!(session.snapshot().navigation, Navigation::Playing(4));

        source.gate.add_permits(1);
        next.await.unwrap().unwrap();

        assert_eq!(session.snapshot().navigation, Navigation::Playing(4));
    }

    #[tokio::test]
    async fn failures_count_only_the_playlists_of_the_round() {
        let source = Arc::new(
            FakeSource::default()
                .with_page(
                    "A",
                    None,
                    vec![video("a1", "2024-01-02T00:00:00Z", "A")],
                    Some("tokA"),
                )
                .with_failing_page("A", Some("tokA"))
                .with_page(
                    "B",
                    None,
                    vec![video("b1", "2024-01-01T00:00:00Z", "B")],
                    None,
                )
                .with_page("C", None, vec![], None),
        );
        let session = Session::new(source, ids(&["A", "B", "C"]));
        session.initial_load().await.unwrap();

        let result = session.load_more().await;

        match result {
            Err(error @ SessionError::Partial { failed: 1, total: 1, .. }) => {
                assert!(error.to_string().starts_with("Failed to load 1 of 1, A:"));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
