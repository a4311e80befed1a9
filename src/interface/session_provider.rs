use super::{
    actions::Actions,
    component::{Component, Frame, KeyHint},
    dialog::Dialog,
    main_view::MainView,
    status_label::LOADING_STRING,
};
use crate::{
    config,
    error::SessionError,
    resolver,
    session::{Session, SharedSource},
    youtube::YoutubeClient,
};

use crossterm::event::Event;
use log::info;
use parking_lot::Mutex;
use std::sync::Arc;
use tui::layout::Rect;

/// Loads the configuration, resolves the channels and runs the first round,
/// then hands over to the main view.
pub struct SessionProvider {
    main_view: Arc<Mutex<Option<MainView>>>,
}

impl SessionProvider {
    pub fn new(actions: Actions) -> Self {
        let session_provider = Self {
            main_view: Arc::new(Mutex::new(None)),
        };

        session_provider.init_session(actions);
        session_provider
    }

    fn init_session(&self, actions: Actions) {
        let main_view = self.main_view.clone();
        tokio::spawn(async move {
            let finished_loading = actions.show_label(LOADING_STRING);
            let result = Self::init_session_impl(actions.clone(), main_view).await;
            finished_loading();

            match result {
                Ok(Ok(())) => actions.redraw(),
                // The feed is usable, only some channels failed.
                Ok(Err(error)) => actions.handle_error(error, true),
                Err(error) => actions.handle_error(error, false),
            }
        });
    }

    /// The outer error means there is nothing to show; the inner one is a
    /// partial failure on top of a working session.
    async fn init_session_impl(
        actions: Actions,
        main_view: Arc<Mutex<Option<MainView>>>,
    ) -> Result<Result<(), SessionError>, Box<dyn std::error::Error + Send + Sync>> {
        let config = config::load().await?;
        let source: SharedSource = Arc::new(YoutubeClient::new(&config));

        let resolution = resolver::resolve_all(source.as_ref(), &config.channel_ids).await;
        if resolution.playlists.is_empty() {
            return Err(match SessionError::from_failures(
                resolution.errors,
                config.channel_ids.len(),
            ) {
                Some(error) => error.into(),
                None => SessionError::NoPlaylists.into(),
            });
        }
        info!(
            "Resolved {} of {} channels",
            resolution.playlists.len(),
            config.channel_ids.len()
        );

        let session = Arc::new(Session::new(source, resolution.playlists));
        {
            let mut main_view = main_view.lock();
            *main_view = Some(MainView::new(
                actions.clone(),
                session.clone(),
                config.player.clone(),
            ));
        }
        actions.redraw();

        let loaded = session.initial_load().await;
        let resolved = SessionError::from_failures(resolution.errors, config.channel_ids.len());
        Ok(SessionError::and_then_result(resolved, loaded))
    }
}

impl Component for SessionProvider {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        match *self.main_view.lock() {
            Some(ref mut main_view) => main_view.draw(f, area),
            None => Dialog::new("Starting KidTube").draw(f, area),
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Some(ref mut main_view) = *self.main_view.lock() {
            main_view.handle_event(event);
        }
    }

    fn registered_events(&self) -> Vec<KeyHint> {
        self.main_view
            .lock()
            .as_ref()
            .map(|main_view| main_view.registered_events())
            .unwrap_or_default()
    }
}
