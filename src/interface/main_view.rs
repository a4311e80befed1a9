use super::{
    actions::Actions,
    component::{Component, Frame, KeyHint},
    feed_view::FeedView,
    player_view::PlayerView,
};
use crate::{navigator::Navigation, session::Session};

use crossterm::event::Event;
use std::sync::Arc;
use tui::layout::Rect;

/// Switches between the feed and the player following the session's navigation.
pub struct MainView {
    session: Arc<Session>,
    feed: FeedView,
    player: PlayerView,
}

impl MainView {
    pub fn new(actions: Actions, session: Arc<Session>, player: String) -> Self {
        Self {
            feed: FeedView::new(actions.clone(), session.clone()),
            player: PlayerView::new(actions, session.clone(), player),
            session,
        }
    }
}

impl Component for MainView {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        match self.session.navigation() {
            Navigation::Browsing => self.feed.draw(f, area),
            Navigation::Playing(_) => self.player.draw(f, area),
        }
    }

    fn handle_event(&mut self, event: Event) {
        match self.session.navigation() {
            Navigation::Browsing => self.feed.handle_event(event),
            Navigation::Playing(index) => {
                self.player.handle_event(event);
                // Back on the feed, keep the cursor on what was playing.
                if self.session.navigation() == Navigation::Browsing {
                    self.feed.focus(index);
                }
            }
        }
    }

    fn registered_events(&self) -> Vec<KeyHint> {
        match self.session.navigation() {
            Navigation::Browsing => self.feed.registered_events(),
            Navigation::Playing(_) => self.player.registered_events(),
        }
    }
}
