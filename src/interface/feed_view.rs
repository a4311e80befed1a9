use super::{
    actions::Actions,
    component::{Component, Frame, KeyHint},
    list::generate_items,
    status_label::LOADING_STRING,
};
use crate::{session::Session, video::Video};

use crossterm::event::{Event, KeyCode};
use std::sync::Arc;
use tui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, Paragraph, Wrap},
};

/// Thumbnail cards of the whole feed, newest first.
pub struct FeedView {
    actions: Actions,
    session: Arc<Session>,
    cursor: usize,
}

impl FeedView {
    pub fn new(actions: Actions, session: Arc<Session>) -> Self {
        Self {
            actions,
            session,
            cursor: 0,
        }
    }

    pub fn focus(&mut self, index: usize) {
        self.cursor = index;
    }

    fn move_by(&mut self, delta: isize) {
        let len = self.session.snapshot().feed.len();
        self.cursor = self
            .cursor
            .saturating_add_signed(delta)
            .min(len.saturating_sub(1));
    }

    fn move_bottom(&mut self) {
        self.cursor = self.session.snapshot().feed.len().saturating_sub(1);
    }

    fn load_more(&self) {
        let session = self.session.clone();
        self.actions
            .spawn_with_label(LOADING_STRING, async move { session.load_more().await });
    }

    fn details(video: Option<&Video>) -> Paragraph<'static> {
        let lines = match video {
            Some(video) => vec![
                Spans::from(video.title.clone()),
                Spans::from(format!("Published {}", video.published_at.format("%Y-%m-%d %H:%M"))),
                Spans::from(format!("Thumbnail {}", video.thumbnail_url)),
                Spans::from(format!("Video {}", video.id)),
            ],
            None => vec![Spans::from("No videos loaded")],
        };

        Paragraph::new(lines)
            .block(Block::default().title("Details").borders(Borders::TOP))
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
    }
}

impl Component for FeedView {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let state = self.session.snapshot();
        let videos = state.feed.videos();
        self.cursor = self.cursor.min(videos.len().saturating_sub(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(6)].as_ref())
            .split(area);

        let title = if state.exhausted {
            format!("Videos ({}, no more to load)", videos.len())
        } else {
            format!("Videos ({})", videos.len())
        };
        let block = Block::default().title(Span::raw(title));

        let list_height = usize::from(chunks[0].height.saturating_sub(1));
        let width = usize::from(chunks[0].width);
        let items = generate_items(list_height, self.cursor, videos, |video| video.label(width));
        let list = List::new(items)
            .block(block)
            .style(Style::default().fg(Color::White));

        f.render_widget(list, chunks[0]);
        f.render_widget(Self::details(videos.get(self.cursor)), chunks[1]);
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(event) = event {
            match event.code {
                KeyCode::Up | KeyCode::Char('k') => self.move_by(-1),
                KeyCode::Down | KeyCode::Char('j') => self.move_by(1),
                KeyCode::Char('g') => self.cursor = 0,
                KeyCode::Char('G') => self.move_bottom(),
                KeyCode::Enter => self.session.select(self.cursor),
                KeyCode::Char('m') => self.load_more(),
                _ => return,
            }
        }

        self.actions.redraw();
    }

    fn registered_events(&self) -> Vec<KeyHint> {
        vec![
            ("j", "Down"),
            ("k", "Up"),
            ("g", "Top"),
            ("G", "Bottom"),
            ("Enter", "Play"),
            ("m", "Load more"),
        ]
    }
}
