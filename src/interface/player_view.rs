use super::{
    actions::Actions,
    component::{Component, Frame, KeyHint},
    status_label::LOADING_STRING,
};
use crate::session::Session;

use crossterm::event::{Event, KeyCode};
use std::{process::Stdio, sync::Arc};
use tokio::process::Command;
use tui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub struct PlayerView {
    actions: Actions,
    session: Arc<Session>,
    player: String,
}

impl PlayerView {
    pub fn new(actions: Actions, session: Arc<Session>, player: String) -> Self {
        Self {
            actions,
            session,
            player,
        }
    }

    fn next(&self) {
        let session = self.session.clone();
        self.actions
            .spawn_with_label(LOADING_STRING, async move { session.next().await });
    }

    /// Hands the current video to the external player.
    fn play(&self) {
        let Some(video) = self.session.snapshot().current_video().cloned() else {
            return;
        };

        let mut command = Command::new(&self.player);
        command
            .arg(video.watch_url())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        self.actions
            .spawn_with_label("Playing...", async move { command.status().await });
    }

    fn control(key: &str, label: &str, enabled: bool) -> Span<'static> {
        let style = if enabled {
            Style::default().fg(Color::White)
        } else {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT)
        };
        Span::styled(format!(" [{key}] {label} "), style)
    }
}

impl Component for PlayerView {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let state = self.session.snapshot();
        let (Some(index), Some(video)) = (state.navigation.current(), state.current_video()) else {
            return;
        };

        let loading = state.loading;
        let has_next = index + 1 < state.feed.len() || !state.exhausted;
        let lines = vec![
            Spans::from(Span::styled(
                video.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Spans::from(""),
            Spans::from(format!("Video {}", video.id)),
            Spans::from(video.embed_url()),
            Spans::from(format!(
                "Published {}",
                video.published_at.format("%Y-%m-%d %H:%M")
            )),
            Spans::from(format!("{} of {}", index + 1, state.feed.len())),
            Spans::from(""),
            Spans::from(vec![
                Self::control("h", "Home", true),
                Self::control("p", "Previous", state.navigation.can_go_previous()),
                Self::control("n", "Next", has_next && !loading),
                Self::control("Enter", "Play", true),
            ]),
        ];

        let player = Paragraph::new(lines)
            .block(Block::default().title("Now playing").borders(Borders::ALL))
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(player, area);
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(event) = event {
            match event.code {
                KeyCode::Char('h') | KeyCode::Esc => self.session.home(),
                KeyCode::Char('p') | KeyCode::Left => self.session.previous(),
                KeyCode::Char('n') | KeyCode::Right => self.next(),
                KeyCode::Enter => self.play(),
                _ => return,
            }
        }

        self.actions.redraw();
    }

    fn registered_events(&self) -> Vec<KeyHint> {
        vec![
            ("h", "Home"),
            ("p", "Previous"),
            ("n", "Next"),
            ("Enter", "Play"),
        ]
    }
}
