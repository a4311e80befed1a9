use super::{
    actions::Actions,
    component::{Backend, Component, Frame, KeyHint},
    error_handler::ErrorHandler,
    session_provider::SessionProvider,
    status_label::StatusLabel,
};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent};
use std::io;
use tokio::select;
use tokio_stream::StreamExt;
use tui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::Paragraph,
    Terminal,
};

pub enum UiMessage {
    Redraw,
}

struct Root {
    content: ErrorHandler,
    status_label: StatusLabel,
}

impl Root {
    fn footer(hints: Vec<KeyHint>) -> Paragraph<'static> {
        let spans: Vec<Span> = hints
            .into_iter()
            .chain(std::iter::once(("q", "Quit")))
            .flat_map(|(key, label)| {
                [
                    Span::styled(key, Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(format!(" {label}  ")),
                ]
            })
            .collect();
        Paragraph::new(Spans::from(spans)).style(Style::default().fg(Color::Gray))
    }
}

impl Component for Root {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(1),
                ]
                .as_ref(),
            )
            .split(area);

        let title = Paragraph::new(Span::styled(
            " KidTube",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        f.render_widget(title, chunks[0]);
        self.status_label.draw(f, chunks[0]);

        self.content.draw(f, chunks[1]);
        f.render_widget(Self::footer(self.content.registered_events()), chunks[2]);
    }

    fn handle_event(&mut self, event: Event) {
        self.content.handle_event(event);
    }
}

pub async fn run(terminal: &mut Terminal<Backend>) -> io::Result<()> {
    let mut event_reader = EventStream::new();
    let (ui_sender, ui_receiver) = flume::unbounded();
    let (error_sender, error_receiver) = flume::unbounded();
    let (status_label_sender, status_label_receiver) = flume::unbounded();

    let actions = Actions::new(ui_sender.clone(), error_sender, status_label_sender);
    let mut root = Root {
        content: ErrorHandler::new(
            ui_sender.clone(),
            error_receiver,
            Box::new(SessionProvider::new(actions.clone())),
        ),
        status_label: StatusLabel::new(ui_sender, status_label_receiver),
    };

    draw(terminal, &mut root)?;

    loop {
        select! {
            Ok(UiMessage::Redraw) = ui_receiver.recv_async() => draw(terminal, &mut root)?,
            Some(Ok(event)) = event_reader.next() => {
                if event == Event::Key(KeyEvent::from(KeyCode::Char('q'))) {
                    break;
                }
                root.handle_event(event);
            },
        };
    }

    Ok(())
}

fn draw(terminal: &mut Terminal<Backend>, root: &mut Root) -> io::Result<()> {
    terminal.draw(|f| {
        let area = f.size();
        root.draw(f, area);
    })?;
    Ok(())
}
