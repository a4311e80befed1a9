use super::component::{Component, Frame};

use tui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub struct Dialog {
    title: String,
    body: Option<String>,
}

impl Dialog {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            body: None,
        }
    }

    pub fn new_with_body(title: &str, body: &str) -> Self {
        Self {
            title: title.to_owned(),
            body: Some(body.to_owned()),
        }
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

impl Component for Dialog {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        if let Some(body) = &self.body {
            let block = Block::default()
                .title(&*self.title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .style(Style::default().bg(Color::Black));

            let dialog = Paragraph::new(&**body)
                .block(block)
                .style(Style::default().fg(Color::White))
                .wrap(Wrap { trim: true });

            let area = centered(area, 50, 8);
            f.render_widget(Clear, area);
            f.render_widget(dialog, area);
        } else {
            let dialog = Paragraph::new(&*self.title)
                .block(Block::default().borders(Borders::ALL))
                .style(Style::default().fg(Color::White))
                .alignment(Alignment::Center);

            let area = centered(area, 30, 3);
            f.render_widget(Clear, area);
            f.render_widget(dialog, area);
        }
    }
}
