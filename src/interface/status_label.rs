use super::{
    component::{Component, Frame},
    ui::UiMessage,
};

use parking_lot::Mutex;
use std::{collections::BTreeMap, sync::Arc};
use tui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
};

pub const LOADING_STRING: &str = "Loading...";

pub enum StatusLabelMessage {
    Show(usize, String),
    Remove(usize),
}

/// Right aligned labels in the top row, in the order they were started.
#[derive(Clone)]
pub struct StatusLabel {
    status_labels: Arc<Mutex<BTreeMap<usize, String>>>,
}

impl StatusLabel {
    pub fn new(
        ui_sender: flume::Sender<UiMessage>,
        receiver: flume::Receiver<StatusLabelMessage>,
    ) -> Self {
        let status_label = Self {
            status_labels: Default::default(),
        };

        status_label.listen_status_label_messages(ui_sender, receiver);
        status_label
    }

    fn listen_status_label_messages(
        &self,
        ui_sender: flume::Sender<UiMessage>,
        receiver: flume::Receiver<StatusLabelMessage>,
    ) {
        let status_labels = self.status_labels.clone();
        tokio::spawn(async move {
            while let Ok(message) = receiver.recv_async().await {
                {
                    let mut status_labels = status_labels.lock();
                    match message {
                        StatusLabelMessage::Show(id, label) => {
                            status_labels.insert(id, label);
                        }
                        StatusLabelMessage::Remove(id) => {
                            status_labels.remove(&id);
                        }
                    }
                }
                let _ = ui_sender.send(UiMessage::Redraw);
            }
        });
    }

    fn text(&self) -> Option<String> {
        let status_labels = self.status_labels.lock();
        (!status_labels.is_empty()).then(|| {
            status_labels
                .values()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
    }
}

impl Component for StatusLabel {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        if let Some(text) = self.text() {
            let width = u16::try_from(text.chars().count())
                .unwrap_or(u16::MAX)
                .min(area.width);
            let label_area = Rect::new(area.x + area.width - width, area.y, width, 1);
            let label = Paragraph::new(text).style(Style::default().fg(Color::White));
            f.render_widget(label, label_area);
        }
    }
}
