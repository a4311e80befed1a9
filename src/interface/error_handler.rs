use super::{
    component::{Component, Frame, KeyHint},
    dialog::Dialog,
    ui::UiMessage,
};

use crossterm::event::{Event, KeyCode, KeyEvent};
use parking_lot::Mutex;
use std::sync::Arc;
use tui::layout::Rect;

pub struct ErrorMessage {
    pub message: String,
    pub ignorable: bool,
}

/// Shows the latest error on top of its child. Ignorable errors close on Esc,
/// others block input until the app is quit.
pub struct ErrorHandler {
    ui_sender: flume::Sender<UiMessage>,
    child: Box<dyn Component + Send>,
    error: Arc<Mutex<Option<ErrorMessage>>>,
}

impl ErrorHandler {
    pub fn new(
        ui_sender: flume::Sender<UiMessage>,
        error_receiver: flume::Receiver<ErrorMessage>,
        child: Box<dyn Component + Send>,
    ) -> Self {
        let error_handler = Self {
            ui_sender,
            child,
            error: Arc::new(Mutex::new(None)),
        };

        error_handler.listen_error_messages(error_receiver);
        error_handler
    }

    fn listen_error_messages(&self, error_receiver: flume::Receiver<ErrorMessage>) {
        let ui_sender = self.ui_sender.clone();
        let error = Arc::clone(&self.error);
        tokio::spawn(async move {
            while let Ok(new_error) = error_receiver.recv_async().await {
                {
                    let mut error = error.lock();
                    // Keep a blocking error visible over later ignorable ones.
                    if !matches!(*error, Some(ErrorMessage { ignorable: false, .. })) {
                        *error = Some(new_error);
                    }
                }
                let _ = ui_sender.send(UiMessage::Redraw);
            }
        });
    }
}

impl Component for ErrorHandler {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        self.child.draw(f, area);

        if let Some(ref error) = *self.error.lock() {
            Dialog::new_with_body("An error occurred", &error.message).draw(f, area);
        }
    }

    fn handle_event(&mut self, event: Event) {
        let ignorable = self.error.lock().as_ref().map(|error| error.ignorable);
        match ignorable {
            Some(true) if event == Event::Key(KeyEvent::from(KeyCode::Esc)) => {
                *self.error.lock() = None;
                let _ = self.ui_sender.send(UiMessage::Redraw);
            }
            Some(_) => (),
            None => self.child.handle_event(event),
        }
    }

    fn registered_events(&self) -> Vec<KeyHint> {
        match *self.error.lock() {
            Some(ErrorMessage { ignorable: true, .. }) => vec![("Esc", "Close")],
            Some(ErrorMessage { ignorable: false, .. }) => vec![],
            None => self.child.registered_events(),
        }
    }
}
