use super::{error_handler::ErrorMessage, status_label::StatusLabelMessage, ui::UiMessage};

use log::error;
use std::{
    fmt::Display,
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

/// Cloneable handle components use to talk back to the UI loop.
#[derive(Clone)]
pub struct Actions {
    ui_sender: flume::Sender<UiMessage>,
    error_sender: flume::Sender<ErrorMessage>,
    status_label_sender: flume::Sender<StatusLabelMessage>,
    status_label_id_counter: Arc<AtomicUsize>,
}

impl Actions {
    pub fn new(
        ui_sender: flume::Sender<UiMessage>,
        error_sender: flume::Sender<ErrorMessage>,
        status_label_sender: flume::Sender<StatusLabelMessage>,
    ) -> Self {
        Self {
            ui_sender,
            error_sender,
            status_label_sender,
            status_label_id_counter: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn redraw(&self) {
        let _ = self.ui_sender.send(UiMessage::Redraw);
    }

    pub fn handle_error<E: Display>(&self, error: E, ignorable: bool) {
        let message = error.to_string();
        error!("{}", message);
        let _ = self.error_sender.send(ErrorMessage { message, ignorable });
    }

    /// Redraws on success, shows the error dialog otherwise.
    pub fn redraw_or_error<T, E: Display>(&self, result: Result<T, E>, ignorable: bool) {
        match result {
            Ok(_) => self.redraw(),
            Err(error) => self.handle_error(error, ignorable),
        }
    }

    /// Runs `task` in the background with `label` in the status bar, then
    /// redraws or reports its error as ignorable.
    pub fn spawn_with_label<F, T, E>(&self, label: &str, task: F)
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let finished = self.show_label(label);
        let actions = self.clone();
        tokio::spawn(async move {
            let result = task.await;
            finished();
            actions.redraw_or_error(result, true);
        });
    }

    pub fn start_status(&self, label: &str) -> usize {
        let id = self.status_label_id_counter.fetch_add(1, Ordering::Relaxed) + 1;
        let _ = self
            .status_label_sender
            .send(StatusLabelMessage::Show(id, label.to_owned()));
        id
    }

    pub fn finish_status(&self, id: usize) {
        let _ = self.status_label_sender.send(StatusLabelMessage::Remove(id));
    }

    /// Shows `label` until the returned closure is called.
    pub fn show_label(&self, label: &str) -> impl FnOnce() {
        let id = self.start_status(label);
        let actions = self.clone();
        move || actions.finish_status(id)
    }
}
