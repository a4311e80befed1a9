use crossterm::event::Event;
use tui::{backend::CrosstermBackend, layout::Rect, Frame as TuiFrame};

pub type Backend = CrosstermBackend<std::io::Stdout>;
pub type Frame<'a> = TuiFrame<'a, Backend>;

/// Key hint shown in the footer, e.g. `("n", "Next")`.
pub type KeyHint = (&'static str, &'static str);

pub trait Component {
    fn draw(&mut self, f: &mut Frame, area: Rect);

    fn handle_event(&mut self, _event: Event) {}

    fn registered_events(&self) -> Vec<KeyHint> {
        Vec::new()
    }
}
