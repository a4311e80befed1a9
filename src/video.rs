use chrono::{DateTime, FixedOffset};

pub type ChannelId = String;
pub type PlaylistId = String;
pub type PageToken = String;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub published_at: DateTime<FixedOffset>,
    pub playlist_id: PlaylistId,
}

impl Video {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }

    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}?rel=0", self.id)
    }

    pub fn label(&self, width: usize) -> String {
        // Subtract width of datetime and horizontal padding.
        let title_width = width.saturating_sub(16 + 2 + 3);

        let date = self.published_at.format("%Y-%m-%d %H:%M");
        let title: String = self.title.chars().take(title_width).collect();

        format!(" {title:title_width$} - {date} ")
    }
}
