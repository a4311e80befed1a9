/// What the user is looking at: the feed, or the player on one feed index.
///
/// Every transition takes the current feed length and returns a new value; an
/// index held by `Playing` is always below that length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Navigation {
    #[default]
    Browsing,
    Playing(usize),
}

/// Result of pressing Next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Next {
    Moved(Navigation),
    /// The last loaded video is playing; more have to be fetched before moving on.
    NeedsMore { from: usize },
}

impl Navigation {
    pub fn current(self) -> Option<usize> {
        match self {
            Self::Browsing => None,
            Self::Playing(index) => Some(index),
        }
    }

    pub fn can_go_previous(self) -> bool {
        matches!(self, Self::Playing(index) if index > 0)
    }

    pub fn select(self, index: usize, len: usize) -> Self {
        match self {
            Self::Browsing if index < len => Self::Playing(index),
            _ => self,
        }
    }

    pub fn home(self) -> Self {
        Self::Browsing
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Playing(index) => Self::Playing(index.saturating_sub(1)),
            Self::Browsing => self,
        }
    }

    pub fn next(self, len: usize) -> Next {
        match self {
            Self::Playing(index) if index + 1 < len => Next::Moved(Self::Playing(index + 1)),
            Self::Playing(index) => Next::NeedsMore { from: index },
            Self::Browsing => Next::Moved(self),
        }
    }

    /// Finishes a Next that had to load more videos first. Navigation that moved
    /// on while loading (e.g. back to the feed) is left alone. If nothing new
    /// arrived the index stays on the last video.
    pub fn after_load_more(self, from: usize, len: usize) -> Self {
        match self {
            Self::Playing(index) if index == from && index + 1 < len => Self::Playing(index + 1),
            other => other.clamp(len),
        }
    }

    pub fn clamp(self, len: usize) -> Self {
        match self {
            Self::Playing(_) if len == 0 => Self::Browsing,
            Self::Playing(index) if index >= len => Self::Playing(len - 1),
            other => other,
        }
    }
}
