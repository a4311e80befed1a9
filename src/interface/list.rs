use std::ops::Range;
use tui::{
    style::{Color, Modifier, Style},
    widgets::ListItem,
};

/// Builds the rows that fit in `height`, keeping `current_index` in view and
/// highlighted.
pub fn generate_items<T>(
    height: usize,
    current_index: usize,
    items: &[T],
    label: impl Fn(&T) -> String,
) -> Vec<ListItem<'static>> {
    let range = visible_range(height, items.len(), current_index);
    items[range.clone()]
        .iter()
        .zip(range)
        .map(|(item, i)| {
            let item = ListItem::new(label(item));
            if i == current_index {
                item.style(
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                item
            }
        })
        .collect()
}

/// Window of `height` rows over `len` items that centers `current_index` where
/// possible.
pub fn visible_range(height: usize, len: usize, current_index: usize) -> Range<usize> {
    if height >= len {
        return 0..len;
    }

    let start = current_index
        .saturating_sub(height / 2)
        .min(len - height);
    start..start + height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_fits() {
        assert_eq!(visible_range(10, 4, 3), 0..4);
        assert_eq!(visible_range(10, 0, 0), 0..0);
    }

    #[test]
    fn top_of_long_list() {
        assert_eq!(visible_range(5, 20, 0), 0..5);
        assert_eq!(visible_range(5, 20, 2), 0..5);
    }

    #[test]
    fn middle_of_long_list_is_centered() {
        assert_eq!(visible_range(5, 20, 10), 8..13);
    }

    #[test]
    fn bottom_of_long_list() {
        assert_eq!(visible_range(5, 20, 19), 15..20);
        assert_eq!(visible_range(5, 20, 18), 15..20);
    }

    #[test]
    fn generates_only_visible_rows() {
        let items: Vec<u32> = (0..20).collect();
        let rows = generate_items(5, 10, &items, |item| item.to_string());
        assert_eq!(rows.len(), 5);
    }
}
