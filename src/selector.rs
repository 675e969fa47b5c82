//! Category and difficulty pickers.
//!
//! A [`Selector`] only tracks which entry is highlighted. The chosen value
//! lives in the quiz session; [`Selector::choose`] reports a change to the
//! owner and nothing else.

use std::marker::PhantomData;

use crate::models::{Category, Difficulty};

/// A value offered by a [`Selector`].
pub trait Choice: Copy + PartialEq + 'static {
    fn all() -> &'static [Self];
    fn label(&self) -> &'static str;
}

impl Choice for Category {
    fn all() -> &'static [Self] {
        &Category::ALL
    }

    fn label(&self) -> &'static str {
        self.name()
    }
}

impl Choice for Difficulty {
    fn all() -> &'static [Self] {
        &Difficulty::ALL
    }

    fn label(&self) -> &'static str {
        Difficulty::label(*self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector<T: Choice> {
    highlighted: usize,
    _choice: PhantomData<T>,
}

impl<T: Choice> Selector<T> {
    pub fn new() -> Self {
        Self {
            highlighted: 0,
            _choice: PhantomData,
        }
    }

    pub fn choices(&self) -> &'static [T] {
        T::all()
    }

    pub fn highlighted_index(&self) -> usize {
        self.highlighted
    }

    pub fn highlighted(&self) -> T {
        T::all()[self.highlighted]
    }

    pub fn highlight_next(&mut self) {
        self.highlighted = (self.highlighted + 1) % T::all().len();
    }

    pub fn highlight_previous(&mut self) {
        let len = T::all().len();
        self.highlighted = (self.highlighted + len - 1) % len;
    }

    /// Move the highlight onto `current`, if set.
    pub fn sync(&mut self, current: Option<T>) {
        if let Some(index) = current.and_then(|value| T::all().iter().position(|c| *c == value)) {
            self.highlighted = index;
        }
    }

    pub fn reset(&mut self) {
        self.highlighted = 0;
    }

    /// The highlighted value if it differs from `current`.
    pub fn choose(&self, current: Option<T>) -> Option<T> {
        let value = self.highlighted();
        (current != Some(value)).then_some(value)
    }
}

impl<T: Choice> Default for Selector<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_wraps() {
        let mut selector = Selector::<Difficulty>::new();
        selector.highlight_previous();
        assert_eq!(selector.highlighted(), Difficulty::Hard);
        selector.highlight_next();
        assert_eq!(selector.highlighted(), Difficulty::Easy);
    }

    #[test]
    fn test_choose_is_edge_triggered() {
        let mut selector = Selector::<Category>::new();
        assert_eq!(selector.choose(None), Some(Category::GeneralKnowledge));
        assert_eq!(selector.choose(Some(Category::GeneralKnowledge)), None);

        selector.highlight_next();
        assert_eq!(
            selector.choose(Some(Category::GeneralKnowledge)),
            Some(Category::Books)
        );
    }

    #[test]
    fn test_sync_moves_highlight() {
        let mut selector = Selector::<Category>::new();
        selector.sync(Some(Category::History));
        assert_eq!(selector.highlighted(), Category::History);

        selector.sync(None);
        assert_eq!(selector.highlighted(), Category::History);

        selector.reset();
        assert_eq!(selector.highlighted_index(), 0);
    }
}
