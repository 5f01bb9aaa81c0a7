//! Current color labels and the single mutation path that changes them.

use std::fmt;

use crate::types::{AgentId, Color};

/// Receives a notification whenever an agent's color actually changes.
///
/// Fire-and-forget; the simulation never reads anything back.
pub trait ColorObserver: Send {
    fn on_color_changed(&mut self, agent: AgentId, color: Color);
}

impl<F> ColorObserver for F
where
    F: FnMut(AgentId, Color) + Send,
{
    fn on_color_changed(&mut self, agent: AgentId, color: Color) {
        self(agent, color)
    }
}

/// Color label of every agent, indexed by [`AgentId`].
///
/// [`ColorState::set`] is the only way to change a label, so the observer
/// sees every change exactly once.
pub struct ColorState {
    colors: Vec<Color>,
    observer: Option<Box<dyn ColorObserver>>,
}

impl ColorState {
    /// Creates the state from initial labels without notifying anyone.
    pub fn new(colors: Vec<Color>) -> Self {
        Self {
            colors,
            observer: None,
        }
    }

    /// Installs the change observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: Box<dyn ColorObserver>) {
        self.observer = Some(observer);
    }

    /// Removes the change observer.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Current color of `agent`.
    ///
    /// # Panics
    ///
    /// Panics if `agent` is not a valid id.
    pub fn get(&self, agent: AgentId) -> Color {
        self.colors[agent]
    }

    /// Sets the color of `agent`. Returns true if the label changed.
    ///
    /// Setting the current color is a no-op and fires no notification.
    pub fn set(&mut self, agent: AgentId, color: Color) -> bool {
        if self.colors[agent] == color {
            return false;
        }
        self.colors[agent] = color;
        if let Some(observer) = self.observer.as_mut() {
            observer.on_color_changed(agent, color);
        }
        true
    }

    /// All labels in id order.
    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Number of agents per color, in `Red`, `Green`, `Blue` order.
    pub fn counts(&self) -> [usize; 3] {
        let mut counts = [0usize; 3];
        for c in &self.colors {
            counts[c.index()] += 1;
        }
        counts
    }

    /// Population share of each color; all zero for an empty roster.
    pub fn shares(&self) -> [f64; 3] {
        let n = self.colors.len();
        if n == 0 {
            return [0.0; 3];
        }
        self.counts().map(|c| c as f64 / n as f64)
    }
}

impl fmt::Debug for ColorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorState")
            .field("colors", &self.colors)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn set_reports_change() {
        let mut state = ColorState::new(vec![Color::Red, Color::Green]);
        assert!(state.set(0, Color::Blue));
        assert_eq!(state.get(0), Color::Blue);
        assert!(!state.set(0, Color::Blue));
    }

    #[test]
    fn observer_sees_only_real_changes() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let mut state = ColorState::new(vec![Color::Red, Color::Green, Color::Blue]);
        state.set_observer(Box::new(move |id: AgentId, color: Color| {
            sink.lock().unwrap().push((id, color));
        }));

        state.set(1, Color::Green);
        state.set(2, Color::Red);
        state.set(0, Color::Red);
        state.set(1, Color::Blue);

        let seen = log.lock().unwrap().clone();
        assert_eq!(seen, vec![(2, Color::Red), (1, Color::Blue)]);
    }

    #[test]
    fn counts_and_shares() {
        let state = ColorState::new(vec![Color::Red, Color::Red, Color::Blue, Color::Green]);
        assert_eq!(state.counts(), [2, 1, 1]);
        assert_eq!(state.shares(), [0.5, 0.25, 0.25]);
    }

    #[test]
    fn empty_shares_are_zero() {
        let state = ColorState::new(Vec::new());
        assert!(state.is_empty());
        assert_eq!(state.shares(), [0.0; 3]);
    }
}
