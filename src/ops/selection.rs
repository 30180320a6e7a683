// ============================================================================
// REGION SELECTION: rubber-band drag gesture in widget space
// ============================================================================

use super::geometry::{Point, Rect};

/// Drags whose width or height does not exceed this many pixels are treated
/// as accidental clicks.
pub const DEFAULT_MIN_SELECTION: i32 = 10;

/// Mouse button identity, independent of the hosting toolkit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

impl PointerButton {
    pub fn label(&self) -> &'static str {
        match self {
            PointerButton::Primary => "Left button",
            PointerButton::Secondary => "Right button",
            PointerButton::Middle => "Middle button",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Dragging { origin: Point, current: Point },
}

/// Tracks one press → move → release selection gesture.
#[derive(Clone, Debug)]
pub struct RegionSelector {
    enabled: bool,
    state: SelectionState,
    min_size: i32,
}

impl Default for RegionSelector {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SELECTION)
    }
}

impl RegionSelector {
    pub fn new(min_size: i32) -> Self {
        Self {
            enabled: false,
            state: SelectionState::Idle,
            min_size: min_size.max(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable selection mode. Disabling mid-drag drops the
    /// gesture and its feedback rectangle.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.state = SelectionState::Idle;
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SelectionState::Dragging { .. })
    }

    /// Start a drag. Returns `true` if the press was consumed.
    pub fn press(&mut self, point: Point, button: PointerButton) -> bool {
        if !self.enabled || button != PointerButton::Primary {
            return false;
        }
        self.state = SelectionState::Dragging { origin: point, current: point };
        true
    }

    /// Update the live rectangle. Returns the feedback rectangle while dragging.
    pub fn move_to(&mut self, point: Point) -> Option<Rect> {
        if let SelectionState::Dragging { current, .. } = &mut self.state {
            *current = point;
        }
        self.feedback()
    }

    /// Rectangle to draw as rubber band, if a drag is in progress.
    pub fn feedback(&self) -> Option<Rect> {
        match self.state {
            SelectionState::Dragging { origin, current } => Some(Rect::from_corners(origin, current)),
            SelectionState::Idle => None,
        }
    }

    /// Finish the drag. Returns the final rectangle unless it is no larger
    /// than the minimum size in either dimension.
    pub fn release(&mut self, point: Point, button: PointerButton) -> Option<Rect> {
        if button != PointerButton::Primary {
            return None;
        }
        let SelectionState::Dragging { origin, .. } = self.state else {
            return None;
        };
        self.state = SelectionState::Idle;

        let rect = Rect::from_corners(origin, point);
        if rect.width > self.min_size && rect.height > self.min_size {
            Some(rect)
        } else {
            log::debug!("Ignoring {}x{} selection below minimum size", rect.width, rect.height);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> RegionSelector {
        let mut s = RegionSelector::default();
        s.set_enabled(true);
        s
    }

    #[test]
    fn press_requires_selection_mode_and_primary_button() {
        let mut s = RegionSelector::default();
        assert!(!s.press(Point::new(1, 1), PointerButton::Primary));
        s.set_enabled(true);
        assert!(!s.press(Point::new(1, 1), PointerButton::Secondary));
        assert!(s.press(Point::new(1, 1), PointerButton::Primary));
        assert!(s.is_dragging());
    }

    #[test]
    fn drag_produces_normalized_rectangle() {
        let mut s = enabled();
        s.press(Point::new(120, 90), PointerButton::Primary);
        let live = s.move_to(Point::new(40, 30));
        assert_eq!(live, Some(Rect::new(40, 30, 80, 60)));
        let done = s.release(Point::new(20, 10), PointerButton::Primary);
        assert_eq!(done, Some(Rect::new(20, 10, 100, 80)));
        assert_eq!(s.state(), SelectionState::Idle);
        assert_eq!(s.feedback(), None);
    }

    #[test]
    fn tiny_drag_is_discarded() {
        let mut s = enabled();
        s.press(Point::new(5, 5), PointerButton::Primary);
        s.move_to(Point::new(8, 8));
        assert_eq!(s.release(Point::new(8, 8), PointerButton::Primary), None);
        assert!(!s.is_dragging());
    }

    #[test]
    fn threshold_is_strict_on_both_axes() {
        let mut s = enabled();
        s.press(Point::ORIGIN, PointerButton::Primary);
        assert_eq!(s.release(Point::new(200, 10), PointerButton::Primary), None);

        s.press(Point::ORIGIN, PointerButton::Primary);
        assert_eq!(
            s.release(Point::new(11, 11), PointerButton::Primary),
            Some(Rect::new(0, 0, 11, 11))
        );
    }

    #[test]
    fn disabling_mid_drag_resets_gesture() {
        let mut s = enabled();
        s.press(Point::new(10, 10), PointerButton::Primary);
        s.move_to(Point::new(80, 80));
        s.set_enabled(false);
        assert_eq!(s.feedback(), None);
        assert_eq!(s.release(Point::new(80, 80), PointerButton::Primary), None);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut s = enabled();
        assert_eq!(s.release(Point::new(50, 50), PointerButton::Primary), None);
        assert_eq!(s.move_to(Point::new(60, 60)), None);
    }
}
