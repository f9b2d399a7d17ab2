//! Scroll-to-top affordance.

/// Vertical offset above which the control appears.
pub const SCROLL_THRESHOLD: u32 = 400;

/// Visibility of the scroll-to-top control, derived from the page offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollToTop {
    visible: bool,
}

impl ScrollToTop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Feed the current offset; returns `true` when visibility flipped.
    /// The browser runs the same rule through [`ScrollToTop::signal_expression`].
    #[cfg(test)]
    pub fn observe(&mut self, offset: f64) -> bool {
        let next = offset > f64::from(SCROLL_THRESHOLD);
        let changed = next != self.visible;
        self.visible = next;
        changed
    }

    /// Offset the control scrolls back to.
    pub fn target_offset(&self) -> u32 {
        0
    }

    /// Datastar expression evaluated on window scroll that keeps the
    /// `showScroll` signal in step with [`ScrollToTop::observe`].
    pub fn signal_expression() -> String {
        format!("$showScroll = window.scrollY > {SCROLL_THRESHOLD}")
    }

    /// Client action performed when the control is invoked.
    pub fn scroll_action(&self) -> String {
        format!(
            "window.scrollTo({{top: {}, behavior: 'smooth'}})",
            self.target_offset()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_at_threshold_and_visible_past_it() {
        let mut control = ScrollToTop::new();
        assert!(!control.observe(400.0));
        assert!(!control.is_visible());

        assert!(control.observe(400.5));
        assert!(control.is_visible());

        assert!(!control.observe(900.0));
        assert!(control.observe(400.0));
        assert!(!control.is_visible());
    }

    #[test]
    fn expressions_share_the_threshold() {
        assert_eq!(
            ScrollToTop::signal_expression(),
            "$showScroll = window.scrollY > 400"
        );
        assert!(ScrollToTop::new().scroll_action().contains("top: 0"));
    }
}
