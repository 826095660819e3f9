//! Visibility oracle for the load-more sentinel.
//!
//! Geometry is in device-independent pixels, measured from the top of the
//! scrollable content. The viewport's bottom edge is extended by a trailing
//! margin so loading starts before the sentinel is actually on screen.

use crate::application::query_cache::QueryResult;

pub const DEFAULT_TRAILING_MARGIN_PX: f64 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sentinel {
    top: f64,
    height: f64,
}

#[derive(Debug, Clone)]
pub struct ScrollSensor {
    trailing_margin: f64,
    sentinel: Option<Sentinel>,
    viewport: Option<Viewport>,
    visible: bool,
}

impl Default for ScrollSensor {
    fn default() -> Self {
        Self::new(DEFAULT_TRAILING_MARGIN_PX)
    }
}

impl ScrollSensor {
    pub fn new(trailing_margin: f64) -> Self {
        Self {
            trailing_margin: trailing_margin.max(0.0),
            sentinel: None,
            viewport: None,
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// (Re-)observe the sentinel at its current position. Must be called
    /// whenever layout moves it, e.g. after a page is appended.
    pub fn observe(&mut self, top: f64, height: f64) -> bool {
        self.sentinel = Some(Sentinel {
            top,
            height: height.max(0.0),
        });
        self.evaluate()
    }

    pub fn unobserve(&mut self) {
        self.sentinel = None;
        self.visible = false;
    }

    pub fn on_viewport(&mut self, viewport: Viewport) -> bool {
        self.viewport = Some(viewport);
        self.evaluate()
    }

    fn evaluate(&mut self) -> bool {
        self.visible = match (self.sentinel, self.viewport) {
            (Some(sentinel), Some(viewport)) => {
                let root_top = viewport.scroll_top;
                let root_bottom = viewport.scroll_top + viewport.height + self.trailing_margin;
                sentinel.top <= root_bottom && sentinel.top + sentinel.height >= root_top
            }
            _ => false,
        };
        self.visible
    }
}

/// Whether a visible sentinel should pull in the next page.
pub fn should_load_more(visible: bool, result: &QueryResult) -> bool {
    visible && result.has_more() && !result.is_fetching()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(scroll_top: f64) -> Viewport {
        Viewport {
            scroll_top,
            height: 800.0,
        }
    }

    #[test]
    fn test_not_visible_until_observed() {
        let mut sensor = ScrollSensor::default();
        assert!(!sensor.on_viewport(viewport(0.0)));
    }

    #[test]
    fn test_trailing_margin_triggers_early() {
        let mut sensor = ScrollSensor::default();
        sensor.observe(1150.0, 40.0);
        assert!(sensor.on_viewport(viewport(0.0)), "1150 is inside 800 + 400");
        sensor.observe(1250.0, 40.0);
        assert!(!sensor.is_visible());
    }

    #[test]
    fn test_zero_margin() {
        let mut sensor = ScrollSensor::new(0.0);
        sensor.observe(900.0, 40.0);
        assert!(!sensor.on_viewport(viewport(0.0)));
        assert!(sensor.on_viewport(viewport(200.0)));
    }

    #[test]
    fn test_reobserve_after_layout_change() {
        let mut sensor = ScrollSensor::default();
        sensor.observe(600.0, 40.0);
        assert!(sensor.on_viewport(viewport(0.0)));
        // a page was appended and pushed the sentinel down
        assert!(!sensor.observe(3000.0, 40.0));
        assert!(sensor.on_viewport(viewport(2000.0)));
    }

    #[test]
    fn test_scrolled_past_is_not_visible() {
        let mut sensor = ScrollSensor::new(0.0);
        sensor.observe(100.0, 40.0);
        assert!(!sensor.on_viewport(viewport(500.0)));
    }

    #[test]
    fn test_unobserve_hides() {
        let mut sensor = ScrollSensor::default();
        sensor.observe(10.0, 40.0);
        sensor.on_viewport(viewport(0.0));
        sensor.unobserve();
        assert!(!sensor.is_visible());
    }
}
