//! Rolling window statistics over closing prices.
//!
//! Mean and sample standard deviation are recomputed over the window contents
//! on every push rather than from running sums.

use statrs::statistics::Statistics;
use std::collections::VecDeque;

/// Statistics for one full window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    /// Arithmetic mean of the window.
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    /// `None` for a single-element window.
    pub std_dev: Option<f64>,
}

/// Fixed-length trailing window of closes.
pub struct RollingWindow {
    /// Window size in bars.
    window: usize,
    /// Most recent values, oldest first.
    values: VecDeque<f64>,
}

impl RollingWindow {
    /// Create a new rolling window. `window` must be at least 1.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            values: VecDeque::with_capacity(window),
        }
    }

    /// Add a value, evicting the oldest once the window is full.
    ///
    /// Returns the window statistics if the window is full.
    pub fn push(&mut self, value: f64) -> Option<WindowStats> {
        if self.values.len() >= self.window {
            self.values.pop_front();
        }
        self.values.push_back(value);
        self.stats()
    }

    /// Statistics of the current window, if it is full.
    pub fn stats(&self) -> Option<WindowStats> {
        if !self.is_ready() {
            return None;
        }

        let mean = Statistics::mean(self.values.iter());
        let std_dev = if self.values.len() < 2 {
            None
        } else if Statistics::max(self.values.iter()) == Statistics::min(self.values.iter()) {
            // Identical closes: exact zero, not accumulated round-off.
            Some(0.0)
        } else {
            let sd = Statistics::std_dev(self.values.iter());
            sd.is_finite().then_some(sd)
        };

        Some(WindowStats { mean, std_dev })
    }

    /// Check if the window is full.
    pub fn is_ready(&self) -> bool {
        self.window > 0 && self.values.len() >= self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_not_ready() {
        let mut window = RollingWindow::new(3);
        assert!(window.push(1.0).is_none());
        assert!(window.push(2.0).is_none());
        assert!(!window.is_ready());
        assert!(window.stats().is_none());
    }

    #[test]
    fn test_constant_values() {
        let mut window = RollingWindow::new(5);
        let mut last = None;
        for _ in 0..10 {
            last = window.push(100.37);
        }
        let stats = last.unwrap();
        assert_relative_eq!(stats.mean, 100.37);
        assert_eq!(stats.std_dev, Some(0.0));
    }

    #[test]
    fn test_known_sample_std() {
        let mut window = RollingWindow::new(3);
        window.push(10.0);
        window.push(10.0);
        let stats = window.push(20.0).unwrap();

        // Mean 13.33; squared deviations 11.11 + 11.11 + 44.44 = 66.67; / 2 = 33.33
        assert_relative_eq!(stats.mean, 40.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(stats.std_dev.unwrap(), (100.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_rolling_eviction() {
        let mut window = RollingWindow::new(2);
        window.push(1.0);
        window.push(3.0);
        let stats = window.push(5.0).unwrap();

        // [3, 5] after evicting 1.
        assert_relative_eq!(stats.mean, 4.0);
        assert_relative_eq!(stats.std_dev.unwrap(), 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_single_element_window() {
        let mut window = RollingWindow::new(1);
        let stats = window.push(42.0).unwrap();
        assert_relative_eq!(stats.mean, 42.0);
        assert!(stats.std_dev.is_none());
    }
}
