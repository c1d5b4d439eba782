//! Shared utility functions and traits

/// Extension trait for tracking minimum and maximum values in `Option<T>`.
///
/// # Example
///
/// ```
/// use wpm_speedometer::utils::MinMaxExt;
///
/// let mut slowest: Option<u32> = None;
/// let mut peak: Option<u32> = None;
///
/// for wpm in [64, 88, 71] {
///     slowest.update_min(wpm);
///     peak.update_max(wpm);
/// }
/// assert_eq!(slowest, Some(64));
/// assert_eq!(peak, Some(88));
/// ```
pub trait MinMaxExt<T: Ord + Copy> {
    /// Store `value` if it is below the current minimum or none is set.
    fn update_min(&mut self, value: T);

    /// Store `value` if it is above the current maximum or none is set.
    fn update_max(&mut self, value: T);
}

impl<T: Ord + Copy> MinMaxExt<T> for Option<T> {
    fn update_min(&mut self, value: T) {
        *self = Some(self.map_or(value, |m| m.min(value)));
    }

    fn update_max(&mut self, value: T) {
        *self = Some(self.map_or(value, |m| m.max(value)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_sets_both() {
        let mut min: Option<u32> = None;
        let mut max: Option<u32> = None;
        min.update_min(100);
        max.update_max(100);
        assert_eq!(min, Some(100));
        assert_eq!(max, Some(100));
    }

    #[test]
    fn only_extremes_replace() {
        let mut min: Option<u32> = Some(50);
        let mut max: Option<u32> = Some(150);
        min.update_min(80);
        max.update_max(120);
        assert_eq!(min, Some(50));
        assert_eq!(max, Some(150));

        min.update_min(20);
        max.update_max(200);
        assert_eq!(min, Some(20));
        assert_eq!(max, Some(200));
    }
}
