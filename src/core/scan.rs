//! Range sweep from the robot's distance sensor.

/// One sweep of range readings.
///
/// Ranges and angles are parallel arrays in sensor order. Angles are in
/// radians relative to the robot heading, CCW positive (0 = straight ahead).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeScan {
    /// Measured distances in meters.
    pub ranges: Vec<f32>,
    /// Beam angles relative to heading.
    pub angles: Vec<f32>,
}

impl RangeScan {
    /// Build a scan from parallel range and angle arrays.
    ///
    /// Trailing entries of the longer array are dropped.
    pub fn new(mut ranges: Vec<f32>, mut angles: Vec<f32>) -> Self {
        let n = ranges.len().min(angles.len());
        ranges.truncate(n);
        angles.truncate(n);
        Self { ranges, angles }
    }

    /// Create an empty scan with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ranges: Vec::with_capacity(capacity),
            angles: Vec::with_capacity(capacity),
        }
    }

    /// Append a beam.
    #[inline]
    pub fn push(&mut self, angle: f32, range: f32) {
        self.angles.push(angle);
        self.ranges.push(range);
    }

    /// Number of beams.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// True if the scan holds no beams.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Iterate `(angle, range)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.angles.iter().copied().zip(self.ranges.iter().copied())
    }

    /// Iterate beams with `|angle| <= half_angle`.
    pub fn forward_window(&self, half_angle: f32) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.iter()
            .filter(move |(angle, _)| super::normalize_angle(*angle).abs() <= half_angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_truncates_to_shorter() {
        let scan = RangeScan::new(vec![1.0, 2.0, 3.0], vec![0.0, 0.1]);
        assert_eq!(scan.len(), 2);
        assert_eq!(scan.angles.len(), 2);
    }

    #[test]
    fn test_forward_window() {
        let mut scan = RangeScan::with_capacity(4);
        scan.push(0.0, 1.0);
        scan.push(0.4, 2.0);
        scan.push(-0.4, 3.0);
        scan.push(3.0, 4.0);

        let narrow: Vec<_> = scan.forward_window(0.5).map(|(_, r)| r).collect();
        assert_eq!(narrow, vec![1.0, 2.0, 3.0]);
        assert_eq!(scan.forward_window(0.1).count(), 1);
    }
}
