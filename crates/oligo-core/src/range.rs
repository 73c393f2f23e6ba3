use serde::{Deserialize, Serialize};

/// Inclusive range `[begin, end]`.
///
/// Integer ranges are 1-based sequence coordinates; real-valued ranges are
/// used for temperature windows. A range whose `begin` exceeds its `end` is
/// representable but not *normal*.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosedRange<T> {
    pub begin: T,
    pub end: T,
}

impl<T: Copy + PartialOrd> ClosedRange<T> {
    pub fn new(begin: T, end: T) -> Self {
        Self { begin, end }
    }

    pub fn is_normal(&self) -> bool {
        self.begin <= self.end
    }

    /// True when `value` lies inside the range. A non-normal range contains nothing.
    pub fn contains(&self, value: T) -> bool {
        self.begin <= value && value <= self.end
    }

    /// Range with the endpoints swapped if needed so that `begin <= end`.
    pub fn normalized(&self) -> Self {
        if self.is_normal() {
            *self
        } else {
            Self {
                begin: self.end,
                end: self.begin,
            }
        }
    }
}

impl ClosedRange<usize> {
    /// Number of positions covered; 0 for a non-normal range.
    pub fn length(&self) -> usize {
        if self.is_normal() {
            self.end - self.begin + 1
        } else {
            0
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for ClosedRange<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.begin, self.end)
    }
}
