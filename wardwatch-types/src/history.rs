//! Bounded, time-ordered vitals history.

use std::collections::vec_deque::{self, VecDeque};
use std::time::Duration;

use crate::{Timestamp, VitalsSnapshot};

/// Retention used by the ward views: 7 days at 15-minute resolution.
pub const DEFAULT_HISTORY_CAPACITY: usize = 7 * 24 * 4;

/// A vitals snapshot tagged with its capture time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryPoint {
    pub timestamp: Timestamp,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub vitals: VitalsSnapshot,
}

impl HistoryPoint {
    pub const fn new(timestamp: Timestamp, vitals: VitalsSnapshot) -> Self {
        Self { timestamp, vitals }
    }
}

/// Error returned when a point would break the history ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    /// The appended point is older than the current tail.
    OutOfOrder { last: Timestamp, attempted: Timestamp },
    /// A window holds more points than its capacity allows.
    OverCapacity { len: usize, capacity: usize },
}

impl core::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HistoryError::OutOfOrder { last, attempted } => write!(
                f,
                "history point at {} precedes the latest point at {}",
                attempted, last
            ),
            HistoryError::OverCapacity { len, capacity } => write!(
                f,
                "history holds {} points but its capacity is {}",
                len, capacity
            ),
        }
    }
}

impl std::error::Error for HistoryError {}

/// A fixed-capacity ring of history points in non-decreasing time order.
///
/// Appending past capacity evicts the oldest point. Points are only ever
/// added at the tail, and a point older than the tail is rejected, so the
/// window stays sorted and can be range-queried with a binary search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawHistoryWindow"))]
pub struct HistoryWindow {
    capacity: usize,
    points: VecDeque<HistoryPoint>,
}

/// Unchecked wire form; deserializing goes through [`HistoryWindow::check`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawHistoryWindow {
    capacity: usize,
    points: VecDeque<HistoryPoint>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawHistoryWindow> for HistoryWindow {
    type Error = HistoryError;

    fn try_from(raw: RawHistoryWindow) -> Result<Self, Self::Error> {
        let window = Self {
            capacity: raw.capacity,
            points: raw.points,
        };
        window.check()?;
        Ok(window)
    }
}

impl HistoryWindow {
    /// Create an empty window. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
        }
    }

    /// Build a window from existing points, keeping only the newest
    /// `capacity` of them.
    pub fn from_points<I>(capacity: usize, points: I) -> Result<Self, HistoryError>
    where
        I: IntoIterator<Item = HistoryPoint>,
    {
        let mut window = Self::new(capacity);
        for point in points {
            window.append(point)?;
        }
        Ok(window)
    }

    /// Append a point at the tail, returning the evicted point if the
    /// window was full.
    pub fn append(&mut self, point: HistoryPoint) -> Result<Option<HistoryPoint>, HistoryError> {
        if let Some(last) = self.points.back() {
            if point.timestamp < last.timestamp {
                return Err(HistoryError::OutOfOrder {
                    last: last.timestamp,
                    attempted: point.timestamp,
                });
            }
        }

        let evicted = if self.points.len() >= self.capacity {
            self.points.pop_front()
        } else {
            None
        };
        self.points.push_back(point);
        Ok(evicted)
    }

    /// Points with `timestamp >= since`, oldest first.
    ///
    /// The returned iterator borrows the window, is cheap to clone (and so
    /// restartable), and never mutates the source.
    pub fn query(&self, since: Timestamp) -> vec_deque::Iter<'_, HistoryPoint> {
        let start = self.points.partition_point(|p| p.timestamp < since);
        self.points.range(start..)
    }

    /// Verify the capacity bound and time ordering.
    ///
    /// Windows built through [`append`](Self::append) always pass; this is
    /// for windows that arrive from outside, such as a restored roster.
    pub fn check(&self) -> Result<(), HistoryError> {
        if self.capacity == 0 || self.points.len() > self.capacity {
            return Err(HistoryError::OverCapacity {
                len: self.points.len(),
                capacity: self.capacity,
            });
        }
        let mut points = self.points.iter();
        if let Some(first) = points.next() {
            let mut last = first.timestamp;
            for point in points {
                if point.timestamp < last {
                    return Err(HistoryError::OutOfOrder {
                        last,
                        attempted: point.timestamp,
                    });
                }
                last = point.timestamp;
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, HistoryPoint> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    pub fn oldest(&self) -> Option<&HistoryPoint> {
        self.points.front()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.points.len() >= self.capacity
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<'a> IntoIterator for &'a HistoryWindow {
    type Item = &'a HistoryPoint;
    type IntoIter = vec_deque::Iter<'a, HistoryPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Time-range presets offered by the patient detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HistoryRange {
    LastHour,
    LastDay,
    LastWeek,
}

impl HistoryRange {
    pub fn duration(&self) -> Duration {
        match self {
            HistoryRange::LastHour => Duration::from_secs(3600),
            HistoryRange::LastDay => Duration::from_secs(24 * 3600),
            HistoryRange::LastWeek => Duration::from_secs(7 * 24 * 3600),
        }
    }

    /// The earliest timestamp included when viewing this range at `now`.
    pub fn since(&self, now: Timestamp) -> Timestamp {
        now - self.duration()
    }

    pub fn label(&self) -> &'static str {
        match self {
            HistoryRange::LastHour => "1h",
            HistoryRange::LastDay => "24h",
            HistoryRange::LastWeek => "7d",
        }
    }
}
