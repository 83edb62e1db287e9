use jiff::{SignedDuration, Timestamp};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::utils::time::{is_unbounded, saturating_sub};

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    start: Option<Timestamp>,
    end: Option<Timestamp>,
}

impl TimeWindow {
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        TimeWindow { start, end }
    }

    pub fn from_iso(start: Option<&str>, end: Option<&str>) -> Result<Self, jiff::Error> {
        Ok(TimeWindow {
            start: start.map(str::parse).transpose()?,
            end: end.map(str::parse).transpose()?,
        })
    }

    pub fn start(&self) -> Option<Timestamp> {
        self.start
    }

    pub fn end(&self) -> Option<Timestamp> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn is_valid(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }

    pub fn is_satisfied(&self, arrival: Timestamp) -> bool {
        match self.end {
            Some(end) => arrival <= end,
            None => true,
        }
    }

    /// Seconds past the end of the window, zero when satisfied.
    pub fn overtime(&self, arrival: Timestamp) -> i64 {
        match self.end {
            Some(end) => (arrival.as_second() - end.as_second()).max(0),
            None => 0,
        }
    }

    fn end_or_unbounded(&self) -> Timestamp {
        self.end.unwrap_or(Timestamp::MAX)
    }
}

#[derive(Default)]
pub struct TimeWindowBuilder {
    start: Option<Timestamp>,
    end: Option<Timestamp>,
}

impl TimeWindowBuilder {
    pub fn with_start(mut self, start: Timestamp) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: Timestamp) -> Self {
        self.end = Some(end);
        self
    }

    pub fn build(self) -> TimeWindow {
        TimeWindow {
            start: self.start,
            end: self.end,
        }
    }
}

/// Set of time windows of an activity, kept sorted by start. An empty set
/// puts no constraint on the activity.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(from = "Vec<TimeWindow>", into = "Vec<TimeWindow>")]
pub struct TimeWindows(SmallVec<[TimeWindow; 1]>);

impl From<Vec<TimeWindow>> for TimeWindows {
    fn from(mut windows: Vec<TimeWindow>) -> Self {
        windows.retain(|window| !window.is_empty());
        windows.sort_by_key(|window| window.start.unwrap_or(Timestamp::MIN));
        TimeWindows(SmallVec::from_vec(windows))
    }
}

impl From<TimeWindows> for Vec<TimeWindow> {
    fn from(windows: TimeWindows) -> Self {
        windows.0.into_vec()
    }
}

impl TimeWindows {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeWindow> {
        self.0.iter()
    }

    pub fn is_valid(&self) -> bool {
        self.0.iter().all(TimeWindow::is_valid)
    }

    /// Earliest service start for an arrival at `arrival`: the arrival itself
    /// or the start of the first window still open. `None` when every window
    /// has already closed.
    pub fn service_start(&self, arrival: Timestamp) -> Option<Timestamp> {
        if self.0.is_empty() {
            return Some(arrival);
        }

        self.0
            .iter()
            .find(|window| window.is_satisfied(arrival))
            .map(|window| match window.start {
                Some(start) if start > arrival => start,
                _ => arrival,
            })
    }

    /// Latest arrival that still allows the service to start inside a window
    /// and finish `duration` later no later than `latest_departure`.
    /// `Timestamp::MAX` means unbounded, `Timestamp::MIN` means no arrival
    /// works.
    pub fn latest_arrival(
        &self,
        latest_departure: Timestamp,
        duration: SignedDuration,
    ) -> Timestamp {
        let by_departure = saturating_sub(latest_departure, duration);

        if self.0.is_empty() {
            return by_departure;
        }

        if is_unbounded(latest_departure) {
            return self
                .0
                .iter()
                .map(TimeWindow::end_or_unbounded)
                .max()
                .unwrap_or(Timestamp::MAX);
        }

        // The latest feasible arrival is either the departure bound itself or
        // the end of one of the windows.
        std::iter::once(by_departure)
            .chain(
                self.0
                    .iter()
                    .map(|window| window.end_or_unbounded().min(by_departure)),
            )
            .filter(|&arrival| {
                self.service_start(arrival)
                    .is_some_and(|start| start <= by_departure)
            })
            .max()
            .unwrap_or(Timestamp::MIN)
    }
}
