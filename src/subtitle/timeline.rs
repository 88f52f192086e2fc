use std::fmt::Debug;
use std::ops::Range;

use super::{Cue, Error, StartTime};

/// Collects cues at explicit positions while a script is decoded.
///
/// Internally, the builder holds two parallel arrays: the start times and the cues. Both are
/// always modified together, so an index into one is always valid for the other.
///
/// Scripts state the position of each cue (`ReadOrder`) rather than relying on the order of
/// lines, and that position is not guaranteed to agree with the start times. [`finish`]
/// therefore sorts by start time before any query can be run.
///
/// [`finish`]: TimelineBuilder::finish
#[derive(Default)]
pub struct TimelineBuilder {
    times: Vec<StartTime>,
    cues: Vec<Cue>,
}

impl TimelineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Insert a cue at position `ordinal`, shifting all later cues up by one. An ordinal past
    /// the end appends the cue instead. Returns the position the cue actually ended up at.
    pub fn insert(&mut self, ordinal: usize, start: StartTime, cue: Cue) -> usize {
        let position = ordinal.min(self.times.len());
        self.times.insert(position, start);
        self.cues.insert(position, cue);
        debug_assert_eq!(self.times.len(), self.cues.len());
        position
    }

    /// Add a cue to the end.
    pub fn push(&mut self, start: StartTime, cue: Cue) {
        self.times.push(start);
        self.cues.push(cue);
    }

    /// Returns true if and only if the start times are non-decreasing in position order.
    #[must_use]
    pub fn is_chronological(&self) -> bool {
        self.times.is_sorted()
    }

    /// Sort the cues by start time and freeze them. Cues with equal start times keep their
    /// relative order.
    #[must_use]
    pub fn finish(self) -> Timeline {
        if self.is_chronological() {
            return Timeline {
                times: self.times,
                cues: self.cues,
            };
        }

        let mut entries: Vec<(StartTime, Cue)> = self.times.into_iter().zip(self.cues).collect();
        entries.sort_by_key(|(start, _)| *start);
        let (times, cues) = entries.into_iter().unzip();
        Timeline { times, cues }
    }
}

impl Debug for TimelineBuilder {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let trail_s = if self.len() == 1 { "" } else { "s" };
        write!(formatter, "TimelineBuilder with {} cue{trail_s}", self.len())
    }
}

/// Immutable sequence of cues ordered by start time, answering the queries a player makes
/// during playback.
///
/// A cue stays active from its start time until the start time of the next later cue; there
/// is no notion of an end time.
#[derive(Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Timeline {
    times: Vec<StartTime>,
    cues: Vec<Cue>,
}

impl Timeline {
    /// Create a new empty `Timeline`.
    #[must_use]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Returns the number of cues (and thus event times) in the timeline.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.times.len()
    }

    /// Returns true if and only if there are no cues in this timeline.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Start time of the `index`th cue.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `index >= self.event_count()`.
    pub fn event_time_at(&self, index: usize) -> Result<StartTime, Error> {
        self.times
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index,
                count: self.times.len(),
            })
    }

    #[must_use]
    pub fn cue_at_index(&self, index: usize) -> Option<&Cue> {
        self.cues.get(index)
    }

    /// The cue to display at `time`: the one with the greatest start time not after `time`.
    /// If several cues share that start time, the first of them is returned. Returns `None`
    /// if `time` is before the first cue.
    #[must_use]
    pub fn active_cue_at(&self, time: StartTime) -> Option<&Cue> {
        self.cues_at(time).first()
    }

    /// All cues sharing the greatest start time not after `time`, in timeline order.
    #[must_use]
    pub fn cues_at(&self, time: StartTime) -> &[Cue] {
        let end = self.times.partition_point(|start| *start <= time);
        let Some(floor) = end.checked_sub(1).map(|last| self.times[last]) else {
            return &[];
        };

        let begin = self.times[..end].partition_point(|start| *start < floor);
        &self.cues[begin..end]
    }

    /// Index of the first cue starting strictly after `time`, or `None` if no cue does.
    #[must_use]
    pub fn next_event_index_after(&self, time: StartTime) -> Option<usize> {
        let index = self.times.partition_point(|start| *start <= time);
        (index < self.times.len()).then_some(index)
    }

    /// Iterate over all cues with their start times, in timeline order.
    pub fn iter(&self) -> impl Iterator<Item = (StartTime, &Cue)> {
        self.times.iter().copied().zip(self.cues.iter())
    }

    /// Iterate over the cues starting within the given half-open interval, in timeline order.
    pub fn iter_range(
        &self,
        interval: &Range<StartTime>,
    ) -> impl Iterator<Item = (StartTime, &Cue)> {
        let begin = self.times.partition_point(|start| *start < interval.start);
        let end = self.times.partition_point(|start| *start < interval.end).max(begin);

        self.times[begin..end]
            .iter()
            .copied()
            .zip(self.cues[begin..end].iter())
    }
}

impl Debug for Timeline {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let trail_s = if self.event_count() == 1 { "" } else { "s" };
        write!(formatter, "Timeline with {} cue{trail_s}", self.event_count())
    }
}

impl FromIterator<(StartTime, Cue)> for Timeline {
    fn from_iter<T: IntoIterator<Item = (StartTime, Cue)>>(iter: T) -> Self {
        let iterator = iter.into_iter();

        let mut builder = TimelineBuilder {
            times: Vec::with_capacity(iterator.size_hint().0),
            cues: Vec::with_capacity(iterator.size_hint().0),
        };

        for (start, cue) in iterator {
            builder.push(start, cue);
        }

        builder.finish()
    }
}
