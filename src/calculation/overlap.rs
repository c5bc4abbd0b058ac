//! Interval overlap evaluation.
//!
//! This module classifies how a candidate interval (a timesheet entry, a
//! sign-up, a slot) relates to a reference window. Both intervals are closed,
//! so touching boundaries count as overlap and a zero-length candidate
//! overlaps any window containing its instant.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{DutyInterval, TimeWindow};

/// How a candidate with no end should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenEnd {
    /// Substitute the given instant for the missing end.
    Now(NaiveDateTime),
    /// Treat the candidate as extending forever.
    Unbounded,
}

/// The relationship between a reference window and a candidate interval.
///
/// # Example
///
/// ```
/// use duty_engine::calculation::{Overlap, classify_windows};
/// use duty_engine::models::TimeWindow;
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let slot = TimeWindow { start: at("2024-08-25 10:00:00"), end: at("2024-08-25 16:00:00") };
/// let worked = TimeWindow { start: at("2024-08-25 09:45:00"), end: at("2024-08-25 12:00:00") };
///
/// assert_eq!(classify_windows(&slot, &worked), Overlap::CandidateOverlapsStart);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlap {
    /// The intervals share no instant.
    NoOverlap,
    /// The candidate covers the whole reference window.
    CandidateSpansReference,
    /// The candidate lies inside the reference window.
    ReferenceSpansCandidate,
    /// The candidate begins before the window and ends inside it.
    CandidateOverlapsStart,
    /// The candidate begins inside the window and ends after it.
    CandidateOverlapsEnd,
}

impl Overlap {
    /// Returns `true` for every case other than [`Overlap::NoOverlap`].
    pub fn is_overlap(self) -> bool {
        self != Overlap::NoOverlap
    }
}

/// Classifies a candidate `[start, end]` against `reference`.
///
/// A missing `candidate_end` is resolved according to `open_end`; the caller
/// always decides which.
pub fn classify_overlap(
    reference: &TimeWindow,
    candidate_start: NaiveDateTime,
    candidate_end: Option<NaiveDateTime>,
    open_end: OpenEnd,
) -> Overlap {
    let candidate_end = match (candidate_end, open_end) {
        (Some(end), _) => Some(end),
        (None, OpenEnd::Now(now)) => Some(now),
        (None, OpenEnd::Unbounded) => None,
    };
    classify(reference, candidate_start, candidate_end)
}

/// Classifies a closed candidate window against `reference`.
pub fn classify_windows(reference: &TimeWindow, candidate: &TimeWindow) -> Overlap {
    classify(reference, candidate.start, Some(candidate.end))
}

/// Classifies a duty interval against `reference`.
pub fn classify_interval(
    reference: &TimeWindow,
    interval: &DutyInterval,
    open_end: OpenEnd,
) -> Overlap {
    classify_overlap(reference, interval.start, interval.end, open_end)
}

/// Returns `true` when two closed windows share at least one instant.
///
/// ```
/// use duty_engine::calculation::overlaps;
/// use duty_engine::models::TimeWindow;
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let morning = TimeWindow { start: at("2024-08-25 06:00:00"), end: at("2024-08-25 12:00:00") };
/// let afternoon = TimeWindow { start: at("2024-08-25 12:00:00"), end: at("2024-08-25 18:00:00") };
///
/// assert!(overlaps(&morning, &afternoon));
/// ```
pub fn overlaps(a: &TimeWindow, b: &TimeWindow) -> bool {
    a.start <= b.end && b.start <= a.end
}

/// The shared part of two windows, if any.
pub fn intersection(a: &TimeWindow, b: &TimeWindow) -> Option<TimeWindow> {
    if !overlaps(a, b) {
        return None;
    }
    Some(TimeWindow {
        start: a.start.max(b.start),
        end: a.end.min(b.end),
    })
}

// `None` as the candidate end means +infinity.
fn classify(
    reference: &TimeWindow,
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
) -> Overlap {
    let ends_at_or_after = |instant: NaiveDateTime| end.is_none_or(|e| e >= instant);

    if !(ends_at_or_after(reference.start) && start <= reference.end) {
        return Overlap::NoOverlap;
    }

    if start <= reference.start && ends_at_or_after(reference.end) {
        Overlap::CandidateSpansReference
    } else if start >= reference.start && end.is_some_and(|e| e <= reference.end) {
        Overlap::ReferenceSpansCandidate
    } else if start < reference.start {
        Overlap::CandidateOverlapsStart
    } else {
        Overlap::CandidateOverlapsEnd
    }
}
