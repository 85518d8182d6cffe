//! Caller-owned anchor layout
//!
//! The solvers never hold on to anchors. A caller that edits anchors
//! interactively keeps them here and hands a fresh snapshot to the engine on
//! every request. The layout always holds between three anchors and
//! `max_anchors` (ten by default).

use crate::core::{
    Anchor, AnchorId, BearingMeasurement, Point2D, RangeMeasurement, MAX_LAYOUT_ANCHORS,
    RANGE_ANCHORS,
};
use crate::validation::data::{validate_anchor, validate_range};
use crate::validation::error::LocalizationError;
use log::debug;

/// Errors from editing an anchor layout
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("layout is full: at most {max} anchors allowed")]
    TooManyAnchors { max: usize },
    #[error("layout needs at least {min} anchors")]
    TooFewAnchors { min: usize },
    #[error("no anchor with id {0}")]
    UnknownAnchor(AnchorId),
    #[error("anchor id {0} used twice")]
    DuplicateAnchor(AnchorId),
    #[error(transparent)]
    Invalid(#[from] LocalizationError),
}

/// Ordered set of anchors with their current ranges
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorLayout {
    entries: Vec<RangeMeasurement>,
    max_anchors: usize,
}

impl Default for AnchorLayout {
    /// Warehouse starting layout: A1 (6, 7.5), A2 (9, -3), A3 (5, 7.5) with
    /// ranges 7, 5 and 8.
    fn default() -> Self {
        Self {
            entries: vec![
                RangeMeasurement::new(Anchor::new(1, 6.0, 7.5), 7.0),
                RangeMeasurement::new(Anchor::new(2, 9.0, -3.0), 5.0),
                RangeMeasurement::new(Anchor::new(3, 5.0, 7.5), 8.0),
            ],
            max_anchors: MAX_LAYOUT_ANCHORS,
        }
    }
}

impl AnchorLayout {
    /// Layout of at most ten anchors; see [`AnchorLayout::with_max_anchors`]
    pub fn new(entries: Vec<RangeMeasurement>) -> Result<Self, LayoutError> {
        Self::with_max_anchors(entries, MAX_LAYOUT_ANCHORS)
    }

    /// Check and wrap `entries`.
    ///
    /// Needs 3..=`max_anchors` entries with unique ids and valid positions and
    /// ranges. A `max_anchors` below three is raised to three.
    pub fn with_max_anchors(entries: Vec<RangeMeasurement>, max_anchors: usize) -> Result<Self, LayoutError> {
        let max_anchors = max_anchors.max(RANGE_ANCHORS);
        if entries.len() < RANGE_ANCHORS {
            return Err(LayoutError::TooFewAnchors { min: RANGE_ANCHORS });
        }
        if entries.len() > max_anchors {
            return Err(LayoutError::TooManyAnchors { max: max_anchors });
        }

        for (i, entry) in entries.iter().enumerate() {
            validate_range(entry)?;
            if entries[..i].iter().any(|e| e.anchor.id == entry.anchor.id) {
                return Err(LayoutError::DuplicateAnchor(entry.anchor.id));
            }
        }

        Ok(Self {
            entries,
            max_anchors,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a layout never drops below three anchors
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_anchors(&self) -> usize {
        self.max_anchors
    }

    pub fn entries(&self) -> &[RangeMeasurement] {
        &self.entries
    }

    /// Current anchor and range for `id`
    pub fn get(&self, id: AnchorId) -> Option<&RangeMeasurement> {
        self.entries.iter().find(|e| e.anchor.id == id)
    }

    fn get_mut(&mut self, id: AnchorId) -> Result<&mut RangeMeasurement, LayoutError> {
        self.entries
            .iter_mut()
            .find(|e| e.anchor.id == id)
            .ok_or(LayoutError::UnknownAnchor(id))
    }

    /// Append an anchor and return its new id (one past the largest id in use)
    pub fn add_anchor(&mut self, position: Point2D, range: f64) -> Result<AnchorId, LayoutError> {
        if self.entries.len() >= self.max_anchors {
            return Err(LayoutError::TooManyAnchors {
                max: self.max_anchors,
            });
        }

        let next = self
            .entries
            .iter()
            .map(|e| e.anchor.id.0)
            .max()
            .map_or(1, |id| id + 1);
        let entry = RangeMeasurement::new(
            Anchor {
                id: AnchorId(next),
                position,
            },
            range,
        );
        validate_range(&entry)?;

        self.entries.push(entry);
        debug!("added anchor {} at {} (range {})", entry.anchor.id, position, range);
        Ok(entry.anchor.id)
    }

    /// Drop the most recently added anchor
    pub fn remove_last(&mut self) -> Result<RangeMeasurement, LayoutError> {
        if self.entries.len() <= RANGE_ANCHORS {
            return Err(LayoutError::TooFewAnchors { min: RANGE_ANCHORS });
        }
        let removed = self
            .entries
            .pop()
            .ok_or(LayoutError::TooFewAnchors { min: RANGE_ANCHORS })?;
        debug!("removed anchor {}", removed.anchor.id);
        Ok(removed)
    }

    /// Reposition an anchor, keeping its range
    pub fn move_anchor(&mut self, id: AnchorId, position: Point2D) -> Result<(), LayoutError> {
        validate_anchor(&Anchor { id, position })?;
        self.get_mut(id)?.anchor.position = position;
        Ok(())
    }

    /// Record a new range reading for an anchor
    pub fn set_range(&mut self, id: AnchorId, range: f64) -> Result<(), LayoutError> {
        let entry = self.get_mut(id)?;
        validate_range(&RangeMeasurement::new(entry.anchor, range))?;
        entry.range = range;
        Ok(())
    }

    /// Copy of every anchor and range, in layout order
    pub fn range_snapshot(&self) -> Vec<RangeMeasurement> {
        self.entries.clone()
    }

    /// The first three anchors, as used by the fixed three-anchor mode
    pub fn first_three(&self) -> [RangeMeasurement; 3] {
        [self.entries[0], self.entries[1], self.entries[2]]
    }

    /// Bearings observed from the first two anchors
    pub fn bearing_pair(&self, theta1_deg: f64, theta2_deg: f64) -> [BearingMeasurement; 2] {
        [
            BearingMeasurement::new(self.entries[0].anchor, theta1_deg),
            BearingMeasurement::new(self.entries[1].anchor, theta2_deg),
        ]
    }
}
