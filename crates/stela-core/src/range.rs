//! Spans between two points, directional like a selection.

use serde::{Deserialize, Serialize};

use crate::operation::Operation;
use crate::path::Affinity;
use crate::point::Point;

/// How a range's two endpoints lean when an operation splits exactly at one
/// of them.
///
/// [`Inward`](RangeAffinity::Inward) hugs the content between the endpoints
/// (a selection shrinks rather than swallowing a neighbour),
/// [`Outward`](RangeAffinity::Outward) hugs the content around them, and
/// [`Uniform`](RangeAffinity::Uniform) applies one [`Affinity`] to both
/// ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeAffinity {
    #[default]
    Inward,
    Outward,
    Uniform(Affinity),
}

/// A directional span: `anchor` is where the range started, `focus` where
/// it ends. Collapsed when the two are equal; nothing requires the anchor
/// to precede the focus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub anchor: Point,
    pub focus: Point,
}

impl Range {
    pub fn new(anchor: Point, focus: Point) -> Range {
        Range { anchor, focus }
    }

    /// A collapsed range sitting at one point.
    pub fn collapsed(at: Point) -> Range {
        Range { anchor: at.clone(), focus: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_backward(&self) -> bool {
        self.anchor.is_after(&self.focus)
    }

    pub fn is_forward(&self) -> bool {
        !self.is_backward()
    }

    /// The endpoints in document order: `(start, end)`.
    pub fn edges(&self) -> (&Point, &Point) {
        if self.is_backward() {
            (&self.focus, &self.anchor)
        } else {
            (&self.anchor, &self.focus)
        }
    }

    pub fn start(&self) -> &Point {
        self.edges().0
    }

    pub fn end(&self) -> &Point {
        self.edges().1
    }

    /// Rebases both endpoints through one operation.
    ///
    /// A collapsed range stays collapsed: the focus mirrors the rebased
    /// anchor instead of being rebased on its own, so boundary tie-breaks
    /// can never pull the two apart. Returns `None` when either endpoint's
    /// leaf was destroyed.
    pub fn transform(&self, op: &Operation, affinity: RangeAffinity) -> Option<Range> {
        let (anchor_affinity, focus_affinity) = match affinity {
            RangeAffinity::Inward => {
                if self.is_forward() {
                    (Affinity::Forward, Affinity::Backward)
                } else {
                    (Affinity::Backward, Affinity::Forward)
                }
            }
            RangeAffinity::Outward => {
                if self.is_forward() {
                    (Affinity::Backward, Affinity::Forward)
                } else {
                    (Affinity::Forward, Affinity::Backward)
                }
            }
            RangeAffinity::Uniform(affinity) => (affinity, affinity),
        };
        let anchor = self.anchor.transform(op, anchor_affinity)?;
        let focus = if self.is_collapsed() {
            anchor.clone()
        } else {
            self.focus.transform(op, focus_affinity)?
        };
        Some(Range { anchor, focus })
    }
}
