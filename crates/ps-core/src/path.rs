//! Reference paths shared by the route planner, the maneuver library and the
//! path-tracking controller.

use crate::geom::{Point2, Pose};
use crate::{CoreError, CoreResult};

/// An ordered sequence of waypoints with the heading at each waypoint.
///
/// `points` and `headings` are parallel arrays of equal length.  Consumers
/// treat the path as read-only; any index into it is a plain `usize`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferencePath {
    points:   Vec<Point2>,
    headings: Vec<f64>,
}

impl ReferencePath {
    /// Build a path from parallel point and heading arrays.
    pub fn new(points: Vec<Point2>, headings: Vec<f64>) -> CoreResult<Self> {
        if points.len() != headings.len() {
            return Err(CoreError::Config(format!(
                "path has {} points but {} headings",
                points.len(),
                headings.len()
            )));
        }
        Ok(Self { points, headings })
    }

    /// Build a path from poses.
    pub fn from_poses(poses: &[Pose]) -> Self {
        Self {
            points:   poses.iter().map(|p| p.position).collect(),
            headings: poses.iter().map(|p| p.heading).collect(),
        }
    }

    /// Build a path from bare points; each heading is the direction of the
    /// segment leaving that point (the last point repeats the final segment).
    ///
    /// Consecutive duplicate points are dropped.
    pub fn from_points(points: &[Point2]) -> Self {
        let mut pts: Vec<Point2> = Vec::with_capacity(points.len());
        for &p in points {
            if pts.last().is_none_or(|&last| last.distance(p) > f64::EPSILON) {
                pts.push(p);
            }
        }
        let headings = segment_headings(&pts);
        Self { points: pts, headings }
    }

    /// Resample `points` so consecutive waypoints are at most `spacing` apart.
    ///
    /// Every input point is kept; intermediate points are inserted along each
    /// segment and inherit that segment's heading.
    pub fn densified(points: &[Point2], spacing: f64) -> Self {
        let coarse = Self::from_points(points);
        if coarse.len() < 2 || spacing <= 0.0 {
            return coarse;
        }

        let mut out_pts = Vec::new();
        let mut out_hdg = Vec::new();
        for i in 0..coarse.len() - 1 {
            let a = coarse.points[i];
            let b = coarse.points[i + 1];
            let heading = coarse.headings[i];
            let steps = (a.distance(b) / spacing).ceil().max(1.0) as usize;
            for s in 0..steps {
                let t = s as f64 / steps as f64;
                out_pts.push(a + (b - a) * t);
                out_hdg.push(heading);
            }
        }
        out_pts.push(coarse.points[coarse.len() - 1]);
        out_hdg.push(coarse.headings[coarse.len() - 1]);

        Self { points: out_pts, headings: out_hdg }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[inline]
    pub fn headings(&self) -> &[f64] {
        &self.headings
    }

    #[inline]
    pub fn point(&self, i: usize) -> Point2 {
        self.points[i]
    }

    #[inline]
    pub fn heading(&self, i: usize) -> f64 {
        self.headings[i]
    }

    /// Pose at waypoint `i`.
    #[inline]
    pub fn pose(&self, i: usize) -> Pose {
        Pose::new(self.points[i], self.headings[i])
    }

    pub fn first_pose(&self) -> Option<Pose> {
        (!self.is_empty()).then(|| self.pose(0))
    }

    pub fn last_pose(&self) -> Option<Pose> {
        self.len().checked_sub(1).map(|i| self.pose(i))
    }

    /// Index of the final waypoint (0 for an empty path).
    #[inline]
    pub fn last_index(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Arc length from waypoint `from` to the end of the path.
    pub fn remaining_length(&self, from: usize) -> f64 {
        if from >= self.len() {
            return 0.0;
        }
        self.points[from..]
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }

    /// Total arc length.
    pub fn length(&self) -> f64 {
        self.remaining_length(0)
    }

    /// Waypoints from `from` onward whose cumulative arc length stays within
    /// `distance`.  Always contains waypoint `from` when it exists.
    pub fn lookahead(&self, from: usize, distance: f64) -> Vec<Point2> {
        let mut out = Vec::new();
        let Some(&start) = self.points.get(from) else {
            return out;
        };
        out.push(start);
        let mut travelled = 0.0;
        for w in self.points[from..].windows(2) {
            travelled += w[0].distance(w[1]);
            if travelled > distance {
                break;
            }
            out.push(w[1]);
        }
        out
    }
}

/// Heading of the segment leaving each point; the last point repeats the
/// final segment's heading.  A single point gets heading 0.
fn segment_headings(points: &[Point2]) -> Vec<f64> {
    match points.len() {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let mut headings: Vec<f64> = points.windows(2).map(|w| (w[1] - w[0]).heading()).collect();
            headings.push(headings[n - 2]);
            headings
        }
    }
}
