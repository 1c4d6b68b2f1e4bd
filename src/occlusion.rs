//! Straight-line traversability between two world positions.
//!
//! [SweptOccluder] answers the query in three layers and the first one that reports a
//! hit decides the outcome:
//! 1. a capsule of radius [OcclusionConfig::probe_radius] swept along the segment after
//!    shrinking it by [OcclusionConfig::clearance_offset] at both ends,
//! 2. a fan of thin probes parallel to the raw segment, spread across the capsule width,
//! 3. the cached bounds of every selected obstacle (grown by the probe radius) tested
//!    against the raw segment, confirmed by an exact contact test on that obstacle.
use crate::geometry::Vec2;
use crate::obstacle::{Obstacle, ObstacleField, ObstacleFilter};
use log::trace;

/// Answers whether the straight segment between two points is unobstructed.
pub trait Occluder {
    fn is_clear(&self, from: Vec2, to: Vec2, filter: ObstacleFilter) -> bool;

    /// Number of obstacles selected by the filter, when the occluder knows it.
    fn blocking_count(&self, _filter: ObstacleFilter) -> Option<usize> {
        None
    }
}

impl<F> Occluder for F
where
    F: Fn(Vec2, Vec2, ObstacleFilter) -> bool,
{
    fn is_clear(&self, from: Vec2, to: Vec2, filter: ObstacleFilter) -> bool {
        self(from, to, filter)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OcclusionConfig {
    /// Radius of the swept capsule and half width of the probe fan.
    pub probe_radius: f32,
    /// Distance trimmed from both ends of the segment before the capsule sweep.
    pub clearance_offset: f32,
    /// Number of parallel probes; zero disables the probe layer.
    pub probe_count: usize,
    /// Points closer than this are a degenerate query and never clear.
    pub min_distance: f32,
}

impl Default for OcclusionConfig {
    fn default() -> OcclusionConfig {
        OcclusionConfig {
            probe_radius: 0.3,
            clearance_offset: 0.5,
            probe_count: 5,
            min_distance: 0.1,
        }
    }
}

/// Layer of [SweptOccluder] that found an obstruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OcclusionLayer {
    Sweep,
    Probe,
    Bounds,
}

/// Outcome of [SweptOccluder::trace].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Clear,
    /// The endpoints coincide.
    Degenerate,
    Blocked(OcclusionLayer),
}

impl Visibility {
    pub fn is_clear(&self) -> bool {
        matches!(self, Visibility::Clear)
    }
}

/// [Occluder] over a static [ObstacleField].
#[derive(Clone, Debug, Default)]
pub struct SweptOccluder {
    pub config: OcclusionConfig,
    field: ObstacleField,
}

impl SweptOccluder {
    pub fn new(field: ObstacleField) -> SweptOccluder {
        SweptOccluder {
            config: OcclusionConfig::default(),
            field,
        }
    }
    pub fn with_config(field: ObstacleField, config: OcclusionConfig) -> SweptOccluder {
        SweptOccluder { config, field }
    }
    pub fn field(&self) -> &ObstacleField {
        &self.field
    }
    /// Mutable access to the obstacles. Graphs built before the change are not updated.
    pub fn field_mut(&mut self) -> &mut ObstacleField {
        &mut self.field
    }

    /// Runs the layered test and reports which layer, if any, blocked the segment.
    pub fn trace(&self, from: Vec2, to: Vec2, filter: ObstacleFilter) -> Visibility {
        // Both directions of a pair run the exact same arithmetic.
        let (from, to) = if to.x.total_cmp(&from.x).then(to.y.total_cmp(&from.y)).is_lt() {
            (to, from)
        } else {
            (from, to)
        };
        let delta = to - from;
        let distance = delta.length();
        if distance < self.config.min_distance {
            return Visibility::Degenerate;
        }
        let direction = delta * (1.0 / distance);
        let radius = self.config.probe_radius;

        let clearance = self.config.clearance_offset;
        if distance - 2.0 * clearance <= 0.0 {
            return Visibility::Clear;
        }
        let sweep_from = from + direction * clearance;
        let sweep_to = to - direction * clearance;
        if self
            .field
            .matching(filter)
            .any(|o| Self::capsule_hits(o, sweep_from, sweep_to, radius))
        {
            trace!("Sweep from {:?} to {:?} blocked", from, to);
            return Visibility::Blocked(OcclusionLayer::Sweep);
        }

        let normal = direction.perp();
        let n = self.config.probe_count;
        for i in 0..n {
            let offset = if n > 1 {
                (i as f32 / (n - 1) as f32 - 0.5) * radius * 2.0
            } else {
                0.0
            };
            let shift = normal * offset;
            let (p, q) = (from + shift, to + shift);
            if self
                .field
                .matching(filter)
                .any(|o| o.shape().segment_contact(p, q).is_some())
            {
                trace!("Probe {} from {:?} to {:?} blocked", i, p, q);
                return Visibility::Blocked(OcclusionLayer::Probe);
            }
        }

        for obstacle in self.field.matching(filter) {
            if obstacle
                .bounds()
                .expand(radius)
                .segment_entry(from, to)
                .is_some()
                && obstacle.shape().segment_contact(from, to).is_some()
            {
                trace!("Bounds check from {:?} to {:?} blocked", from, to);
                return Visibility::Blocked(OcclusionLayer::Bounds);
            }
        }
        Visibility::Clear
    }

    fn capsule_hits(obstacle: &Obstacle, a: Vec2, b: Vec2, radius: f32) -> bool {
        obstacle
            .bounds()
            .expand(radius)
            .segment_entry(a, b)
            .is_some()
            && obstacle.shape().capsule_overlaps(a, b, radius)
    }
}

impl Occluder for SweptOccluder {
    fn is_clear(&self, from: Vec2, to: Vec2, filter: ObstacleFilter) -> bool {
        self.trace(from, to, filter).is_clear()
    }
    fn blocking_count(&self, filter: ObstacleFilter) -> Option<usize> {
        Some(self.field.matching(filter).count())
    }
}
