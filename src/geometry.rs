//! Planar geometry backing the occlusion queries: a small world vector type,
//! axis aligned bounds with a slab test, and the obstacle [Shape]s together with
//! their segment contact and capsule overlap tests.
use itertools::Itertools;
use smallvec::{smallvec, SmallVec};
use std::ops::{Add, Mul, Neg, Sub};

/// Below this magnitude a cross product is treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-9;

/// World position or direction in the plane.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }
    #[inline]
    pub fn dot(&self, other: &Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }
    /// Z component of the 3D cross product.
    #[inline]
    pub fn cross(&self, other: &Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }
    #[inline]
    pub fn distance(&self, other: &Vec2) -> f32 {
        (*self - *other).length()
    }
    /// Unit vector in the same direction, or the vector itself if it has zero length.
    pub fn normalize(&self) -> Vec2 {
        let len = self.length();
        if len > 0.0 {
            Vec2::new(self.x / len, self.y / len)
        } else {
            *self
        }
    }
    /// Left-hand normal (rotated a quarter turn counter-clockwise).
    #[inline]
    pub fn perp(&self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }
    #[inline]
    pub fn lerp(&self, other: &Vec2, t: f32) -> Vec2 {
        *self + (*other - *self) * t
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, scalar: f32) -> Vec2 {
        Vec2::new(self.x * scalar, self.y * scalar)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Axis aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Creates a box spanning the two corners in any order.
    pub fn new(a: Vec2, b: Vec2) -> Aabb {
        Aabb {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }
    pub fn from_center_extents(center: Vec2, extents: Vec2) -> Aabb {
        Aabb::new(center - extents, center + extents)
    }
    /// Smallest box holding every point, [None] for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vec2>>(points: I) -> Option<Aabb> {
        points.into_iter().fold(None, |acc, p| match acc {
            None => Some(Aabb { min: p, max: p }),
            Some(b) => Some(Aabb {
                min: Vec2::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                max: Vec2::new(b.max.x.max(p.x), b.max.y.max(p.y)),
            }),
        })
    }
    pub fn center(&self) -> Vec2 {
        self.min.lerp(&self.max, 0.5)
    }
    pub fn extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }
    /// Grows the box by `margin` on every side.
    pub fn expand(&self, margin: f32) -> Aabb {
        let m = Vec2::new(margin, margin);
        Aabb {
            min: self.min - m,
            max: self.max + m,
        }
    }
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
    fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
    /// Slab test of the segment `a -> b` against the box. Returns the fraction of the
    /// segment at which it enters the box, `0.0` when `a` already lies inside.
    pub fn segment_entry(&self, a: Vec2, b: Vec2) -> Option<f32> {
        let d = b - a;
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;
        for (origin, delta, lo, hi) in [
            (a.x, d.x, self.min.x, self.max.x),
            (a.y, d.y, self.min.y, self.max.y),
        ] {
            if delta.abs() < PARALLEL_EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
            } else {
                let inv = 1.0 / delta;
                let t1 = (lo - origin) * inv;
                let t2 = (hi - origin) * inv;
                t_min = t_min.max(t1.min(t2));
                t_max = t_max.min(t1.max(t2));
                if t_min > t_max {
                    return None;
                }
            }
        }
        Some(t_min)
    }
}

/// Distance from `p` to the closed segment `a -> b`.
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < PARALLEL_EPSILON {
        return p.distance(&a);
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    p.distance(&a.lerp(&b, t))
}

/// Fraction along `a -> b` at which it first touches the segment `c -> d`.
/// Collinear overlapping segments report the first shared point.
pub fn segment_intersection(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Option<f32> {
    let r = b - a;
    let s = d - c;
    let len_sq = r.length_squared();
    if len_sq < PARALLEL_EPSILON {
        return None;
    }
    let denom = r.cross(&s);
    let ac = c - a;
    if denom.abs() < PARALLEL_EPSILON {
        if ac.cross(&r).abs() > PARALLEL_EPSILON * len_sq.sqrt().max(1.0) {
            return None;
        }
        // Collinear: project both ends of c -> d onto a -> b and clip to [0, 1].
        let t0 = ac.dot(&r) / len_sq;
        let t1 = (d - a).dot(&r) / len_sq;
        let (lo, hi) = (t0.min(t1), t0.max(t1));
        if hi < 0.0 || lo > 1.0 {
            return None;
        }
        return Some(lo.max(0.0));
    }
    let t = ac.cross(&s) / denom;
    let u = ac.cross(&r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(t)
    } else {
        None
    }
}

/// Shortest distance between the closed segments `a -> b` and `c -> d`.
pub fn segment_segment_distance(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> f32 {
    if segment_intersection(a, b, c, d).is_some() || segment_intersection(c, d, a, b).is_some() {
        return 0.0;
    }
    point_segment_distance(a, c, d)
        .min(point_segment_distance(b, c, d))
        .min(point_segment_distance(c, a, b))
        .min(point_segment_distance(d, a, b))
}

/// Ray-casting point-in-polygon test.
fn point_in_polygon(p: Vec2, vertices: &[Vec2]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    for (vi, vj) in vertices.iter().circular_tuple_windows() {
        if (vi.y > p.y) != (vj.y > p.y) {
            let intersect_x = (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x;
            if p.x < intersect_x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Blocking geometry of a single obstacle.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Rect(Aabb),
    /// Zero-thickness wall.
    Segment { start: Vec2, end: Vec2 },
    /// Simple polygon, vertices in either winding order.
    Polygon(Vec<Vec2>),
}

impl Shape {
    pub fn circle(center: Vec2, radius: f32) -> Shape {
        Shape::Circle {
            center,
            radius: radius.abs(),
        }
    }
    pub fn rect(a: Vec2, b: Vec2) -> Shape {
        Shape::Rect(Aabb::new(a, b))
    }
    pub fn segment(start: Vec2, end: Vec2) -> Shape {
        Shape::Segment { start, end }
    }
    pub fn polygon(vertices: Vec<Vec2>) -> Shape {
        Shape::Polygon(vertices)
    }

    pub fn bounds(&self) -> Aabb {
        match self {
            Shape::Circle { center, radius } => {
                Aabb::from_center_extents(*center, Vec2::new(*radius, *radius))
            }
            Shape::Rect(aabb) => *aabb,
            Shape::Segment { start, end } => Aabb::new(*start, *end),
            Shape::Polygon(vertices) => Aabb::from_points(vertices.iter().copied())
                .unwrap_or(Aabb {
                    min: Vec2::ZERO,
                    max: Vec2::ZERO,
                }),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        match self {
            Shape::Circle { center, radius } => p.distance(center) <= *radius,
            Shape::Rect(aabb) => aabb.contains(p),
            Shape::Segment { start, end } => point_segment_distance(p, *start, *end) <= 0.0,
            Shape::Polygon(vertices) => point_in_polygon(p, vertices),
        }
    }

    fn edges(&self) -> SmallVec<[(Vec2, Vec2); 4]> {
        match self {
            Shape::Circle { .. } => SmallVec::new(),
            Shape::Rect(aabb) => aabb.corners().into_iter().circular_tuple_windows().collect(),
            Shape::Segment { start, end } => smallvec![(*start, *end)],
            Shape::Polygon(vertices) => vertices.iter().copied().circular_tuple_windows().collect(),
        }
    }

    /// Fraction along `a -> b` of the first contact with the shape, `0.0` when `a` is inside.
    pub fn segment_contact(&self, a: Vec2, b: Vec2) -> Option<f32> {
        if self.contains(a) {
            return Some(0.0);
        }
        match self {
            Shape::Circle { center, radius } => {
                let d = b - a;
                let f = a - *center;
                let qa = d.length_squared();
                if qa < PARALLEL_EPSILON {
                    return None;
                }
                let qb = 2.0 * f.dot(&d);
                let qc = f.length_squared() - radius * radius;
                let disc = qb * qb - 4.0 * qa * qc;
                if disc < 0.0 {
                    return None;
                }
                let t = (-qb - disc.sqrt()) / (2.0 * qa);
                (0.0..=1.0).contains(&t).then_some(t)
            }
            Shape::Rect(aabb) => aabb.segment_entry(a, b),
            _ => self
                .edges()
                .into_iter()
                .filter_map(|(c, d)| segment_intersection(a, b, c, d))
                .min_by(|x, y| x.total_cmp(y)),
        }
    }

    /// Whether a capsule of the given radius around the segment `a -> b` overlaps the shape.
    pub fn capsule_overlaps(&self, a: Vec2, b: Vec2, radius: f32) -> bool {
        match self {
            Shape::Circle {
                center,
                radius: own,
            } => point_segment_distance(*center, a, b) <= radius + own,
            _ => {
                self.segment_contact(a, b).is_some()
                    || self
                        .edges()
                        .into_iter()
                        .any(|(c, d)| segment_segment_distance(a, b, c, d) <= radius)
            }
        }
    }
}
