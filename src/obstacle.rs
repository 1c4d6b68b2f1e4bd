use crate::geometry::{Aabb, Shape};
use core::fmt;

/// Category an obstacle is classified under, resolved once when the obstacle is placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObstacleCategory {
    Wall,
    Prop,
    Water,
    Boundary,
}

impl ObstacleCategory {
    pub const ALL: [ObstacleCategory; 4] = [
        ObstacleCategory::Wall,
        ObstacleCategory::Prop,
        ObstacleCategory::Water,
        ObstacleCategory::Boundary,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of [ObstacleCategory] values that count as blocking for a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObstacleFilter(u8);

impl ObstacleFilter {
    pub const NONE: ObstacleFilter = ObstacleFilter(0);
    pub const ALL: ObstacleFilter = ObstacleFilter(0b1111);

    pub fn only(category: ObstacleCategory) -> ObstacleFilter {
        ObstacleFilter(category.bit())
    }
    pub fn with(self, category: ObstacleCategory) -> ObstacleFilter {
        ObstacleFilter(self.0 | category.bit())
    }
    pub fn without(self, category: ObstacleCategory) -> ObstacleFilter {
        ObstacleFilter(self.0 & !category.bit())
    }
    pub fn matches(&self, category: ObstacleCategory) -> bool {
        self.0 & category.bit() != 0
    }
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ObstacleFilter {
    fn default() -> ObstacleFilter {
        ObstacleFilter::only(ObstacleCategory::Wall)
    }
}

impl FromIterator<ObstacleCategory> for ObstacleFilter {
    fn from_iter<I: IntoIterator<Item = ObstacleCategory>>(iter: I) -> ObstacleFilter {
        iter.into_iter().fold(ObstacleFilter::NONE, ObstacleFilter::with)
    }
}

impl fmt::Display for ObstacleFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names = ObstacleCategory::ALL
            .iter()
            .filter(|c| self.matches(**c))
            .map(|c| format!("{:?}", c))
            .collect::<Vec<_>>();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Static blocking geometry with its bounds cached at placement.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub category: ObstacleCategory,
    shape: Shape,
    bounds: Aabb,
}

impl Obstacle {
    pub fn new(category: ObstacleCategory, shape: Shape) -> Obstacle {
        let bounds = shape.bounds();
        Obstacle {
            category,
            shape,
            bounds,
        }
    }
    pub fn wall(shape: Shape) -> Obstacle {
        Obstacle::new(ObstacleCategory::Wall, shape)
    }
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }
}

/// The static environment a graph is built against.
#[derive(Clone, Debug, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> ObstacleField {
        ObstacleField::default()
    }
    pub fn insert(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }
    pub fn clear(&mut self) {
        self.obstacles.clear();
    }
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
    /// Obstacles whose category the filter selects.
    pub fn matching(&self, filter: ObstacleFilter) -> impl Iterator<Item = &Obstacle> + '_ {
        self.obstacles
            .iter()
            .filter(move |o| filter.matches(o.category))
    }
}

impl FromIterator<Obstacle> for ObstacleField {
    fn from_iter<I: IntoIterator<Item = Obstacle>>(iter: I) -> ObstacleField {
        ObstacleField {
            obstacles: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;

    #[test]
    fn filter_set_operations() {
        let f = ObstacleFilter::only(ObstacleCategory::Wall).with(ObstacleCategory::Water);
        assert!(f.matches(ObstacleCategory::Wall));
        assert!(f.matches(ObstacleCategory::Water));
        assert!(!f.matches(ObstacleCategory::Prop));
        assert!(f.without(ObstacleCategory::Wall).matches(ObstacleCategory::Water));
        assert!(ObstacleFilter::NONE.is_empty());
        assert_eq!(
            ObstacleCategory::ALL.into_iter().collect::<ObstacleFilter>(),
            ObstacleFilter::ALL
        );
        assert_eq!(format!("{}", f), "[Wall, Water]");
    }

    #[test]
    fn field_matches_by_category() {
        let field: ObstacleField = [
            Obstacle::wall(Shape::circle(Vec2::ZERO, 1.0)),
            Obstacle::new(ObstacleCategory::Prop, Shape::circle(Vec2::ZERO, 1.0)),
            Obstacle::wall(Shape::rect(Vec2::ZERO, Vec2::new(1.0, 1.0))),
        ]
        .into_iter()
        .collect();
        assert_eq!(field.matching(ObstacleFilter::default()).count(), 2);
        assert_eq!(field.matching(ObstacleFilter::ALL).count(), 3);
        assert_eq!(field.matching(ObstacleFilter::NONE).count(), 0);
    }
}
