use crate::geometry::Vec2;
use core::fmt;

/// Stable identity of an author-placed waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaypointId(pub u32);

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named point usable as a graph node. The engine only reads waypoints.
#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub id: WaypointId,
    pub name: String,
    pub position: Vec2,
}

impl Waypoint {
    pub fn new(id: u32, name: impl Into<String>, position: Vec2) -> Waypoint {
        Waypoint {
            id: WaypointId(id),
            name: name.into(),
            position,
        }
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "'{}' {} at ({:.2}, {:.2})",
            self.name, self.id, self.position.x, self.position.y
        )
    }
}
