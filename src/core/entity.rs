//! Entity identification and placement.
//!
//! Every host that can own effects (card, tower, enemy) has a unique
//! `EntityId`. The effect engine never dereferences an id itself; it hands
//! ids to the [`GameWorld`](crate::effects::GameWorld) collaborator.
//!
//! ## Usage
//!
//! ```
//! use rust_td::core::{EntityId, Position};
//!
//! let tower = EntityId::new(7);
//! assert_eq!(tower.raw(), 7);
//!
//! let a = Position::new(0.0, 0.0);
//! let b = Position::new(3.0, 4.0);
//! assert_eq!(a.distance(b), 5.0);
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for any game entity.
///
/// Towers, enemies and card instances all have EntityIds. Ids are
/// allocated by the world that owns the entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create a new entity ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// A point on the play field, in tile units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether `other` lies within `radius` of this position (inclusive).
    #[must_use]
    pub fn within(self, other: Position, radius: f32) -> bool {
        self.distance(other) <= radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_raw() {
        assert_eq!(EntityId::new(5).raw(), 5);
        assert_eq!(EntityId::from(9), EntityId(9));
    }

    #[test]
    fn test_entity_ordering() {
        assert!(EntityId(1) < EntityId(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", EntityId(42)), "Entity(42)");
    }

    #[test]
    fn test_distance() {
        let origin = Position::default();
        assert_eq!(origin.distance(Position::new(3.0, 4.0)), 5.0);
        assert!(origin.within(Position::new(1.0, 0.0), 1.0));
        assert!(!origin.within(Position::new(1.0, 0.1), 1.0));
    }

    #[test]
    fn test_serialization() {
        let id = EntityId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
