//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Fixed sub-steps only
//! - Seeded RNG only
//! - Stable iteration order (slot order, ordered contact sets)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod entity;
pub mod ground;
pub mod physics;
pub mod score;
pub mod state;
pub mod tick;

pub use camera::{Camera, WorldBounds};
pub use collision::{Aabb, CollisionResult};
pub use entity::{
    EntityKind, Facing, GameObject, GroundSegment, ObjectManager, Player, PlayerMotion,
    select_motion,
};
pub use ground::{GroundGenerator, Row, RowSegment};
pub use physics::{Body, BodyHandle, Category, ContactEvent, PhysicsEngine, Shape};
pub use score::ScoreTracker;
pub use state::World;
pub use tick::{TickInput, TickOutcome, tick};
