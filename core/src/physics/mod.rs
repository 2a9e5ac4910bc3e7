//! 3D rigid-body physics: shapes, collision detection, the contact/joint
//! solver, broad-phase acceleration and the integrator that ties them
//! together into a stepped `PhysicsWorld`.

pub mod aabb;
pub mod body;
pub mod bvh;
pub mod epa;
pub mod error;
pub mod gjk;
pub mod integrate;
pub mod joints;
pub mod narrowphase;
pub mod resolve;
pub mod shapes;
pub mod sleep;
pub mod world;

pub use aabb::{Aabb, Ray};
pub use body::{Body, BodyDef, BodyType, ShapeHandle};
pub use epa::ContactInfo;
pub use error::PhysicsError;
pub use joints::Joint;
pub use shapes::{MassProperties, Shape};
pub use world::{BodyHandle, PhysicsWorld, WorldDef};
