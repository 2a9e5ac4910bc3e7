//! talus3d-core: a 3D rigid-body physics engine — GJK/EPA collision
//! detection, an impulse-based contact and joint solver, a BVH broad-phase
//! over static geometry, and a semi-implicit Euler integrator.

pub mod physics;
