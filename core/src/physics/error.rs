//! Construction-time error taxonomy for the physics core.
//!
//! Runtime numerical fallbacks (degenerate GJK/EPA directions, joint axes that
//! become degenerate mid-simulation, EPA non-convergence) are not part of this
//! enum: the solver handles them locally and never halts a step. Only the
//! failures that should stop a caller from building a malformed world or
//! joint surface here.

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PhysicsError {
    #[error("body definition has no shape")]
    InvalidShape,

    #[error("joint reference axis has zero length")]
    DegenerateJointAxis,

    #[error("polyhedron shape has no vertices")]
    EmptyPolyhedron,

    #[error("polyhedron face index {0} out of bounds for {1} vertices")]
    FaceIndexOutOfBounds(u32, usize),

    #[error("failed to parse mesh: {0}")]
    MeshParse(String),
}
