//! # Armature Skin
//!
//! Turns a bone skeleton into sculptable surface geometry.
//! Two representations are produced from the same bones:
//!
//! - **Skin graph**: one vertex per joint, one edge per bone, a radius per
//!   vertex. The host inflates it with a skin stage.
//! - **Envelope mesh**: a sphere at every distinct endpoint and a cone along
//!   every bone, welded into one mesh.
//!
//! ## Architecture
//!
//! ```text
//! Skeleton → skin_graph / envelope (primitives + dedup) → convert → Host
//! ```
//!
//! The `convert` coordinator builds geometry first and only then touches the
//! host, so a failing conversion never leaves partial scene state.
//!
//! ## Usage
//!
//! ```rust
//! use armature_skin::{build_envelope, build_skin_graph, Bone, Skeleton};
//! use glam::DVec3;
//!
//! let skeleton = Skeleton::new("Armature", DVec3::ZERO)
//!     .with_bone(Bone::new("spine", DVec3::ZERO, DVec3::Z))
//!     .with_bone(Bone::new("neck", DVec3::Z, DVec3::new(0.0, 0.0, 1.5)));
//!
//! let graph = build_skin_graph(&skeleton).unwrap();
//! assert_eq!(graph.vertex_count(), 3);
//!
//! let envelope = build_envelope(&skeleton, 0.001).unwrap();
//! assert!(envelope.mesh.validate());
//! ```

pub mod convert;
pub mod dedup;
pub mod envelope;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod primitives;
pub mod skeleton;
pub mod skin_graph;

pub use convert::{
    convert, ConversionMode, ConversionState, DerivedMesh, MemoryHost, MeshHandle, Stage,
};
pub use envelope::{build_envelope, EnvelopeMesh};
pub use error::{ConvertError, ConvertResult};
pub use mesh::Mesh;
pub use skeleton::{Bone, Endpoint, Skeleton};
pub use skin_graph::{build_skin_graph, build_skin_graph_with, SkinGraph};
