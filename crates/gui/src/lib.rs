// Library crate: the generation pipeline, artifact lifetime and face picking,
// headless and testable. The egui shell (app, ui, viewport painting) stays
// in the binary crate.

pub mod artifact;
pub mod driver;
pub mod fixtures;
pub mod harness;
pub mod intent;
pub mod orchestrator;
pub mod state;
pub mod worker;

/// Viewport geometry shared with the binary: camera, meshes, picking, snapping.
/// Painting stays in the binary crate.
pub mod viewport {
    pub mod camera;
    pub mod mesh;
    pub mod picking;
    pub mod snap;
}
