pub mod assets;
pub mod camera;
pub mod grid;
pub mod scene;
