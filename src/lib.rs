pub mod error;
pub mod model;
pub mod draw;
pub mod backend;
pub mod sky;
pub mod view;
pub mod geometry {
    pub mod sky_sphere;
}
pub mod opengl {
    pub mod gl;
    pub mod program;
    pub mod buffer;
    pub mod vertex;
    pub mod uniform;
    pub mod texture;
    pub mod backend;
}
