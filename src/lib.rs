pub mod config;
pub mod error;
pub mod events;
pub mod navigator;
pub mod render;
pub mod scan;
pub mod surface;
pub mod view;
pub mod tasks {
    pub mod autoplay;
    pub mod controller;
    pub mod input;
}

pub use error::Error;
