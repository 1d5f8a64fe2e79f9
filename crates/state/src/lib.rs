pub mod calendar;
pub mod catalog;
pub mod compositor;
pub mod config;
pub mod easing;
pub mod engine;
pub mod entry;
pub mod error;
pub mod gesture;
pub mod hold;
pub mod launch;
pub mod scroll;
pub mod selection;
pub mod strip;
pub mod temporal;
pub mod timer;

pub use engine::{CarouselEngine, EngineEvent};
pub use error::{Error, Result};
