pub mod capture;
pub mod level;

pub use capture::{CaptureError, MicCapture};
