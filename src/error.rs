// A tiny error type so we don't rely on anyhow/thiserror.
// Every variant states *where* things went wrong.
//
// Capture and comparison never fail (bad input becomes data); only the
// edges that touch the outside world use this.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    WindowInit(String),    // Creating the demo window failed
    WindowUpdate(String),  // Pushing a frame to the demo window failed
    InvalidBuffer(String), // Raw RGBA bytes don't match width × height × 4
    ImageExport(String),   // Writing a stamp PNG failed
    ReportExport(String),  // Writing the JSON comparison report failed
}

impl Display for Error {
    // This decides how the error is printed to your console.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::InvalidBuffer(s) => write!(f, "Invalid raster buffer: {s}"),
            Error::ImageExport(s) => write!(f, "Image export error: {s}"),
            Error::ReportExport(s) => write!(f, "Report export error: {s}"),
        }
    }
}

impl std::error::Error for Error {}
