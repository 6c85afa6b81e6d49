//! Foundation utilities: math types, logging, and timing
//!
//! These modules have no dependency on the scene or raster layers and can be
//! used standalone.

pub mod logging;
pub mod math;
pub mod time;
