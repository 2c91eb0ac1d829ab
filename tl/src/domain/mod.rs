//! Domain types for the traffic light

mod phase;

pub use phase::Phase;
