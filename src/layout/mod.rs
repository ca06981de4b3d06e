pub mod breakpoint;


pub use breakpoint::{chunk_listings, Breakpoint, BreakpointObserver};
