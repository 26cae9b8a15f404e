//! # Voxel Planet Entry Point
//!
//! This is the main entry point for the native application. It simply calls into the
//! library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! VOXEL_PLANET_CONFIG=planet.json RUST_LOG=info cargo run --release
//! ```

fn main() {
    voxel_planet::run();
}
