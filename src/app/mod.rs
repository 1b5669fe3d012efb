// Application layer: session state and the file loading pipeline built on the core.

pub mod loader;
pub mod session;
