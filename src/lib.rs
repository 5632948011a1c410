// Library target backs the binary, the integration tests and the criterion
// benchmarks. main.rs only owns terminal setup and rendering.
pub mod app;
pub mod config;
pub mod event;
pub mod session;
pub mod ui;
