//! Orchestrator phases: filesystem steps of the bootstrap pipeline.
//!
//! - **prep**: toolchain source directory precondition
//! - **stage**: configuration file staging
//!
//! Process-driven steps (probe, build, link) live in `system::health` and
//! `orchestrator::executor`.

pub mod prep;
pub mod stage;

pub use prep::verify_toolchain_source;
pub use stage::stage_config;
