/// Cooperative frame pacing.
pub mod clock;
/// Route rasterization (dashed curve + marker glow).
pub mod path;
/// The per-frame loop and its stop semantics.
pub mod scheduler;
/// The CPU pixel surface bound to the viewport.
pub mod surface;
