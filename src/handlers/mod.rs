// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token, role checked per operation)

pub mod protected;
pub mod public;
