// handlers/mod.rs - two handler tiers
//
// Public (no auth): service info and health
// Protected (bearer JWT): /api/*
pub mod protected;
pub mod public;
