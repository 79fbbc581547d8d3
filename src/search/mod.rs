//! Search procedures for the Positive Influence Dominating Set problem.

/// randomized (roulette) greedy construction and repair
pub mod greedy_roulette;

/// variable fixing (local branching neighborhoods) and vertex ages
pub mod fixing;

/// MIP-based intensification
pub mod intensification;

/// destroy and repair diversification
pub mod diversification;

/// local branching main loop
pub mod local_branching;

/// one-shot MIP resolution of the whole instance
pub mod exact;
