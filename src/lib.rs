//! Thin relay between the scouting form and the player-eligibility model.
//!
//! The relay normalizes whatever the form submitted into a fixed feature
//! record, forwards it to the external prediction service, and reshapes the
//! verdict (with rule-based explanations for a negative one) for the page.

pub mod features;
pub mod predict_fetch;
pub mod reasons;
pub mod server;
