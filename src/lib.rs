//! Cookbook: an in-memory registry of ingredients and recipes.
//!
//! Recipes nest other entries with quantities; a summary flattens a recipe
//! into its total cook time and the base ingredients it ultimately needs.

pub mod cli;
pub mod core;
#[cfg(feature = "server")]
pub mod server;
