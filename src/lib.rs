#![warn(clippy::all, rust_2018_idioms)]
//! Sylva: a turn-based creature-keeping RPG.
//!
//! The simulation core (`world`, `ecs`, `creatures`, `battle`, `progression`,
//! `items`, `quests`, `needs`, `game`) is deterministic and knows nothing
//! about drawing. It exposes a plain-data [`render::RenderModel`]; the `ui`
//! and `app` modules turn that into an egui frame.

pub mod battle;
pub mod config;
pub mod creatures;
pub mod ecs;
pub mod error;
pub mod game;
pub mod input;
pub mod items;
pub mod needs;
pub mod progression;
pub mod quests;
pub mod render;
pub mod ui;
pub mod world;

mod app;
pub use app::SylvaApp;
