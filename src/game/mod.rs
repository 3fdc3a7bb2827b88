//! Game flow: the shared state, the scenes that act on it, and the
//! [`Engine`] that decides which scene is active.
//!
//! Nothing in here draws. Scenes expose a [`RenderModel`](crate::render::RenderModel)
//! and the presentation layer pulls it once per frame.

pub mod content;
pub mod engine;
pub mod exploration;
pub mod scene;
pub mod starter;
pub mod state;
pub mod title;
pub mod walker;

#[cfg(test)]
mod testing;

pub use engine::Engine;
pub use scene::{Edge, KeyHandler, Scene, SceneContext, SceneFlow, SceneId, Transition};
pub use state::{GameState, LogBuffer, Player, create_initial_state, reset_state};
