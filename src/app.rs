//! Application shell: wires the engine, the persisted state and the UI
//! together.

use std::path::Path;

use crate::config::EngineConfig;
use crate::error::ContentError;
use crate::game::{Engine, GameState, create_initial_state};
use crate::input::Key;
use crate::ui;

/// Optional tuning file next to the executable's working directory.
const CONFIG_PATH: &str = "sylva.json";

pub struct SylvaApp {
    engine: Engine,
    state: GameState,
    /// Last failure, kept on screen.
    error: Option<String>,
}

impl SylvaApp {
    /// Called once before the first frame.
    ///
    /// # Errors
    /// The built-in content is inconsistent.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, ContentError> {
        let config = EngineConfig::load_or_default(Path::new(CONFIG_PATH)).unwrap_or_else(|e| {
            log::error!("{e}; using default config");
            EngineConfig::default()
        });

        let mut state = cc
            .storage
            .and_then(|storage| eframe::get_value::<GameState>(storage, eframe::APP_KEY))
            .unwrap_or_else(|| create_initial_state(&config));

        let mut engine = Engine::new(config)?;
        engine.start(&mut state);
        Ok(Self {
            engine,
            state,
            error: None,
        })
    }

    fn input(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            let egui::Event::Key {
                key,
                pressed,
                repeat,
                ..
            } = event
            else {
                continue;
            };
            let Some(key) = map_key(key) else {
                continue;
            };
            if !pressed {
                self.engine.key_up(&mut self.state, key);
            } else if !repeat
                && let Err(e) = self.engine.key_down(&mut self.state, key)
            {
                log::error!("key {key:?} failed: {e}");
                self.error = Some(e.to_string());
            }
        }
    }
}

fn map_key(key: egui::Key) -> Option<Key> {
    match key {
        egui::Key::W | egui::Key::ArrowUp => Some(Key::Up),
        egui::Key::S | egui::Key::ArrowDown => Some(Key::Down),
        egui::Key::A | egui::Key::ArrowLeft => Some(Key::Left),
        egui::Key::D | egui::Key::ArrowRight => Some(Key::Right),
        egui::Key::Enter | egui::Key::Space => Some(Key::Confirm),
        egui::Key::Escape => Some(Key::Cancel),
        egui::Key::I | egui::Key::Tab => Some(Key::ToggleInventory),
        _ => None,
    }
}

impl eframe::App for SylvaApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.state);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.input(ctx);

        let dt = ctx.input(|i| i.stable_dt);
        if let Err(e) = self.engine.update(&mut self.state, dt) {
            log::error!("tick failed: {e}");
            self.error = Some(e.to_string());
        }

        if let Some(error) = &self.error {
            egui::TopBottomPanel::bottom("error").show(ctx, |ui| {
                ui.colored_label(egui::Color32::RED, error.as_str());
            });
        }
        if let Some(model) = self.engine.render(&self.state) {
            ui::draw(ctx, &model);
        }

        // The simulation is frame-driven, so keep frames coming.
        ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_arrows_move() {
        assert_eq!(map_key(egui::Key::W), Some(Key::Up));
        assert_eq!(map_key(egui::Key::ArrowLeft), Some(Key::Left));
        assert_eq!(map_key(egui::Key::Escape), Some(Key::Cancel));
        assert_eq!(map_key(egui::Key::Tab), Some(Key::ToggleInventory));
        assert_eq!(map_key(egui::Key::F5), None);
    }
}
