//! UI / rendering helpers.
//!
//! This module owns everything that depends on `egui` for presentation.
//! It reads a [`RenderModel`] and produces visual output; no game logic
//! lives here.

use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, Vec2, vec2};

use crate::battle::{BattlePhase, CombatantSnapshot};
use crate::ecs::{EncounterStatus, Facing, Point};
use crate::quests::QuestStatus;
use crate::render::{
    BattleView, DialogView, ExplorationView, InventoryView, MarkerKind, Panel, RenderModel,
    TitleView,
};
use crate::world::{TILE_SIZE, Terrain};

/// Visual representation of a single terrain cell.
pub struct Glyph {
    pub character: &'static str,
    pub fg_color: Color32,
    pub bg_color: Color32,
}

pub const fn terrain_glyph(terrain: Terrain) -> Glyph {
    let (character, fg_color, bg_color) = match terrain {
        Terrain::Grass => (
            "",
            Color32::from_rgb(0x3f, 0x8f, 0x4f),
            Color32::from_rgb(0x4c, 0xa0, 0x5a),
        ),
        Terrain::Path => (
            "",
            Color32::from_rgb(0xb0, 0x90, 0x60),
            Color32::from_rgb(0xc8, 0xa8, 0x78),
        ),
        Terrain::Flagstone => (
            "▫",
            Color32::from_rgb(0x9a, 0x9a, 0xa6),
            Color32::from_rgb(0xb4, 0xb4, 0xbe),
        ),
        Terrain::Bridge => (
            "=",
            Color32::from_rgb(0x6b, 0x4a, 0x2a),
            Color32::from_rgb(0x9c, 0x6b, 0x3c),
        ),
        Terrain::Water => (
            "~",
            Color32::from_rgb(0xbf, 0xe4, 0xff),
            Color32::from_rgb(0x2f, 0x6f, 0xb8),
        ),
        Terrain::Mountain => (
            "▲",
            Color32::from_rgb(0x3a, 0x3a, 0x40),
            Color32::from_rgb(0x5c, 0x5c, 0x66),
        ),
        Terrain::Tree => (
            "♣",
            Color32::from_rgb(0x12, 0x4a, 0x22),
            Color32::from_rgb(0x3f, 0x8f, 0x4f),
        ),
        Terrain::Stone => (
            "●",
            Color32::from_rgb(0x6e, 0x6e, 0x78),
            Color32::from_rgb(0x4c, 0xa0, 0x5a),
        ),
        Terrain::River => (
            "≈",
            Color32::from_rgb(0xd6, 0xee, 0xff),
            Color32::from_rgb(0x1f, 0x5a, 0xa0),
        ),
    };
    Glyph {
        character,
        fg_color,
        bg_color,
    }
}

/// `#rrggbb` to a colour, grey when the string does not parse.
pub fn parse_color(hex: &str) -> Color32 {
    Color32::from_hex(hex).unwrap_or(Color32::GRAY)
}

// ---------------------------------------------------------------------------
// World view
// ---------------------------------------------------------------------------

/// Maps world pixels onto the allocated screen rect.
struct Camera {
    origin: Pos2,
    scale: f32,
}

impl Camera {
    fn to_screen(&self, point: Point) -> Pos2 {
        self.origin + vec2(point.x, point.y) * self.scale
    }
}

/// Draw the map, creatures, markers and the player, scaled to fit.
pub fn draw_world(ui: &mut egui::Ui, model: &RenderModel) {
    let Some(grid) = &model.grid else {
        return;
    };
    let available = ui.available_size();
    let scale = (available.x / grid.width())
        .min(available.y / grid.height())
        .max(0.1);
    let (response, painter) =
        ui.allocate_painter(vec2(grid.width(), grid.height()) * scale, Sense::hover());
    let camera = Camera {
        origin: response.rect.min,
        scale,
    };
    let tile = TILE_SIZE * scale;

    for (col, row, terrain) in grid.iter() {
        let glyph = terrain_glyph(terrain);
        let min = camera.to_screen(Point::new(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE));
        let rect = Rect::from_min_size(min, Vec2::splat(tile));
        painter.rect_filled(rect, 0.0, glyph.bg_color);
        if !glyph.character.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                glyph.character,
                FontId::proportional(tile * 0.6),
                glyph.fg_color,
            );
        }
    }

    for marker in &model.markers {
        let center = camera.to_screen(marker.position);
        let color = marker.color.as_deref().map_or(Color32::WHITE, parse_color);
        match marker.kind {
            MarkerKind::Npc => {
                painter.circle_filled(center, tile * 0.35, Color32::from_rgb(0xe8, 0xc5, 0x8c));
                painter.circle_stroke(center, tile * 0.35, Stroke::new(1.5, Color32::BLACK));
            }
            MarkerKind::Station => {
                painter.rect_filled(
                    Rect::from_center_size(center, Vec2::splat(tile * 0.6)),
                    2.0,
                    Color32::from_rgb(0x8b, 0x5a, 0x2b),
                );
            }
            MarkerKind::Pedestal => {
                painter.rect_filled(
                    Rect::from_center_size(
                        center + vec2(0.0, tile * 0.25),
                        vec2(tile * 0.8, tile * 0.3),
                    ),
                    2.0,
                    Color32::from_rgb(0xd4, 0xd4, 0xd8),
                );
                painter.circle_filled(center, tile * 0.3, color);
            }
        }
        painter.text(
            center - vec2(0.0, tile * 0.6),
            Align2::CENTER_BOTTOM,
            &marker.label,
            FontId::proportional((tile * 0.35).max(9.0)),
            Color32::WHITE,
        );
    }

    for encounter in &model.encounters {
        let center = camera.to_screen(encounter.position);
        let radius = if encounter.boss { tile * 0.45 } else { tile * 0.32 };
        let mut color = parse_color(&encounter.color);
        if encounter.status == EncounterStatus::Battle {
            color = color.gamma_multiply(0.5);
        }
        painter.circle_filled(center, radius, color);
        if encounter.boss {
            let ring = Stroke::new(2.0, Color32::from_rgb(0xf5, 0x9e, 0x0b));
            painter.circle_stroke(center, radius, ring);
        }
    }

    if let Some(player) = &model.player {
        let center = camera.to_screen(player.position);
        painter.circle_filled(center, tile * 0.4, Color32::from_rgb(0xf8, 0xfa, 0xfc));
        let nose = match player.facing {
            Facing::Up => vec2(0.0, -1.0),
            Facing::Down => vec2(0.0, 1.0),
            Facing::Left => vec2(-1.0, 0.0),
            Facing::Right => vec2(1.0, 0.0),
        };
        painter.circle_filled(center + nose * tile * 0.25, tile * 0.1, Color32::BLACK);
    }
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

pub fn draw_panel(ui: &mut egui::Ui, panel: &Panel) {
    match panel {
        Panel::Title(view) => title_panel(ui, view),
        Panel::Exploration(view) => exploration_panel(ui, view),
        Panel::Inventory(view) => inventory_panel(ui, view),
        Panel::Dialog(view) => dialog_panel(ui, view),
        Panel::Battle(view) => battle_panel(ui, view),
    }
}

fn cursor_line(ui: &mut egui::Ui, selected: bool, text: &str, enabled: bool) {
    let marker = if selected { "▶ " } else { "  " };
    let mut rich = RichText::new(format!("{marker}{text}")).size(20.0).monospace();
    if !enabled {
        rich = rich.color(Color32::DARK_GRAY);
    } else if selected {
        rich = rich.strong().color(Color32::WHITE);
    }
    ui.label(rich);
}

fn log_lines(ui: &mut egui::Ui, lines: &[String]) {
    ui.separator();
    for line in lines {
        ui.label(RichText::new(line).small());
    }
}

fn title_panel(ui: &mut egui::Ui, view: &TitleView) {
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.heading(RichText::new("Sylva").size(48.0));
        ui.label("A tale of keepers and wild things");
        ui.add_space(40.0);
        for (index, option) in view.options.iter().enumerate() {
            let enabled = index == 0 || view.can_continue;
            cursor_line(ui, index == view.cursor, option, enabled);
        }
        ui.add_space(20.0);
        ui.label(RichText::new("Arrows to choose, Enter to confirm").small());
    });
}

fn exploration_panel(ui: &mut egui::Ui, view: &ExplorationView) {
    ui.heading(&view.title);
    ui.label(format!("Standing on {}", view.terrain));
    ui.separator();
    match &view.companion {
        Some(companion) => {
            let stats = companion.stats;
            ui.label(RichText::new(&companion.name).strong());
            ui.label(format!("Lv {}  HP {}", stats.level, companion.max_hp));
            ui.label(format!(
                "POW {}  DEF {}  SPD {}  MOR {}",
                stats.power, stats.defense, stats.speed, stats.morale
            ));
            ui.add(
                egui::ProgressBar::new(view.hunger as f32 / 100.0)
                    .text(format!("Hunger {}", view.hunger)),
            );
        }
        None => {
            ui.label("No companion yet");
        }
    }
    ui.label(format!("Gold {}", view.gold));

    if !view.quests.is_empty() {
        ui.separator();
        for quest in &view.quests {
            let mark = match quest.status {
                QuestStatus::Available => "○",
                QuestStatus::Active => "◐",
                QuestStatus::Completed => "●",
            };
            ui.label(RichText::new(format!("{mark} {}", quest.title)).strong())
                .on_hover_text(quest.description.as_str());
        }
    }
    if let Some(hint) = &view.hint {
        ui.separator();
        ui.label(RichText::new(hint).italics().color(Color32::YELLOW));
    }
    log_lines(ui, &view.log);
}

fn inventory_panel(ui: &mut egui::Ui, view: &InventoryView) {
    ui.heading("Bag");
    if view.entries.is_empty() {
        ui.label("Empty");
    }
    for (index, entry) in view.entries.iter().enumerate() {
        cursor_line(ui, index == view.cursor, &format!("{} x{}", entry.name, entry.quantity), true);
        if index == view.cursor {
            ui.label(RichText::new(&entry.description).small().italics());
        }
    }
    log_lines(ui, &view.log);
}

fn dialog_panel(ui: &mut egui::Ui, view: &DialogView) {
    ui.heading(&view.speaker);
    ui.add_space(8.0);
    ui.label(RichText::new(&view.line).size(18.0));
    ui.add_space(8.0);
    let prompt = if view.remaining > 0 { "Enter: next" } else { "Enter: close" };
    ui.label(RichText::new(prompt).small());
}

fn combatant(ui: &mut egui::Ui, snapshot: &CombatantSnapshot) {
    ui.label(RichText::new(format!("{}  Lv {}", snapshot.name, snapshot.level)).strong());
    let fraction = if snapshot.max_hp == 0 {
        0.0
    } else {
        snapshot.hp as f32 / snapshot.max_hp as f32
    };
    ui.add(egui::ProgressBar::new(fraction).text(format!("{}/{}", snapshot.hp, snapshot.max_hp)));
}

fn battle_panel(ui: &mut egui::Ui, view: &BattleView) {
    ui.heading("Battle");
    combatant(ui, &view.enemy);
    ui.add_space(6.0);
    combatant(ui, &view.player);
    ui.separator();
    match view.phase {
        BattlePhase::Intro => {
            ui.label("...");
        }
        BattlePhase::PlayerTurn => {
            for (index, option) in view.menu.iter().enumerate() {
                cursor_line(ui, index == view.cursor, &option.label, true);
                if index == view.cursor {
                    ui.label(RichText::new(&option.detail).small());
                }
            }
        }
        BattlePhase::EnemyTurn => {
            ui.label("The enemy is moving... (Esc to retreat)");
        }
        BattlePhase::Victory | BattlePhase::Defeat | BattlePhase::Escape => {
            ui.label(RichText::new("Enter to continue").small());
        }
    }
    log_lines(ui, &view.log);
}

/// Full frame: world in the centre, panel on the right. The title screen has
/// no world and takes the whole window.
pub fn draw(ctx: &egui::Context, model: &RenderModel) {
    if model.grid.is_none() {
        egui::CentralPanel::default().show(ctx, |ui| draw_panel(ui, &model.panel));
        return;
    }
    egui::SidePanel::right("panel")
        .resizable(false)
        .exact_width(300.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| draw_panel(ui, &model.panel));
        });
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.centered_and_justified(|ui| draw_world(ui, model));
    });
}
