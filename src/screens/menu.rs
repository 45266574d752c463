//! Main menu screen.
//!
//! Shown right after startup. Lists the menu entries, highlights the selected
//! one and reports how many level packs are available. The screen reads the
//! shared subsystems but never changes them.

use crate::app::{Canvas, Rgba};
use crate::resources::assetstore::{AssetKind, AssetStore};
use crate::resources::levels::LevelManager;
use crate::screens::Screen;
use bevy_ecs::prelude::World;
use log::{debug, warn};

const TITLE: &str = "Problematic";
const TITLE_SIZE: i32 = 48;
const ITEM_SIZE: i32 = 28;
const ITEM_SPACING: i32 = 48;
const FOOTER_SIZE: i32 = 18;

#[derive(Clone, Debug)]
pub struct MenuItem {
    pub id: &'static str,
    pub label: &'static str,
    /// Texture drawn for this entry once sprites are in place.
    pub texture: &'static str,
}

pub struct MenuScreen {
    pub items: Vec<MenuItem>,
    pub selected_index: usize,
    pub normal_color: Rgba,
    pub selected_color: Rgba,
    pack_count: usize,
}

impl Default for MenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuScreen {
    pub fn new() -> Self {
        Self {
            items: vec![
                MenuItem {
                    id: "play",
                    label: "Play",
                    texture: "playButton",
                },
                MenuItem {
                    id: "options",
                    label: "Options",
                    texture: "optionsButton",
                },
                MenuItem {
                    id: "help",
                    label: "Help",
                    texture: "helpButton",
                },
            ],
            selected_index: 0,
            normal_color: Rgba::DARK_BLUE,
            selected_color: Rgba::WHITE,
            pack_count: 0,
        }
    }

    pub fn selected(&self) -> Option<&MenuItem> {
        self.items.get(self.selected_index)
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected_index = (self.selected_index + 1) % self.items.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.items.is_empty() {
            self.selected_index = (self.selected_index + self.items.len() - 1) % self.items.len();
        }
    }
}

impl Screen for MenuScreen {
    fn name(&self) -> &'static str {
        "menu"
    }

    fn show(&mut self, world: &mut World) {
        if let Some(assets) = world.get_resource::<AssetStore>() {
            for item in &self.items {
                let is_texture = assets
                    .get(item.texture)
                    .is_some_and(|e| e.kind == AssetKind::Texture);
                if !is_texture {
                    warn!("Menu item '{}' has no texture '{}'", item.id, item.texture);
                }
            }
        }
        self.pack_count = world
            .get_resource::<LevelManager>()
            .map_or(0, |levels| levels.packs().len());
        debug!("Menu shown with {} level packs", self.pack_count);
    }

    fn render(&mut self, _world: &mut World, canvas: &mut dyn Canvas, _delta: f32) {
        let (w, h) = canvas.size();
        let x = w / 2 - 100;

        canvas.draw_text(TITLE, x, h / 6, TITLE_SIZE, self.normal_color);

        let top = h / 3;
        for (i, item) in self.items.iter().enumerate() {
            let color = if i == self.selected_index {
                self.selected_color
            } else {
                self.normal_color
            };
            canvas.draw_text(item.label, x, top + i as i32 * ITEM_SPACING, ITEM_SIZE, color);
        }

        let footer = format!("{} level packs", self.pack_count);
        canvas.draw_text(&footer, x, h - 2 * FOOTER_SIZE, FOOTER_SIZE, self.normal_color);
    }
}
