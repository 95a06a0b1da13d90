use eframe::egui;

use crate::model::module::{available_modules, themes_for, ModuleCategory, ModuleType};
use crate::model::profile::AgeRange;
use crate::ui::app::{BodhiApp, Screen};

/// Category tabs plus the module grid for the active profile's age.
pub fn draw_home(ctx: &egui::Context, app: &mut BodhiApp, tab: ModuleCategory) {
    let age = match &app.current_profile {
        Some(profile) => profile.age,
        None => return,
    };

    let mut new_tab = tab;
    let mut picked: Option<ModuleType> = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.horizontal(|ui| {
            for category in ModuleCategory::ALL {
                if ui
                    .selectable_label(new_tab == category, category.label())
                    .clicked()
                {
                    new_tab = category;
                }
            }
        });
        ui.separator();

        let modules: Vec<ModuleType> = available_modules(age)
            .into_iter()
            .filter(|m| m.category() == new_tab)
            .collect();

        if modules.is_empty() {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                ui.label("More fun unlocks here as you grow! 🌱");
            });
            return;
        }

        ui.add_space(12.0);
        ui.horizontal_wrapped(|ui| {
            for module in modules {
                let text = egui::RichText::new(format!("{}\n{}", module.icon(), module.label()))
                    .size(20.0);
                if ui
                    .add(egui::Button::new(text).min_size(egui::vec2(140.0, 90.0)))
                    .clicked()
                {
                    picked = Some(module);
                }
            }
        });
    });

    if let Some(module) = picked {
        app.pick_module(module);
    } else if new_tab != tab {
        app.screen = Screen::Home { tab: new_tab };
    }
}

/// Theme list and difficulty slider shown between picking a module and
/// firing the generation request.
pub fn draw_theme_select(
    ctx: &egui::Context,
    app: &mut BodhiApp,
    module: ModuleType,
    theme_index: usize,
    difficulty: u8,
) {
    let themes = themes_for(module);
    let mut new_index = theme_index.min(themes.len().saturating_sub(1));
    let mut new_difficulty = difficulty;
    let mut go = false;
    let mut back = false;

    let age_label = app
        .current_profile
        .as_ref()
        .and_then(|p| AgeRange::from_age(p.age))
        .map(AgeRange::label);

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(16.0);
            ui.heading(format!("{} {}", module.icon(), module.label()));
            if let Some(ages) = age_label {
                ui.label(format!("Made for ages {ages}"));
            }
            ui.add_space(12.0);
            ui.label("Pick a theme:");
        });

        ui.add_space(8.0);
        for (i, theme) in themes.iter().enumerate() {
            if ui.radio(new_index == i, theme.name).clicked() {
                new_index = i;
            }
        }

        ui.add_space(12.0);
        ui.add(egui::Slider::new(&mut new_difficulty, 1..=5).text("Difficulty"));

        ui.add_space(16.0);
        ui.horizontal(|ui| {
            if ui.button("⬅ Back").clicked() {
                back = true;
            }
            let start = egui::RichText::new("Let's Go! 🚀").size(18.0);
            if ui.add(egui::Button::new(start)).clicked() {
                go = true;
            }
        });
    });

    if back {
        app.screen = Screen::Home {
            tab: module.category(),
        };
    } else if go {
        if let Some(theme) = themes.get(new_index).copied() {
            app.start_session(module, theme, new_difficulty);
        }
    } else {
        app.screen = Screen::ThemeSelect {
            module,
            theme_index: new_index,
            difficulty: new_difficulty,
        };
    }
}
