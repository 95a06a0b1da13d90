use eframe::egui;

use crate::model::profile::Profile;
use crate::ui::app::BodhiApp;

/// Kid-facing profile picker. Creating and editing profiles lives behind
/// the settings gate, not here.
pub fn draw(ctx: &egui::Context, app: &mut BodhiApp) {
    let mut picked: Option<Profile> = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.heading("Who's learning today?");
            ui.add_space(16.0);

            if app.profiles.is_empty() {
                ui.label("No profiles yet. A grown-up can add one in Settings ⚙");
                return;
            }

            for profile in &app.profiles {
                let text = egui::RichText::new(format!("🧒 {}", profile.name)).size(22.0);
                if ui.add(egui::Button::new(text).min_size(egui::vec2(220.0, 48.0))).clicked() {
                    picked = Some(profile.clone());
                }
                ui.add_space(8.0);
            }
        });
    });

    if let Some(profile) = picked {
        app.select_profile(profile);
    }
}
