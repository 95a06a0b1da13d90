use eframe::egui;

use crate::model::profile::{is_valid_age, Profile};
use crate::store::GuardianData;
use crate::ui::app::BodhiApp;

pub struct EditState {
    pub id: String,
    pub name: String,
    pub age: String,
}

/// Working copy of the settings window. Created fresh each time the PIN
/// gate opens it, so stale edits never leak between visits.
pub struct SettingsState {
    pub api_key: String,
    pub show_key: bool,
    pub new_name: String,
    pub new_age: String,
    pub editing: Option<EditState>,
    pub stats_profile: Option<String>,
    pub error: Option<String>,
}

impl SettingsState {
    pub fn new(guardian: &GuardianData) -> Self {
        Self {
            api_key: guardian.api_key.clone(),
            show_key: false,
            new_name: String::new(),
            new_age: String::new(),
            editing: None,
            stats_profile: None,
            error: None,
        }
    }
}

pub fn draw(ctx: &egui::Context, app: &mut BodhiApp) {
    let Some(mut state) = app.settings.take() else {
        return;
    };
    let mut close = false;

    egui::Window::new("Settings ⚙")
        .collapsible(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().max_height(480.0).show(ui, |ui| {
                draw_api_key_section(ui, app, &mut state);
                ui.separator();
                draw_profiles_section(ui, app, &mut state);
                ui.separator();
                draw_progress_section(ui, app, &mut state);
            });

            if let Some(error) = &state.error {
                ui.colored_label(egui::Color32::LIGHT_RED, error.as_str());
            }
            if let Some(status) = &app.status {
                ui.colored_label(egui::Color32::YELLOW, status.as_str());
            }

            ui.add_space(8.0);
            if ui.button("Close").clicked() {
                close = true;
            }
        });

    app.settings = if close { None } else { Some(state) };
}

fn draw_api_key_section(ui: &mut egui::Ui, app: &mut BodhiApp, state: &mut SettingsState) {
    ui.heading("Gemini API Key");
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut state.api_key)
                .password(!state.show_key)
                .desired_width(260.0),
        );
        let toggle = if state.show_key { "Hide Key" } else { "Show Key" };
        if ui.button(toggle).clicked() {
            state.show_key = !state.show_key;
        }
    });
    if ui.button("Save Key").clicked() {
        let key = state.api_key.trim();
        if key.is_empty() {
            state.error = Some("API Key cannot be empty!".to_string());
        } else {
            app.guardian.api_key = key.to_string();
            app.save_guardian();
            state.error = None;
        }
    }
}

fn draw_profiles_section(ui: &mut egui::Ui, app: &mut BodhiApp, state: &mut SettingsState) {
    ui.heading("Profiles");

    let mut delete_request: Option<String> = None;
    let mut start_edit: Option<EditState> = None;
    let mut commit_edit = false;
    let mut cancel_edit = false;

    for profile in &app.profiles {
        let editing_this = state
            .editing
            .as_ref()
            .is_some_and(|edit| edit.id == profile.id);
        if editing_this {
            continue;
        }
        ui.horizontal(|ui| {
            ui.label(format!("{} (Age: {})", profile.name, profile.age));
            if ui.small_button("✏").clicked() {
                start_edit = Some(EditState {
                    id: profile.id.clone(),
                    name: profile.name.clone(),
                    age: profile.age.to_string(),
                });
            }
            // Deleting is destructive, so it goes back through a gate.
            if ui.small_button("✖").clicked() {
                delete_request = Some(profile.id.clone());
            }
        });
    }

    if let Some(edit) = &mut state.editing {
        ui.group(|ui| {
            ui.label("Edit profile");
            ui.horizontal(|ui| {
                ui.label("Name");
                ui.text_edit_singleline(&mut edit.name);
            });
            ui.horizontal(|ui| {
                ui.label("Age");
                ui.add(egui::TextEdit::singleline(&mut edit.age).desired_width(48.0));
            });
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    commit_edit = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel_edit = true;
                }
            });
        });
    }

    if cancel_edit {
        state.editing = None;
    } else if commit_edit {
        if let Some(edit) = state.editing.take() {
            match parse_profile_fields(&edit.name, &edit.age) {
                Ok((name, age)) => {
                    if let Some(profile) = app.profiles.iter_mut().find(|p| p.id == edit.id) {
                        profile.name = name;
                        profile.age = age;
                    }
                    app.save_profiles();
                    state.error = None;
                }
                Err(message) => {
                    state.error = Some(message);
                    state.editing = Some(edit);
                }
            }
        }
    }

    if let Some(edit) = start_edit {
        state.editing = Some(edit);
    }
    if let Some(id) = delete_request {
        app.request_profile_delete(id);
    }

    ui.add_space(6.0);
    ui.group(|ui| {
        ui.label("Add a profile");
        ui.horizontal(|ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut state.new_name);
        });
        ui.horizontal(|ui| {
            ui.label("Age");
            ui.add(egui::TextEdit::singleline(&mut state.new_age).desired_width(48.0));
        });
        if ui.button("Add Profile").clicked() {
            match parse_profile_fields(&state.new_name, &state.new_age) {
                Ok((name, age)) => {
                    app.profiles.push(Profile::new(name, age));
                    app.save_profiles();
                    state.new_name.clear();
                    state.new_age.clear();
                    state.error = None;
                }
                Err(message) => state.error = Some(message),
            }
        }
    });
}

fn draw_progress_section(ui: &mut egui::Ui, app: &mut BodhiApp, state: &mut SettingsState) {
    ui.heading("Learning Progress");

    let selected_label = state
        .stats_profile
        .clone()
        .unwrap_or_else(|| "Select a profile".to_string());
    egui::ComboBox::from_id_salt("progress_profile")
        .selected_text(selected_label)
        .show_ui(ui, |ui| {
            for profile in &app.profiles {
                if ui
                    .selectable_label(
                        state.stats_profile.as_deref() == Some(profile.name.as_str()),
                        profile.name.as_str(),
                    )
                    .clicked()
                {
                    state.stats_profile = Some(profile.name.clone());
                }
            }
        });

    let Some(name) = &state.stats_profile else {
        return;
    };
    let stats = app.progress.stats_for(name);
    if stats.is_empty() {
        ui.label("No learning activity recorded yet.");
        return;
    }
    for entry in stats {
        ui.group(|ui| {
            ui.label(
                egui::RichText::new(format!("{} {}", entry.module.icon(), entry.module.label()))
                    .strong(),
            );
            ui.label(format!("Average Score: {}%", entry.average));
            ui.label(format!("Best Score: {}%", entry.best));
            ui.label(format!("Total Attempts: {}", entry.attempts));
            if let Some(when) = entry.last_attempt {
                let local = when.with_timezone(&chrono::Local);
                ui.label(format!("Last Attempt: {}", local.format("%b %e, %Y")));
            }
        });
        ui.add_space(4.0);
    }
}

fn parse_profile_fields(name: &str, age: &str) -> Result<(String, u8), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Please enter a name.".to_string());
    }
    match age.trim().parse::<u8>() {
        Ok(age) if is_valid_age(age) => Ok((name.to_string(), age)),
        _ => Err("Please enter a valid age (1-15).".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_fields_are_validated() {
        assert!(parse_profile_fields("", "8").is_err());
        assert!(parse_profile_fields("Maya", "0").is_err());
        assert!(parse_profile_fields("Maya", "16").is_err());
        assert!(parse_profile_fields("Maya", "eight").is_err());
        assert_eq!(
            parse_profile_fields("  Maya ", "8").unwrap(),
            ("Maya".to_string(), 8)
        );
    }
}
