use eframe::egui;

use crate::model::profile::{is_valid_age, Profile};
use crate::store::{GuardianData, RecoveryAnswers};
use crate::ui::app::{BodhiApp, Screen};
use crate::ui::gate::is_valid_pin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupStep {
    #[default]
    Welcome,
    Pin,
    ApiKey,
    Profile,
    Done,
}

impl SetupStep {
    fn number(self) -> u8 {
        match self {
            SetupStep::Welcome => 1,
            SetupStep::Pin => 2,
            SetupStep::ApiKey => 3,
            SetupStep::Profile => 4,
            SetupStep::Done => 5,
        }
    }
}

/// First-run wizard state: guardian PIN + recovery answers, the API key,
/// and the first child profile, in that order.
#[derive(Default)]
pub struct SetupState {
    pub step: SetupStep,
    pub pin: String,
    pub color: String,
    pub city: String,
    pub team: String,
    pub api_key: String,
    pub show_key: bool,
    pub name: String,
    pub age_text: String,
    pub error: Option<String>,
}

impl SetupState {
    fn validate_pin_step(&self) -> Result<(), String> {
        if !is_valid_pin(&self.pin) {
            return Err("Please enter a 4-digit PIN".to_string());
        }
        if self.color.trim().is_empty()
            || self.city.trim().is_empty()
            || self.team.trim().is_empty()
        {
            return Err("Please answer all recovery questions".to_string());
        }
        Ok(())
    }

    fn validate_api_step(&self) -> Result<(), String> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err("Please enter your Gemini API key".to_string());
        }
        // Gemini keys share a fixed prefix; catch obvious paste mistakes.
        if !key.starts_with("AIza") {
            return Err("Please enter a valid Gemini API key".to_string());
        }
        Ok(())
    }

    fn validate_profile_step(&self) -> Result<(String, u8), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Please enter your child's name".to_string());
        }
        match self.age_text.trim().parse::<u8>() {
            Ok(age) if is_valid_age(age) => Ok((name.to_string(), age)),
            _ => Err("Please enter a valid age (1-15)".to_string()),
        }
    }
}

pub fn draw(ctx: &egui::Context, app: &mut BodhiApp) {
    let Some(mut state) = app.setup.take() else {
        return;
    };
    let mut finished = false;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.heading("🪷 Welcome to Bodhi");
            ui.label(format!("Step {} of 5", state.step.number()));
            ui.add_space(16.0);
        });

        match state.step {
            SetupStep::Welcome => {
                ui.vertical_centered(|ui| {
                    ui.label("Bodhi builds playful learning modules for your child.");
                    ui.label("Let's set up a guardian PIN, your API key and a first profile.");
                    ui.add_space(16.0);
                    if ui.button("Get Started ➡").clicked() {
                        state.step = SetupStep::Pin;
                        state.error = None;
                    }
                });
            }
            SetupStep::Pin => {
                ui.label("Choose a 4-digit guardian PIN:");
                ui.add(
                    egui::TextEdit::singleline(&mut state.pin)
                        .password(true)
                        .char_limit(4),
                );
                state.pin.retain(|c| c.is_ascii_digit());

                ui.add_space(8.0);
                ui.label("Recovery answers (used if you forget the PIN):");
                ui.horizontal(|ui| {
                    ui.label("Favorite color");
                    ui.text_edit_singleline(&mut state.color);
                });
                ui.horizontal(|ui| {
                    ui.label("City you were born in");
                    ui.text_edit_singleline(&mut state.city);
                });
                ui.horizontal(|ui| {
                    ui.label("Favorite team");
                    ui.text_edit_singleline(&mut state.team);
                });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("⬅ Back").clicked() {
                        state.step = SetupStep::Welcome;
                        state.error = None;
                    }
                    if ui.button("Next ➡").clicked() {
                        match state.validate_pin_step() {
                            Ok(()) => {
                                state.step = SetupStep::ApiKey;
                                state.error = None;
                            }
                            Err(message) => state.error = Some(message),
                        }
                    }
                });
            }
            SetupStep::ApiKey => {
                ui.label("Paste your Gemini API key:");
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut state.api_key)
                            .password(!state.show_key)
                            .desired_width(280.0),
                    );
                    let toggle = if state.show_key { "Hide Key" } else { "Show Key" };
                    if ui.button(toggle).clicked() {
                        state.show_key = !state.show_key;
                    }
                });
                ui.label("You can create one in Google AI Studio.");

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("⬅ Back").clicked() {
                        state.step = SetupStep::Pin;
                        state.error = None;
                    }
                    if ui.button("Next ➡").clicked() {
                        match state.validate_api_step() {
                            Ok(()) => {
                                state.step = SetupStep::Profile;
                                state.error = None;
                            }
                            Err(message) => state.error = Some(message),
                        }
                    }
                });
            }
            SetupStep::Profile => {
                ui.label("Who will be learning?");
                ui.horizontal(|ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut state.name);
                });
                ui.horizontal(|ui| {
                    ui.label("Age (1-15)");
                    ui.add(egui::TextEdit::singleline(&mut state.age_text).desired_width(48.0));
                });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("⬅ Back").clicked() {
                        state.step = SetupStep::ApiKey;
                        state.error = None;
                    }
                    if ui.button("Next ➡").clicked() {
                        match state.validate_profile_step() {
                            Ok(_) => {
                                state.step = SetupStep::Done;
                                state.error = None;
                            }
                            Err(message) => state.error = Some(message),
                        }
                    }
                });
            }
            SetupStep::Done => {
                ui.vertical_centered(|ui| {
                    ui.heading("All set! 🎉");
                    ui.label("You can change everything later in Settings.");
                    ui.add_space(16.0);
                    if ui.button("Enter Bodhi ➡").clicked() {
                        finished = true;
                    }
                });
            }
        }

        if let Some(error) = &state.error {
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                ui.colored_label(egui::Color32::LIGHT_RED, error.as_str());
            });
        }
    });

    if finished {
        complete_setup(app, &state);
    } else {
        app.setup = Some(state);
    }
}

fn complete_setup(app: &mut BodhiApp, state: &SetupState) {
    app.guardian = GuardianData {
        api_key: state.api_key.trim().to_string(),
        pin: state.pin.clone(),
        recovery: RecoveryAnswers {
            color: state.color.trim().to_lowercase(),
            city: state.city.trim().to_lowercase(),
            team: state.team.trim().to_lowercase(),
        },
    };
    app.save_guardian();

    if let Ok((name, age)) = state.validate_profile_step() {
        app.profiles.push(Profile::new(name, age));
        app.save_profiles();
    }

    if let Err(e) = app.store.mark_setup_complete() {
        tracing::warn!(%e, "could not persist setup marker");
    }
    app.screen = Screen::ProfileSelect;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_step_requires_four_digits_and_all_answers() {
        let mut state = SetupState {
            pin: "12".into(),
            color: "Blue".into(),
            city: "Oslo".into(),
            team: "Tigers".into(),
            ..Default::default()
        };
        assert!(state.validate_pin_step().is_err());

        state.pin = "1234".into();
        assert!(state.validate_pin_step().is_ok());

        state.team.clear();
        assert!(state.validate_pin_step().is_err());
    }

    #[test]
    fn api_step_requires_the_gemini_prefix() {
        let mut state = SetupState {
            api_key: "sk-wrong".into(),
            ..Default::default()
        };
        assert!(state.validate_api_step().is_err());
        state.api_key = " AIzaSyExample ".into();
        assert!(state.validate_api_step().is_ok());
        state.api_key.clear();
        assert!(state.validate_api_step().is_err());
    }

    #[test]
    fn profile_step_bounds_the_age() {
        let mut state = SetupState {
            name: "Maya".into(),
            age_text: "15".into(),
            ..Default::default()
        };
        assert_eq!(state.validate_profile_step().unwrap(), ("Maya".into(), 15));
        state.age_text = "16".into();
        assert!(state.validate_profile_step().is_err());
        state.age_text = "0".into();
        assert!(state.validate_profile_step().is_err());
    }
}
