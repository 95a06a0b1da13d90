use eframe::egui;
use rand::Rng;

use crate::store::RecoveryAnswers;

/// What to do once a gate is passed. Stored on the gate itself and simply
/// dropped when the guardian cancels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    OpenSettings,
    ExitToProfiles,
    DeleteProfile(String),
}

pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == 4 && pin.chars().all(|c| c.is_ascii_digit())
}

/* =========================
   Math challenge gate
   ========================= */

/// A freshly generated two-operand addition challenge. Operands are drawn
/// from 5..=14 so the sum is out of reach for the youngest children.
pub struct MathGate {
    a: u8,
    b: u8,
    pub input: String,
    pub failed: bool,
    pub action: PendingAction,
}

impl MathGate {
    pub fn new(action: PendingAction) -> Self {
        let mut rng = rand::thread_rng();
        let a = rng.gen_range(5..=14);
        let b = rng.gen_range(5..=14);
        Self::with_operands(a, b, action)
    }

    pub fn with_operands(a: u8, b: u8, action: PendingAction) -> Self {
        Self {
            a,
            b,
            input: String::new(),
            failed: false,
            action,
        }
    }

    pub fn operands(&self) -> (u8, u8) {
        (self.a, self.b)
    }

    pub fn question(&self) -> String {
        format!("What is {} + {}?", self.a, self.b)
    }

    /// Check the typed answer against the sum. A wrong or unparsable entry
    /// marks the gate failed and leaves it open.
    pub fn try_answer(&mut self) -> bool {
        let expected = u32::from(self.a) + u32::from(self.b);
        match self.input.trim().parse::<u32>() {
            Ok(answer) if answer == expected => true,
            _ => {
                self.failed = true;
                false
            }
        }
    }
}

/* =========================
   PIN gate with recovery
   ========================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryQuestion {
    FavoriteColor,
    CityBorn,
    FavoriteTeam,
}

impl RecoveryQuestion {
    pub fn random() -> Self {
        match rand::thread_rng().gen_range(0..3) {
            0 => RecoveryQuestion::FavoriteColor,
            1 => RecoveryQuestion::CityBorn,
            _ => RecoveryQuestion::FavoriteTeam,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            RecoveryQuestion::FavoriteColor => "What is your favorite color?",
            RecoveryQuestion::CityBorn => "In which city were you born?",
            RecoveryQuestion::FavoriteTeam => "What is your favorite team?",
        }
    }

    fn stored_answer(self, answers: &RecoveryAnswers) -> &str {
        match self {
            RecoveryQuestion::FavoriteColor => &answers.color,
            RecoveryQuestion::CityBorn => &answers.city,
            RecoveryQuestion::FavoriteTeam => &answers.team,
        }
    }

    /// Answers are stored lowercase; entries are matched lowercase-trimmed.
    pub fn matches(self, answers: &RecoveryAnswers, entry: &str) -> bool {
        let stored = self.stored_answer(answers).trim();
        !stored.is_empty() && entry.trim().to_lowercase() == stored
    }
}

/// PIN-reset flow reached from a forgotten PIN: answer one randomly chosen
/// recovery question, then pick a new 4-digit PIN.
pub struct RecoveryPrompt {
    pub question: RecoveryQuestion,
    pub answer_input: String,
    pub new_pin: String,
    pub failed: bool,
}

impl RecoveryPrompt {
    pub fn new() -> Self {
        Self {
            question: RecoveryQuestion::random(),
            answer_input: String::new(),
            new_pin: String::new(),
            failed: false,
        }
    }
}

pub struct PinGate {
    pub input: String,
    pub failed: bool,
    pub action: PendingAction,
    pub recovery: Option<RecoveryPrompt>,
}

impl PinGate {
    pub fn new(action: PendingAction) -> Self {
        Self {
            input: String::new(),
            failed: false,
            action,
            recovery: None,
        }
    }

    /// A wrong entry clears the input so the next four digits start fresh.
    pub fn try_pin(&mut self, stored: &str) -> bool {
        if !stored.is_empty() && self.input == stored {
            true
        } else {
            self.failed = true;
            self.input.clear();
            false
        }
    }
}

/* =========================
   Drawing
   ========================= */

#[derive(Debug, PartialEq, Eq)]
pub enum GateVerdict {
    Pending,
    Passed,
    Cancelled,
    /// Recovery succeeded: persist this PIN, then run the pending action.
    PinReset(String),
}

pub fn draw_math_gate(ctx: &egui::Context, gate: &mut MathGate) -> GateVerdict {
    let mut verdict = GateVerdict::Pending;
    egui::Window::new("Grown-Ups Only 🔒")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Please solve this to continue:");
            ui.heading(gate.question());
            let response = ui.text_edit_singleline(&mut gate.input);
            if gate.failed {
                ui.colored_label(egui::Color32::RED, "That's not it. Try again!");
            }
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            ui.horizontal(|ui| {
                if ui.button("Check").clicked() || submitted {
                    if gate.try_answer() {
                        verdict = GateVerdict::Passed;
                    }
                }
                if ui.button("Cancel").clicked() {
                    verdict = GateVerdict::Cancelled;
                }
            });
        });
    verdict
}

pub fn draw_pin_gate(
    ctx: &egui::Context,
    gate: &mut PinGate,
    stored_pin: &str,
    recovery_answers: &RecoveryAnswers,
) -> GateVerdict {
    let mut verdict = GateVerdict::Pending;
    egui::Window::new("Enter PIN 🔒")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if gate.recovery.is_none() {
                ui.label("Enter the 4-digit guardian PIN:");
                ui.add(
                    egui::TextEdit::singleline(&mut gate.input)
                        .password(true)
                        .char_limit(4),
                );
                gate.input.retain(|c| c.is_ascii_digit());
                if gate.failed {
                    ui.colored_label(egui::Color32::RED, "Wrong PIN.");
                }
                ui.horizontal(|ui| {
                    let ready = gate.input.len() == 4;
                    if ui
                        .add_enabled(ready, egui::Button::new("Unlock"))
                        .clicked()
                        && gate.try_pin(stored_pin)
                    {
                        verdict = GateVerdict::Passed;
                    }
                    if ui.button("Cancel").clicked() {
                        verdict = GateVerdict::Cancelled;
                    }
                });
                if ui.link("Forgot the PIN?").clicked() {
                    gate.recovery = Some(RecoveryPrompt::new());
                }
            } else if let Some(recovery) = gate.recovery.as_mut() {
                ui.label("Answer to reset the PIN:");
                ui.label(recovery.question.prompt());
                ui.text_edit_singleline(&mut recovery.answer_input);
                ui.label("New 4-digit PIN:");
                ui.add(
                    egui::TextEdit::singleline(&mut recovery.new_pin)
                        .password(true)
                        .char_limit(4),
                );
                recovery.new_pin.retain(|c| c.is_ascii_digit());
                if recovery.failed {
                    ui.colored_label(egui::Color32::RED, "That answer doesn't match.");
                }
                ui.horizontal(|ui| {
                    let ready = is_valid_pin(&recovery.new_pin)
                        && !recovery.answer_input.trim().is_empty();
                    if ui
                        .add_enabled(ready, egui::Button::new("Reset PIN"))
                        .clicked()
                    {
                        if recovery
                            .question
                            .matches(recovery_answers, &recovery.answer_input)
                        {
                            verdict = GateVerdict::PinReset(recovery.new_pin.clone());
                        } else {
                            recovery.failed = true;
                            recovery.answer_input.clear();
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        verdict = GateVerdict::Cancelled;
                    }
                });
            }
        });
    verdict
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operands_stay_in_range() {
        for _ in 0..200 {
            let gate = MathGate::new(PendingAction::OpenSettings);
            let (a, b) = gate.operands();
            assert!((5..=14).contains(&a));
            assert!((5..=14).contains(&b));
        }
    }

    #[test]
    fn exact_sum_passes_anything_else_leaves_the_gate_open() {
        let mut gate = MathGate::with_operands(7, 9, PendingAction::ExitToProfiles);
        gate.input = "15".into();
        assert!(!gate.try_answer());
        assert!(gate.failed);

        gate.input = "sixteen".into();
        assert!(!gate.try_answer());

        gate.input = " 16 ".into();
        assert!(gate.try_answer());
    }

    #[test]
    fn pin_gate_clears_input_on_failure() {
        let mut gate = PinGate::new(PendingAction::OpenSettings);
        gate.input = "1111".into();
        assert!(!gate.try_pin("4321"));
        assert!(gate.failed);
        assert!(gate.input.is_empty());

        gate.input = "4321".into();
        assert!(gate.try_pin("4321"));
    }

    #[test]
    fn empty_stored_pin_never_matches() {
        let mut gate = PinGate::new(PendingAction::OpenSettings);
        gate.input = String::new();
        assert!(!gate.try_pin(""));
    }

    #[test]
    fn recovery_matching_is_lowercase_trimmed() {
        let answers = RecoveryAnswers {
            color: "blue".into(),
            city: "oslo".into(),
            team: "tigers".into(),
        };
        assert!(RecoveryQuestion::FavoriteColor.matches(&answers, "  Blue "));
        assert!(RecoveryQuestion::CityBorn.matches(&answers, "OSLO"));
        assert!(!RecoveryQuestion::FavoriteTeam.matches(&answers, "lions"));
        // Unset answers must not match the empty string.
        assert!(!RecoveryQuestion::FavoriteColor.matches(&RecoveryAnswers::default(), ""));
    }

    #[test]
    fn pin_validation() {
        assert!(is_valid_pin("0042"));
        assert!(!is_valid_pin("123"));
        assert!(!is_valid_pin("12345"));
        assert!(!is_valid_pin("12a4"));
    }
}
