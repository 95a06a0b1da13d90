use eframe::egui;

use crate::model::content::ModuleContent;
use crate::model::session::{AnswerSlot, ScoreSummary, SessionPhase};
use crate::ui::app::BodhiApp;
use crate::ui::speech;

/// Uniform view over multiple-choice cards, with or without a speak button.
struct CardView<'a> {
    question: &'a str,
    options: &'a [String],
    answer: usize,
    speak: Option<&'a str>,
}

fn card_views(content: &ModuleContent) -> Vec<CardView<'_>> {
    match content {
        ModuleContent::Quiz { questions, .. } => questions
            .iter()
            .map(|q| CardView {
                question: &q.question,
                options: &q.options,
                answer: q.answer,
                speak: None,
            })
            .collect(),
        ModuleContent::Phonics { questions, .. } => questions
            .iter()
            .map(|q| CardView {
                question: &q.question,
                options: &q.options,
                answer: q.answer,
                speak: Some(&q.speak),
            })
            .collect(),
        ModuleContent::Spelling { .. } => Vec::new(),
    }
}

pub fn draw(ctx: &egui::Context, app: &mut BodhiApp) {
    let mut do_submit = false;
    let mut do_leave = false;
    let mut speak_req: Option<String> = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(session) = &mut app.session else {
            do_leave = true;
            return;
        };

        ui.horizontal(|ui| {
            // Back is the only way out and stays off while the request is
            // in flight; the reply for an abandoned session is dropped.
            let loading = session.is_loading();
            if ui
                .add_enabled(!loading, egui::Button::new("⬅ Back"))
                .clicked()
            {
                do_leave = true;
            }
            ui.heading(format!(
                "{} {}",
                session.module.icon(),
                session.module.label()
            ));
            if let Some(theme) = &session.theme {
                ui.label(theme.name);
            }
        });
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            match &session.phase {
                SessionPhase::Loading => {
                    ui.add_space(48.0);
                    ui.vertical_centered(|ui| {
                        ui.add(egui::Spinner::new().size(48.0));
                        ui.add_space(12.0);
                        ui.label("Cooking up something fun for you…");
                    });
                }
                SessionPhase::Failed { message } => {
                    ui.add_space(32.0);
                    ui.vertical_centered(|ui| {
                        ui.colored_label(egui::Color32::LIGHT_RED, message.as_str());
                        ui.add_space(12.0);
                        if ui.button("⬅ Back to Modules").clicked() {
                            do_leave = true;
                        }
                    });
                }
                SessionPhase::Ready => {
                    if let Some(content) = &session.content {
                        draw_story(ui, content.story());
                        ui.add_space(12.0);
                        match content {
                            ModuleContent::Spelling { words, .. } => draw_spelling_cards(
                                ui,
                                words,
                                &mut session.answers,
                                None,
                                &mut speak_req,
                            ),
                            _ => draw_choice_cards(
                                ui,
                                &card_views(content),
                                &mut session.answers,
                                None,
                                &mut speak_req,
                            ),
                        }
                        ui.add_space(12.0);
                        ui.vertical_centered(|ui| {
                            let submit = egui::RichText::new("Check My Answers! ✅").size(18.0);
                            if ui.add(egui::Button::new(submit)).clicked() {
                                do_submit = true;
                            }
                        });
                    }
                }
                SessionPhase::Scored { summary, results } => {
                    if let Some(content) = &session.content {
                        draw_story(ui, content.story());
                        ui.add_space(12.0);
                        match content {
                            ModuleContent::Spelling { words, .. } => draw_spelling_cards(
                                ui,
                                words,
                                &mut session.answers,
                                Some(results.as_slice()),
                                &mut speak_req,
                            ),
                            _ => draw_choice_cards(
                                ui,
                                &card_views(content),
                                &mut session.answers,
                                Some(results.as_slice()),
                                &mut speak_req,
                            ),
                        }
                    }
                    ui.add_space(12.0);
                    draw_score_banner(ui, *summary, &mut do_leave);
                }
            }
        });
    });

    if do_submit {
        app.submit_answers();
    }
    if do_leave {
        app.leave_quiz();
    }
    if let Some(text) = speak_req {
        speech::speak(&text);
    }
}

/// Minimal rendering for the Markdown the generator produces: stories are
/// mostly `##` titles with an emoji plus a paragraph or two.
fn draw_story(ui: &mut egui::Ui, story: &str) {
    for line in story.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            ui.add_space(6.0);
        } else if let Some(h) = line.strip_prefix("### ") {
            ui.label(egui::RichText::new(h).size(18.0).strong());
        } else if let Some(h) = line.strip_prefix("## ") {
            ui.label(egui::RichText::new(h).size(24.0).strong());
        } else if let Some(h) = line.strip_prefix("# ") {
            ui.label(egui::RichText::new(h).size(28.0).strong());
        } else {
            ui.label(line);
        }
    }
}

fn draw_choice_cards(
    ui: &mut egui::Ui,
    cards: &[CardView<'_>],
    answers: &mut [AnswerSlot],
    results: Option<&[bool]>,
    speak_req: &mut Option<String>,
) {
    for (i, card) in cards.iter().enumerate() {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(format!("{}.", i + 1)).strong());
                ui.label(egui::RichText::new(card.question).size(16.0));
                if let Some(speak) = card.speak {
                    if ui.button("🔊").clicked() {
                        *speak_req = Some(speak.to_string());
                    }
                }
            });

            let selected = match answers.get(i) {
                Some(AnswerSlot::Choice(choice)) => *choice,
                _ => None,
            };
            for (j, option) in card.options.iter().enumerate() {
                let clicked = ui.radio(selected == Some(j), option.as_str()).clicked();
                if clicked && results.is_none() {
                    if let Some(slot) = answers.get_mut(i) {
                        *slot = AnswerSlot::Choice(Some(j));
                    }
                }
            }

            if let Some(results) = results {
                if results.get(i).copied().unwrap_or(false) {
                    ui.colored_label(egui::Color32::from_rgb(40, 160, 70), "✔ Correct!");
                } else {
                    ui.colored_label(
                        egui::Color32::from_rgb(200, 70, 60),
                        format!("✖ The answer was: {}", card.options[card.answer]),
                    );
                }
            }
        });
        ui.add_space(6.0);
    }
}

fn draw_spelling_cards(
    ui: &mut egui::Ui,
    words: &[String],
    answers: &mut [AnswerSlot],
    results: Option<&[bool]>,
    speak_req: &mut Option<String>,
) {
    for (i, word) in words.iter().enumerate() {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(format!("{}.", i + 1)).strong());
                ui.label("Spell the word:");
                if ui.button("🔊").clicked() {
                    *speak_req = Some(word.clone());
                }
            });

            if let Some(AnswerSlot::Typed(text)) = answers.get_mut(i) {
                ui.add_enabled(results.is_none(), egui::TextEdit::singleline(text));
            }

            if let Some(results) = results {
                if results.get(i).copied().unwrap_or(false) {
                    ui.colored_label(egui::Color32::from_rgb(40, 160, 70), "✔ Correct!");
                } else {
                    ui.colored_label(
                        egui::Color32::from_rgb(200, 70, 60),
                        format!("✖ It's spelled: {word}"),
                    );
                }
            }
        });
        ui.add_space(6.0);
    }
}

fn draw_score_banner(ui: &mut egui::Ui, summary: ScoreSummary, do_leave: &mut bool) {
    ui.vertical_centered(|ui| {
        if summary.is_perfect() {
            ui.heading(egui::RichText::new("🎉 ⭐ 🎉 ⭐ 🎉").size(32.0));
        }
        ui.heading(format!("Your score: {}", summary.display()));
        ui.label(egui::RichText::new(summary.encouragement()).size(18.0));
        ui.add_space(12.0);
        if ui.button("⬅ Back to Modules").clicked() {
            *do_leave = true;
        }
    });
}
