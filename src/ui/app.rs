use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use eframe::egui;
use tracing::warn;

use crate::engine::engine::Engine;
use crate::engine::gemini::GeminiClient;
use crate::engine::protocol::{EngineCommand, EngineResponse, GenerateJob};
use crate::model::module::{ModuleCategory, ModuleType, ThemeDef};
use crate::model::profile::Profile;
use crate::model::progress::ProgressBook;
use crate::model::session::ModuleSession;
use crate::store::{GuardianData, Store};
use crate::ui::gate::{
    draw_math_gate, draw_pin_gate, GateVerdict, MathGate, PendingAction, PinGate,
};
use crate::ui::settings_screen::SettingsState;
use crate::ui::setup_screen::SetupState;
use crate::ui::{home_screen, profile_screen, quiz_screen, settings_screen, setup_screen};

/* =========================
   Screens
   ========================= */

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Setup,
    ProfileSelect,
    Home {
        tab: ModuleCategory,
    },
    ThemeSelect {
        module: ModuleType,
        theme_index: usize,
        difficulty: u8,
    },
    Quiz,
}

/* =========================
   App
   ========================= */

pub struct BodhiApp {
    pub(crate) store: Store,
    pub(crate) profiles: Vec<Profile>,
    pub(crate) guardian: GuardianData,
    pub(crate) progress: ProgressBook,

    pub(crate) screen: Screen,
    pub(crate) current_profile: Option<Profile>,
    pub(crate) session: Option<ModuleSession>,
    next_session_id: u64,

    pub(crate) math_gate: Option<MathGate>,
    pub(crate) pin_gate: Option<PinGate>,
    pub(crate) settings: Option<SettingsState>,
    pub(crate) setup: Option<SetupState>,
    /// Non-fatal problems (usually failed saves) shown in the settings UI.
    pub(crate) status: Option<String>,

    cmd_tx: Sender<EngineCommand>,
    resp_rx: Receiver<EngineResponse>,
}

impl BodhiApp {
    pub fn new() -> Self {
        let store = Store::open();
        Self::with_store(store)
    }

    pub fn with_store(store: Store) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, GeminiClient::new());
            engine.run();
        });

        let profiles = store.load_profiles();
        let guardian = store.load_guardian();
        let progress = store.load_progress();

        let (screen, setup) = if store.setup_complete() {
            (Screen::ProfileSelect, None)
        } else {
            (Screen::Setup, Some(SetupState::default()))
        };

        Self {
            store,
            profiles,
            guardian,
            progress,
            screen,
            current_profile: None,
            session: None,
            next_session_id: 0,
            math_gate: None,
            pin_gate: None,
            settings: None,
            setup,
            status: None,
            cmd_tx,
            resp_rx,
        }
    }

    /* ---------- transitions ---------- */

    pub(crate) fn select_profile(&mut self, profile: Profile) {
        self.current_profile = Some(profile);
        self.screen = Screen::Home {
            tab: ModuleCategory::NumbersLogic,
        };
    }

    pub(crate) fn pick_module(&mut self, module: ModuleType) {
        self.screen = Screen::ThemeSelect {
            module,
            theme_index: 0,
            difficulty: 3,
        };
    }

    /// Theme confirmed: spawn the generation request and move to the quiz
    /// screen in its loading phase.
    pub(crate) fn start_session(&mut self, module: ModuleType, theme: ThemeDef, difficulty: u8) {
        let Some(profile) = self.current_profile.clone() else {
            return;
        };
        self.next_session_id += 1;
        let session = ModuleSession::new(
            self.next_session_id,
            &profile,
            module,
            Some(theme),
            difficulty,
        );
        let api_key = Some(self.guardian.api_key.clone()).filter(|k| !k.trim().is_empty());
        let job = GenerateJob {
            session_id: session.id,
            api_key,
            age: profile.age,
            module,
            theme: Some(theme),
            difficulty,
        };
        // The engine thread outlives the UI; a send only fails at shutdown.
        let _ = self.cmd_tx.send(EngineCommand::GenerateModule(job));
        self.session = Some(session);
        self.screen = Screen::Quiz;
    }

    /// Leave the quiz back to the module grid. Disabled while a request is
    /// in flight; a reply for the abandoned session id is dropped.
    pub(crate) fn leave_quiz(&mut self) {
        let tab = self
            .session
            .take()
            .map(|s| s.module.category())
            .unwrap_or(ModuleCategory::NumbersLogic);
        self.screen = if self.current_profile.is_some() {
            Screen::Home { tab }
        } else {
            Screen::ProfileSelect
        };
    }

    pub(crate) fn submit_answers(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        let Some(summary) = session.submit() else {
            return;
        };
        self.progress.record_attempt(
            &session.profile_name,
            session.module,
            summary.score,
            summary.total,
        );
        if let Err(e) = self.store.save_progress(&self.progress) {
            warn!(%e, "could not save progress");
            self.status = Some("Progress could not be saved.".to_string());
        }
    }

    /* ---------- gated actions ---------- */

    pub(crate) fn request_settings(&mut self) {
        if self.pin_gate.is_none() && self.settings.is_none() {
            self.pin_gate = Some(PinGate::new(PendingAction::OpenSettings));
        }
    }

    pub(crate) fn request_exit_to_profiles(&mut self) {
        if self.math_gate.is_none() {
            self.math_gate = Some(MathGate::new(PendingAction::ExitToProfiles));
        }
    }

    pub(crate) fn request_profile_delete(&mut self, id: String) {
        if self.math_gate.is_none() {
            self.math_gate = Some(MathGate::new(PendingAction::DeleteProfile(id)));
        }
    }

    fn perform_action(&mut self, action: PendingAction) {
        match action {
            PendingAction::OpenSettings => {
                self.settings = Some(SettingsState::new(&self.guardian));
            }
            PendingAction::ExitToProfiles => {
                self.session = None;
                self.current_profile = None;
                self.screen = Screen::ProfileSelect;
            }
            PendingAction::DeleteProfile(id) => {
                self.profiles.retain(|p| p.id != id);
                self.save_profiles();
            }
        }
    }

    /* ---------- persistence helpers ---------- */

    pub(crate) fn save_profiles(&mut self) {
        if let Err(e) = self.store.save_profiles(&self.profiles) {
            warn!(%e, "could not save profiles");
            self.status = Some("Profiles could not be saved.".to_string());
        }
    }

    pub(crate) fn save_guardian(&mut self) {
        if let Err(e) = self.store.save_guardian(&self.guardian) {
            warn!(%e, "could not save guardian data");
            self.status = Some("Settings could not be saved.".to_string());
        }
    }

    /* ---------- engine replies ---------- */

    fn drain_engine_responses(&mut self) {
        while let Ok(response) = self.resp_rx.try_recv() {
            let Some(session) = &mut self.session else {
                continue;
            };
            match response {
                EngineResponse::ModuleReady {
                    session_id,
                    content,
                } if session_id == session.id => session.content_ready(content),
                EngineResponse::ModuleFailed {
                    session_id,
                    message,
                } if session_id == session.id => session.content_failed(message),
                // Replies for sessions the child already backed out of.
                _ => {}
            }
        }
    }

    fn draw_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("🪷 Bodhi");
                if let Some(profile) = &self.current_profile {
                    ui.label(format!("Welcome, {}!", profile.name));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙").on_hover_text("Settings (grown-ups)").clicked() {
                        self.request_settings();
                    }
                    if self.current_profile.is_some()
                        && ui
                            .button("🚪")
                            .on_hover_text("Switch profile (grown-ups)")
                            .clicked()
                    {
                        self.request_exit_to_profiles();
                    }
                });
            });
        });
    }

    fn draw_gates(&mut self, ctx: &egui::Context) {
        if let Some(mut gate) = self.math_gate.take() {
            match draw_math_gate(ctx, &mut gate) {
                GateVerdict::Passed => self.perform_action(gate.action),
                GateVerdict::Cancelled => {}
                _ => self.math_gate = Some(gate),
            }
        }

        if let Some(mut gate) = self.pin_gate.take() {
            match draw_pin_gate(ctx, &mut gate, &self.guardian.pin, &self.guardian.recovery) {
                GateVerdict::Passed => self.perform_action(gate.action),
                GateVerdict::PinReset(new_pin) => {
                    self.guardian.pin = new_pin;
                    self.save_guardian();
                    self.perform_action(gate.action);
                }
                GateVerdict::Cancelled => {}
                GateVerdict::Pending => self.pin_gate = Some(gate),
            }
        }
    }
}

impl eframe::App for BodhiApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        self.drain_engine_responses();

        // Engine replies arrive on a channel; keep polling while a request
        // is in flight so the loading screen picks them up promptly.
        if self.session.as_ref().is_some_and(|s| s.is_loading()) {
            ctx.request_repaint_after(Duration::from_millis(200));
        }

        match self.screen.clone() {
            Screen::Setup => {
                setup_screen::draw(ctx, self);
                return;
            }
            Screen::ProfileSelect => {
                self.draw_top_bar(ctx);
                profile_screen::draw(ctx, self);
            }
            Screen::Home { tab } => {
                self.draw_top_bar(ctx);
                home_screen::draw_home(ctx, self, tab);
            }
            Screen::ThemeSelect {
                module,
                theme_index,
                difficulty,
            } => {
                self.draw_top_bar(ctx);
                home_screen::draw_theme_select(ctx, self, module, theme_index, difficulty);
            }
            Screen::Quiz => {
                self.draw_top_bar(ctx);
                quiz_screen::draw(ctx, self);
            }
        }

        if self.settings.is_some() {
            settings_screen::draw(ctx, self);
        }

        self.draw_gates(ctx);
    }
}
