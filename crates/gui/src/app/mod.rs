//! Main application module

mod keyboard;
mod menus;
pub mod styles;

use eframe::egui;
use tokio::runtime::Handle;

use crate::driver::Collaborators;
use crate::intent::Intent;
use crate::state::AppState;
use crate::ui::{chat_panel, editor_panel, status_bar};
use crate::viewport::ViewportPanel;
use crate::worker::GenerationWorker;

/// Main application
pub struct NfinitApp {
    state: AppState,
    viewport: ViewportPanel,
    worker: GenerationWorker,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl NfinitApp {
    pub fn new(cc: &eframe::CreationContext<'_>, handle: Handle, initial_code: Option<String>) -> Self {
        let mut state = AppState::default();
        if let Some(code) = initial_code {
            state.orchestrator.set_source(code);
        }

        // Apply initial styles with font size from settings
        styles::configure_styles(&cc.egui_ctx, state.settings.ui.font_size);

        let ctx = cc.egui_ctx.clone();
        let worker = GenerationWorker::new(handle, Collaborators::http(&state.settings))
            .with_repaint(move || ctx.request_repaint());

        tracing::info!(
            backend = %state.settings.backend_url,
            codegen = %state.settings.codegen_url,
            "Application started"
        );

        let last_font_size = state.settings.ui.font_size;
        Self {
            state,
            viewport: ViewportPanel::new(),
            worker,
            last_font_size,
        }
    }

    fn dispatch(&mut self, intent: Intent) {
        if let Some(effect) = self.state.dispatch(intent) {
            self.worker.spawn(effect);
        }
    }

    /// Drain finished collaborator calls and start any follow-up
    fn drain_completions(&mut self) {
        for completion in self.worker.poll() {
            if let Some(next) = self.state.apply_completion(completion) {
                self.worker.spawn(next);
            }
        }
    }
}

impl eframe::App for NfinitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        self.drain_completions();

        let mut intents = keyboard::handle_keyboard(ctx);

        egui::TopBottomPanel::top("command_bar")
            .exact_height(36.0)
            .show(ctx, |ui| {
                menus::command_bar(ui, &mut self.state);
            });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state);
            });

        egui::SidePanel::right("chat_panel")
            .default_width(340.0)
            .min_width(260.0)
            .resizable(true)
            .frame(egui::Frame::side_top_panel(&ctx.style()).fill(styles::PANE_FILL))
            .show(ctx, |ui| {
                intents.extend(chat_panel::show(ui, &mut self.state));
            });

        let layout = self.state.layout;
        if layout.shows_editor() && layout.shows_viewport() {
            egui::SidePanel::left("editor_panel")
                .default_width(ctx.screen_rect().width() * 0.33)
                .min_width(240.0)
                .resizable(true)
                .show(ctx, |ui| {
                    intents.extend(editor_panel::show(ui, &mut self.state));
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if layout.shows_viewport() {
                    intents.extend(self.viewport.show(ui, &mut self.state));
                } else {
                    egui::Frame::central_panel(&ctx.style()).show(ui, |ui| {
                        intents.extend(editor_panel::show(ui, &mut self.state));
                    });
                }
            });

        for intent in intents {
            self.dispatch(intent);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.teardown();
        tracing::info!("Session closed");
    }
}
