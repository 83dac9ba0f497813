use egui::Ui;
use shared::{ChatRole, ChatTurn};

use crate::app::styles;
use crate::intent::Intent;
use crate::state::chat::ASSISTANT_PREVIEW_CHARS;
use crate::state::AppState;

/// Chat pane: conversation history and compose box.
/// Returns the send intent when the user submits.
pub fn show(ui: &mut Ui, state: &mut AppState) -> Option<Intent> {
    let busy = state.orchestrator.is_busy();
    let mut intent = None;

    // Message history (scrollable)
    let compose_height = if state.orchestrator.last_error().is_some() { 110.0 } else { 80.0 };
    let scroll_height = (ui.available_height() - compose_height).max(60.0);
    egui::ScrollArea::vertical()
        .id_salt("chat_scroll")
        .max_height(scroll_height)
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            let turns = state.orchestrator.conversation();
            if turns.is_empty() {
                ui.add_space(40.0);
                ui.vertical_centered(|ui| {
                    ui.weak("Describe your 3D part or request changes.");
                    ui.weak("The conversation history will guide the model.");
                });
            }
            for turn in turns {
                show_turn(ui, turn);
            }
        });

    ui.separator();

    // Manual retry: paste the last error into the message
    if let Some(error) = state.orchestrator.last_error() {
        let button = egui::Button::new(
            egui::RichText::new("Include last error in message").color(styles::ERROR_TEXT),
        )
        .fill(styles::ERROR_FILL)
        .stroke(egui::Stroke::new(1.0, styles::ERROR_STROKE));
        if ui.add_sized([ui.available_width(), 24.0], button).clicked() {
            let error = error.to_string();
            state.chat.include_error(&error);
        }
    }

    // Input area
    ui.horizontal(|ui| {
        let input_id = ui.make_persistent_id("chat_input");
        let focused = ui.memory(|m| m.has_focus(input_id));

        // Enter sends, Shift+Enter inserts a newline
        let enter_sends = focused
            && ui.input(|i| {
                i.key_pressed(egui::Key::Enter) && !i.modifiers.shift && !i.modifiers.command
            });
        if enter_sends {
            ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Enter));
        }

        let available_w = ui.available_width() - 64.0;
        ui.add_enabled(
            !busy,
            egui::TextEdit::multiline(&mut state.chat.input)
                .id(input_id)
                .hint_text("Describe changes or paste errors...")
                .desired_rows(2)
                .desired_width(available_w.max(40.0)),
        );

        let can_send = !busy && !state.chat.input.trim().is_empty();
        let send_clicked = ui.add_enabled(can_send, egui::Button::new("Send")).clicked();

        if (send_clicked || enter_sends) && can_send {
            intent = state.chat.take_sendable().map(Intent::Send);
        }
    });

    intent
}

fn show_turn(ui: &mut Ui, turn: &ChatTurn) {
    let max_width = ui.available_width() * 0.85;
    match turn.role {
        ChatRole::User => {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                bubble(styles::USER_BUBBLE).show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.label(&turn.content);
                });
            });
        }
        ChatRole::Assistant => {
            bubble(styles::ASSISTANT_BUBBLE)
                .stroke(egui::Stroke::new(1.0, styles::BORDER))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.label(egui::RichText::new("Generated code").small().color(styles::TEXT_WEAK));
                    ui.label(egui::RichText::new(turn.preview(ASSISTANT_PREVIEW_CHARS)).monospace().small());
                });
        }
    }
    ui.add_space(4.0);
}

fn bubble(fill: egui::Color32) -> egui::Frame {
    egui::Frame::NONE
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::symmetric(10, 6))
}
