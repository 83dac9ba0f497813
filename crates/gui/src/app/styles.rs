//! Application style configuration

use eframe::egui;
use egui::Color32;

/// Pane background
pub const PANE_FILL: Color32 = Color32::from_rgb(0x0a, 0x0a, 0x0a);
/// Pane borders and separators
pub const BORDER: Color32 = Color32::from_rgb(0x1f, 0x1f, 0x1f);
/// Chat bubble for the user's turns
pub const USER_BUBBLE: Color32 = Color32::from_rgb(0x1e, 0x33, 0x5c);
/// Chat bubble for generated code
pub const ASSISTANT_BUBBLE: Color32 = Color32::from_rgb(0x14, 0x14, 0x14);
pub const TEXT: Color32 = Color32::from_rgb(0xe4, 0xe4, 0xe7);
pub const TEXT_WEAK: Color32 = Color32::from_rgb(0x71, 0x71, 0x7a);
pub const ERROR_FILL: Color32 = Color32::from_rgba_premultiplied(0x41, 0x0a, 0x0a, 0xcc);
pub const ERROR_STROKE: Color32 = Color32::from_rgb(0x9f, 0x2d, 0x2d);
pub const ERROR_TEXT: Color32 = Color32::from_rgb(0xfe, 0xca, 0xca);

/// Configure initial application styles with given font size
pub fn configure_styles(ctx: &egui::Context, font_size: f32) {
    let mut style = (*ctx.style()).clone();

    // Near-black theme
    style.visuals = egui::Visuals::dark();
    style.visuals.panel_fill = PANE_FILL;
    style.visuals.window_fill = ASSISTANT_BUBBLE;
    style.visuals.extreme_bg_color = Color32::BLACK;
    style.visuals.override_text_color = Some(TEXT);
    style.visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, BORDER);
    style.visuals.selection.bg_fill = Color32::from_rgb(0x25, 0x63, 0xeb);

    // Rounding
    style.visuals.window_corner_radius = egui::CornerRadius::same(6);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(4);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(4);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(4);

    // Spacing
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 4.0);

    apply_text_styles(&mut style, font_size);

    ctx.set_style(style);
}

/// Apply font size to all text styles
pub fn apply_font_size(ctx: &egui::Context, font_size: f32) {
    let mut style = (*ctx.style()).clone();
    apply_text_styles(&mut style, font_size);
    ctx.set_style(style);
}

fn apply_text_styles(style: &mut egui::Style, font_size: f32) {
    let sizes = [
        (egui::TextStyle::Body, egui::FontId::proportional(font_size)),
        (egui::TextStyle::Button, egui::FontId::proportional(font_size * 0.9)),
        (egui::TextStyle::Small, egui::FontId::proportional(font_size * 0.8)),
        (egui::TextStyle::Heading, egui::FontId::proportional(font_size * 1.2)),
        (egui::TextStyle::Monospace, egui::FontId::monospace(font_size * 0.95)),
    ];
    for (text_style, font) in sizes {
        style.text_styles.insert(text_style, font);
    }
}
