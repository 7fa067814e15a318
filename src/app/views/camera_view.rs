use egui::{pos2, vec2, Color32, Rect, RichText, Stroke, TextureHandle};

use crate::app::views::accent;
use crate::app::{AppEvent, AppState};
use crate::domain::Overlay;

/// Acquisition requests the shell must service (they need the camera feed
/// and the async file reader, which views do not own).
#[derive(Debug, PartialEq, Eq)]
pub enum CameraAction {
    Shutter,
    /// Raw upload-box contents; the shell decides whether it is a path
    /// or a pasted data URL.
    Upload(String),
}

pub fn draw(
    ui: &mut egui::Ui,
    state: &AppState,
    texture: Option<&TextureHandle>,
    capture_notice: Option<&str>,
    upload_path: &mut String,
    events: &mut Vec<AppEvent>,
) -> Option<CameraAction> {
    let mut action = None;

    // Top bar: back + overlay toggle.
    ui.horizontal(|ui| {
        if ui.button(RichText::new("‹").size(22.0)).clicked() {
            events.push(AppEvent::GoHome);
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let toggle_label = if state.overlay.is_some() {
                RichText::new("⊞ Guide").color(accent())
            } else {
                RichText::new("⊞ Guide")
            };
            if ui.button(toggle_label).clicked() {
                events.push(AppEvent::ToggleOverlay);
            }
        });
    });

    // Live feed, mirrored like a front camera preview.
    let feed_height = (ui.available_height() - 110.0).max(120.0);
    match texture {
        Some(texture) => {
            let mirrored_uv = Rect::from_min_max(pos2(1.0, 0.0), pos2(0.0, 1.0));
            let response = ui.add(
                egui::Image::new(texture)
                    .uv(mirrored_uv)
                    .fit_to_exact_size(vec2(ui.available_width(), feed_height)),
            );
            if let Some(overlay) = state.overlay {
                paint_overlay(ui, response.rect, overlay);
            }
        }
        None => {
            ui.allocate_ui(vec2(ui.available_width(), feed_height), |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("Waiting for camera…").weak());
                });
            });
        }
    }

    if let Some(notice) = capture_notice {
        ui.colored_label(Color32::LIGHT_RED, notice);
    }

    // Controls: upload, shutter, results shortcut.
    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label("Upload:");
        ui.add(
            egui::TextEdit::singleline(upload_path)
                .hint_text("image path or data: URL, or drop a file anywhere")
                .desired_width(220.0),
        );
        if ui.button("Open").clicked() && !upload_path.trim().is_empty() {
            action = Some(CameraAction::Upload(upload_path.trim().to_string()));
        }
    });

    ui.add_space(4.0);
    ui.vertical_centered(|ui| {
        if ui
            .add(egui::Button::new(RichText::new("◉").size(40.0)).min_size(vec2(72.0, 72.0)))
            .on_hover_text("Capture")
            .clicked()
        {
            action = Some(CameraAction::Shutter);
        }

        // Shortcut back to the previous result, mirrored from the web app's
        // sparkles button; hidden until a result exists.
        if state.displayable_result().is_some() && ui.button("✨ My Results").clicked() {
            events.push(AppEvent::ShowResults);
        }
    });

    action
}

fn paint_overlay(ui: &egui::Ui, rect: Rect, overlay: Overlay) {
    let painter = ui.painter_at(rect);
    let stroke = Stroke::new(1.5, Color32::from_white_alpha(140));
    let accent_stroke = Stroke::new(2.0, accent().gamma_multiply(0.8));

    match overlay {
        Overlay::Generic => {
            // Rule-of-thirds grid.
            for t in [1.0 / 3.0, 2.0 / 3.0] {
                let x = rect.left() + rect.width() * t;
                let y = rect.top() + rect.height() * t;
                painter.line_segment([pos2(x, rect.top()), pos2(x, rect.bottom())], stroke);
                painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], stroke);
            }
        }
        Overlay::HandFace => {
            // Head outline with a hand position marker near the chin.
            let head_center = rect.lerp_inside(vec2(0.5, 0.40));
            let head_radius = rect.height() * 0.20;
            painter.circle_stroke(head_center, head_radius, stroke);

            let hand_center = rect.lerp_inside(vec2(0.5, 0.66));
            painter.circle_stroke(hand_center, rect.height() * 0.07, accent_stroke);
            painter.line_segment(
                [
                    rect.lerp_inside(vec2(0.5, 0.73)),
                    rect.lerp_inside(vec2(0.62, 0.88)),
                ],
                accent_stroke,
            );
        }
        Overlay::SideProfile => {
            // Forehead-nose-chin polyline hugged to one vertical guide.
            let guide_x = rect.left() + rect.width() * 0.56;
            painter.line_segment(
                [pos2(guide_x, rect.top()), pos2(guide_x, rect.bottom())],
                stroke,
            );

            let profile: Vec<_> = [
                (0.52, 0.25),
                (0.58, 0.33),
                (0.56, 0.42),
                (0.63, 0.50),
                (0.55, 0.55),
                (0.57, 0.62),
                (0.50, 0.68),
            ]
            .iter()
            .map(|&(x, y)| rect.lerp_inside(vec2(x, y)))
            .collect();
            painter.add(egui::Shape::line(profile, accent_stroke));
        }
    }
}
