use egui::{Color32, RichText};

use crate::app::views::{accent, header_with_back};
use crate::app::{AnalysisPhase, AppEvent, AppState};
use crate::domain::{Difficulty, PoseSuggestion};

pub fn draw(ui: &mut egui::Ui, state: &AppState, phase: AnalysisPhase, events: &mut Vec<AppEvent>) {
    match phase {
        AnalysisPhase::Loading => draw_loading(ui),
        AnalysisPhase::Result => draw_result(ui, state, events),
        AnalysisPhase::Failed => draw_failed(ui, state, events),
    }
}

fn draw_loading(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.35);
        ui.add(egui::Spinner::new().size(48.0).color(accent()));
        ui.add_space(16.0);
        ui.label(RichText::new("Analyzing Face Shape…").size(22.0).strong());
        ui.label(RichText::new("Mapping landmarks and checking lighting conditions.").weak());
    });
}

fn draw_result(ui: &mut egui::Ui, state: &AppState, events: &mut Vec<AppEvent>) {
    header_with_back(ui, "My Results", events);

    let Some(result) = state.displayable_result() else {
        // Loading/Failed cover the other cases; landing here means the
        // result was consumed by a newer analysis. Send the user back.
        ui.label(RichText::new("No analysis yet.").weak());
        if ui.button("Take a selfie").clicked() {
            events.push(AppEvent::Retake);
        }
        return;
    };

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.group(|ui| {
            ui.label(RichText::new("Your Face Shape").weak().small());
            ui.label(
                RichText::new(result.face_shape.label())
                    .size(28.0)
                    .strong()
                    .color(accent()),
            );
            ui.add_space(4.0);
            ui.label(&result.reasoning);
            ui.add_space(6.0);
            ui.label(RichText::new("Lighting tip").weak().small());
            ui.label(&result.best_lighting);
        });

        ui.add_space(8.0);
        ui.label(RichText::new("Poses for you").strong());

        for suggestion in &result.pose_suggestions {
            draw_suggestion_card(ui, suggestion, events);
        }

        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            if ui.button("Retake Selfie").clicked() {
                events.push(AppEvent::Retake);
            }
        });
    });
}

fn draw_suggestion_card(ui: &mut egui::Ui, suggestion: &PoseSuggestion, events: &mut Vec<AppEvent>) {
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new(&suggestion.title).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(suggestion.difficulty.label())
                        .small()
                        .color(difficulty_color(suggestion.difficulty)),
                );
            });
        });
        ui.label(&suggestion.description);
        ui.label(
            RichText::new(format!("Best angle: {}", suggestion.best_angle))
                .weak()
                .small(),
        );
        if !suggestion.tags.is_empty() {
            ui.label(RichText::new(format!("#{}", suggestion.tags.join("  #"))).weak().small());
        }
        if ui.button("Try this pose").clicked() {
            events.push(AppEvent::PoseChosen {
                title: suggestion.title.clone(),
            });
        }
    });
    ui.add_space(4.0);
}

fn draw_failed(ui: &mut egui::Ui, state: &AppState, events: &mut Vec<AppEvent>) {
    header_with_back(ui, "Analysis Failed", events);

    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.2);
        ui.label(RichText::new("Something went wrong").size(22.0).strong());
        ui.add_space(8.0);
        if let Some(error) = &state.error {
            ui.colored_label(Color32::LIGHT_RED, error.to_string());
        }
        ui.add_space(16.0);
        if ui.button("Try Again").clicked() {
            events.push(AppEvent::Retake);
        }
    });
}

fn difficulty_color(difficulty: Difficulty) -> Color32 {
    match difficulty {
        Difficulty::Easy => Color32::from_rgb(74, 222, 128),
        Difficulty::Medium => Color32::from_rgb(250, 204, 21),
        Difficulty::Pro => Color32::from_rgb(248, 113, 113),
    }
}
