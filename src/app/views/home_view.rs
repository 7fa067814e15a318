use egui::RichText;

use crate::app::AppEvent;

pub fn draw(ui: &mut egui::Ui, events: &mut Vec<AppEvent>) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.18);

        ui.label(RichText::new("PoseGenie").size(36.0).strong());
        ui.add_space(8.0);
        ui.label("AI-powered face shape detection and personalized pose suggestions.");
        ui.add_space(32.0);

        if ui
            .button(RichText::new("  Take Selfie Analysis  ").size(18.0))
            .clicked()
        {
            events.push(AppEvent::OpenCamera);
        }
        ui.add_space(10.0);
        if ui
            .button(RichText::new("  Explore Trends  ").size(18.0))
            .clicked()
        {
            events.push(AppEvent::OpenTrending);
        }
    });

    ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
        ui.add_space(12.0);
        ui.label(RichText::new("Powered by Google Gemini 2.5 Flash").weak().small());
    });
}
