use egui::RichText;

use crate::app::views::{accent, header_with_back};
use crate::app::AppEvent;
use crate::catalog;

pub fn draw(ui: &mut egui::Ui, events: &mut Vec<AppEvent>) {
    header_with_back(ui, "Trending Poses", events);

    egui::ScrollArea::vertical().show(ui, |ui| {
        for pose in catalog::trending_poses() {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&pose.title).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(&pose.category).small().color(accent()));
                    });
                });
                ui.label(&pose.description);
                if ui.button("Try this pose").clicked() {
                    events.push(AppEvent::PoseChosen {
                        title: pose.title.clone(),
                    });
                }
            });
            ui.add_space(4.0);
        }
    });
}
