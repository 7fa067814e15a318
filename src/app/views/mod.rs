//! Presentation layer: render functions of the current [`AppState`] only.
//!
//! Views trigger no state changes themselves; user input is collected as
//! [`AppEvent`]s (plus [`CameraAction`]s for acquisition, which needs the
//! shell's camera/upload machinery) and applied after rendering.

pub mod analysis_view;
pub mod camera_view;
pub mod home_view;
pub mod trending_view;

pub use camera_view::CameraAction;

use crate::app::AppEvent;
use egui::{Color32, RichText};

/// Sticky-header back button shared by the Analysis and Trending screens.
pub(crate) fn header_with_back(ui: &mut egui::Ui, title: &str, events: &mut Vec<AppEvent>) {
    ui.horizontal(|ui| {
        if ui
            .button(RichText::new("‹").size(22.0))
            .on_hover_text("Back to home")
            .clicked()
        {
            events.push(AppEvent::GoHome);
        }
        ui.heading(title);
    });
    ui.separator();
}

pub(crate) fn accent() -> Color32 {
    Color32::from_rgb(236, 72, 153)
}
