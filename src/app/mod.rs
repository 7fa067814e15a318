mod events;
mod shell;
mod state;
pub mod views;

pub use events::AppEvent;
pub use shell::PoseGenieApp;
pub use state::{AnalysisPhase, AppState, AppView};
