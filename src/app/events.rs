use uuid::Uuid;

use crate::capture::EncodedImage;
use crate::domain::AnalysisResult;
use crate::error::AnalysisError;

/// Everything that can change [`AppState`](crate::app::AppState). Emitted by
/// view callbacks and by the analysis bridge; applied in order on the UI
/// thread.
#[derive(Debug)]
pub enum AppEvent {
    /// Home → Camera for a fresh selfie.
    OpenCamera,
    /// Home → Trending catalog.
    OpenTrending,
    /// Back navigation from any non-Home screen.
    GoHome,
    /// Camera overlay button: none ⇄ generic grid.
    ToggleOverlay,
    /// Camera shortcut to the previous result, if one exists.
    ShowResults,
    /// Result/Failed → Camera, nothing pre-selected.
    Retake,
    /// A pose was picked from the results or the trending catalog.
    PoseChosen { title: String },
    /// Capture or upload completed; the analysis call is already in flight
    /// under `token`.
    ImageCaptured { token: Uuid, image: EncodedImage },
    /// The analysis call under `token` came back.
    AnalysisResolved {
        token: Uuid,
        result: Result<AnalysisResult, AnalysisError>,
    },
}
