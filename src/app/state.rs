//! View state machine.
//!
//! One state bag, mutated only through [`AppState::apply`], so every
//! transition is deterministic and unit-testable without a rendering engine.

use uuid::Uuid;

use crate::app::AppEvent;
use crate::capture::EncodedImage;
use crate::domain::{AnalysisResult, Overlay};
use crate::error::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    Loading,
    Result,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Home,
    Camera,
    Analysis(AnalysisPhase),
    Trending,
}

pub struct AppState {
    pub view: AppView,
    /// Still owned by this session; replaced on each capture/upload.
    pub image: Option<EncodedImage>,
    /// True from capture/upload until the matching outcome lands. A result
    /// is never rendered while this is set.
    pub analyzing: bool,
    pub result: Option<AnalysisResult>,
    pub error: Option<AnalysisError>,
    pub overlay: Option<Overlay>,
    /// Token of the in-flight analysis call; outcomes with any other token
    /// are stale and dropped.
    in_flight: Option<Uuid>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: AppView::Home,
            image: None,
            analyzing: false,
            result: None,
            error: None,
            overlay: None,
            in_flight: None,
        }
    }
}

impl AppState {
    pub fn apply(&mut self, event: AppEvent) {
        tracing::debug!(view = ?self.view, ?event, "applying event");

        match event {
            AppEvent::OpenCamera => {
                self.image = None;
                self.overlay = None;
                self.view = AppView::Camera;
            }
            AppEvent::OpenTrending => {
                // Catalog is reachable from the landing screen only.
                if self.view == AppView::Home {
                    self.view = AppView::Trending;
                }
            }
            AppEvent::GoHome => {
                self.overlay = None;
                self.view = AppView::Home;
            }
            AppEvent::ToggleOverlay => {
                if self.view == AppView::Camera {
                    self.overlay = match self.overlay {
                        Some(_) => None,
                        None => Some(Overlay::Generic),
                    };
                }
            }
            AppEvent::ShowResults => {
                if self.result.is_some() && !self.analyzing {
                    self.view = AppView::Analysis(AnalysisPhase::Result);
                }
            }
            AppEvent::Retake => {
                self.image = None;
                self.overlay = None;
                self.view = AppView::Camera;
            }
            AppEvent::PoseChosen { title } => {
                self.image = None;
                self.overlay = Some(Overlay::for_pose_title(&title));
                self.view = AppView::Camera;
            }
            AppEvent::ImageCaptured { token, image } => {
                // Captures land only from the Camera screen; an upload that
                // finishes after the user backed out must not hijack the
                // current view. Its outcome dies on the token check later.
                if self.view != AppView::Camera {
                    tracing::warn!(%token, "ignoring capture completed off the camera screen");
                    return;
                }
                // Flag first: nothing may render the previous result from
                // here until the matching outcome lands.
                self.analyzing = true;
                self.in_flight = Some(token);
                self.image = Some(image);
                self.error = None;
                self.overlay = None;
                self.view = AppView::Analysis(AnalysisPhase::Loading);
            }
            AppEvent::AnalysisResolved { token, result } => {
                if self.in_flight != Some(token) {
                    tracing::warn!(%token, "discarding stale analysis outcome");
                    return;
                }
                self.in_flight = None;
                self.analyzing = false;

                let phase = match result {
                    Ok(result) => {
                        self.result = Some(result);
                        self.error = None;
                        AnalysisPhase::Result
                    }
                    Err(e) => {
                        self.error = Some(e);
                        AnalysisPhase::Failed
                    }
                };

                // Follow the analysis screen only if the user is still on it.
                if self.view == AppView::Analysis(AnalysisPhase::Loading) {
                    self.view = AppView::Analysis(phase);
                }
            }
        }
    }

    /// The result, but only when it is legitimate to show one.
    pub fn displayable_result(&self) -> Option<&AnalysisResult> {
        if self.analyzing {
            return None;
        }
        self.result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Difficulty, FaceShape, PoseSuggestion};

    fn stub_image() -> EncodedImage {
        EncodedImage::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00]).unwrap()
    }

    fn suggestion(title: &str) -> PoseSuggestion {
        PoseSuggestion {
            title: title.to_string(),
            description: "d".to_string(),
            difficulty: Difficulty::Easy,
            best_angle: "eye level".to_string(),
            tags: vec![],
        }
    }

    fn round_result() -> AnalysisResult {
        AnalysisResult {
            face_shape: FaceShape::Round,
            reasoning: "r".to_string(),
            best_lighting: "l".to_string(),
            pose_suggestions: vec![suggestion("Hand on Chin"), suggestion("Chin Forward")],
        }
    }

    fn captured(state: &mut AppState) -> Uuid {
        state.apply(AppEvent::OpenCamera);
        let token = Uuid::new_v4();
        state.apply(AppEvent::ImageCaptured {
            token,
            image: stub_image(),
        });
        token
    }

    #[test]
    fn capture_enters_loading_synchronously() {
        let mut state = AppState::default();
        state.apply(AppEvent::OpenCamera);
        captured(&mut state);

        assert_eq!(state.view, AppView::Analysis(AnalysisPhase::Loading));
        assert!(state.analyzing);
        assert!(state.displayable_result().is_none());
    }

    #[test]
    fn analyzing_flag_and_rendered_result_are_mutually_exclusive() {
        let mut state = AppState::default();
        let token = captured(&mut state);
        state.apply(AppEvent::AnalysisResolved {
            token,
            result: Ok(round_result()),
        });

        // Result is now visible, flag down.
        assert!(!state.analyzing);
        assert!(state.displayable_result().is_some());

        // New capture raises the flag before anything else; the stale result
        // must not be displayable even though it is still stored.
        captured(&mut state);
        assert!(state.analyzing);
        assert!(state.result.is_some());
        assert!(state.displayable_result().is_none());
    }

    #[test]
    fn successful_analysis_lands_in_result_phase() {
        let mut state = AppState::default();
        let token = captured(&mut state);
        state.apply(AppEvent::AnalysisResolved {
            token,
            result: Ok(round_result()),
        });

        assert_eq!(state.view, AppView::Analysis(AnalysisPhase::Result));
        let result = state.displayable_result().unwrap();
        assert_eq!(result.face_shape, FaceShape::Round);
        let titles: Vec<_> = result
            .pose_suggestions
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, ["Hand on Chin", "Chin Forward"]);
    }

    #[test]
    fn failed_analysis_lands_in_failed_phase_never_result() {
        let mut state = AppState::default();
        let token = captured(&mut state);
        state.apply(AppEvent::AnalysisResolved {
            token,
            result: Err(AnalysisError::MalformedResponse("bad".to_string())),
        });

        assert_eq!(state.view, AppView::Analysis(AnalysisPhase::Failed));
        assert!(!state.analyzing);
        assert!(state.error.is_some());
        assert!(state.displayable_result().is_none());
    }

    #[test]
    fn stale_outcome_is_discarded() {
        let mut state = AppState::default();
        let first = captured(&mut state);
        // User bails out mid-analysis and shoots again.
        state.apply(AppEvent::Retake);
        let second = captured(&mut state);

        // First call resolves after the second was submitted: ignored.
        state.apply(AppEvent::AnalysisResolved {
            token: first,
            result: Ok(round_result()),
        });
        assert!(state.analyzing);
        assert_eq!(state.view, AppView::Analysis(AnalysisPhase::Loading));

        state.apply(AppEvent::AnalysisResolved {
            token: second,
            result: Ok(round_result()),
        });
        assert!(!state.analyzing);
        assert_eq!(state.view, AppView::Analysis(AnalysisPhase::Result));
    }

    #[test]
    fn capture_completing_after_back_navigation_is_ignored() {
        let mut state = AppState::default();
        state.apply(AppEvent::OpenCamera);
        state.apply(AppEvent::GoHome);

        // An upload kicked off on the camera screen finishes late.
        state.apply(AppEvent::ImageCaptured {
            token: Uuid::new_v4(),
            image: stub_image(),
        });

        assert_eq!(state.view, AppView::Home);
        assert!(!state.analyzing);
        assert!(state.image.is_none());
    }

    #[test]
    fn retake_returns_to_camera_with_no_overlay() {
        let mut state = AppState::default();
        let token = captured(&mut state);
        state.apply(AppEvent::AnalysisResolved {
            token,
            result: Ok(round_result()),
        });

        state.apply(AppEvent::Retake);
        assert_eq!(state.view, AppView::Camera);
        assert!(state.overlay.is_none());
        assert!(state.image.is_none());
    }

    #[test]
    fn choosing_a_pose_preselects_the_matching_overlay() {
        let mut state = AppState::default();
        let token = captured(&mut state);
        state.apply(AppEvent::AnalysisResolved {
            token,
            result: Ok(round_result()),
        });

        let first_title = state.displayable_result().unwrap().pose_suggestions[0]
            .title
            .clone();
        state.apply(AppEvent::PoseChosen { title: first_title });

        assert_eq!(state.view, AppView::Camera);
        assert_eq!(state.overlay, Some(Overlay::HandFace));
    }

    #[test]
    fn back_navigation_always_reaches_home_and_drops_the_overlay() {
        for setup in [AppEvent::OpenCamera, AppEvent::OpenTrending] {
            let mut state = AppState::default();
            state.apply(setup);
            state.apply(AppEvent::PoseChosen {
                title: "Soft Side Profile".to_string(),
            });
            assert!(state.overlay.is_some());

            state.apply(AppEvent::GoHome);
            assert_eq!(state.view, AppView::Home);
            assert!(state.overlay.is_none());
        }
    }

    #[test]
    fn trending_is_reachable_from_home_only() {
        let mut state = AppState::default();
        state.apply(AppEvent::OpenCamera);
        state.apply(AppEvent::OpenTrending);
        assert_eq!(state.view, AppView::Camera);

        state.apply(AppEvent::GoHome);
        state.apply(AppEvent::OpenTrending);
        assert_eq!(state.view, AppView::Trending);
    }

    #[test]
    fn overlay_toggle_cycles_between_none_and_generic() {
        let mut state = AppState::default();
        state.apply(AppEvent::OpenCamera);

        state.apply(AppEvent::ToggleOverlay);
        assert_eq!(state.overlay, Some(Overlay::Generic));
        state.apply(AppEvent::ToggleOverlay);
        assert_eq!(state.overlay, None);
    }

    #[test]
    fn results_shortcut_needs_a_result_and_no_analysis_in_flight() {
        let mut state = AppState::default();
        state.apply(AppEvent::OpenCamera);
        state.apply(AppEvent::ShowResults);
        assert_eq!(state.view, AppView::Camera);

        let token = captured(&mut state);
        state.apply(AppEvent::AnalysisResolved {
            token,
            result: Ok(round_result()),
        });
        state.apply(AppEvent::Retake);
        state.apply(AppEvent::ShowResults);
        assert_eq!(state.view, AppView::Analysis(AnalysisPhase::Result));
    }
}
