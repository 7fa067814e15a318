use serde::{Deserialize, Serialize};

/// On-screen capture guide shown over the live camera feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Overlay {
    /// Rule-of-thirds framing grid.
    Generic,
    /// Hand-and-face positioning guide.
    HandFace,
    /// Side-profile silhouette guide.
    SideProfile,
}

impl Overlay {
    /// Picks a guide for a chosen pose by keyword-matching its title.
    ///
    /// "hand" wins over "profile"/"side" when both appear; anything else
    /// falls back to the generic grid.
    pub fn for_pose_title(title: &str) -> Self {
        let title = title.to_lowercase();
        if title.contains("hand") {
            Self::HandFace
        } else if title.contains("profile") || title.contains("side") {
            Self::SideProfile
        } else {
            Self::Generic
        }
    }
}
