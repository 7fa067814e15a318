use std::sync::OnceLock;

use crate::domain::TrendingPose;

static CATALOG: OnceLock<Vec<TrendingPose>> = OnceLock::new();

/// The built-in trending pose catalog, parsed once on first access.
pub fn trending_poses() -> &'static [TrendingPose] {
    CATALOG.get_or_init(|| {
        serde_json::from_str(include_str!("../assets/trending.json"))
            .expect("embedded trending catalog must parse")
    })
}
