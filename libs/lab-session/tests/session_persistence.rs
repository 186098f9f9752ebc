//! Session state surviving a restart through the JSON file store

#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use lab_calc::LabTool;
use lab_session::state::progress_key;
use lab_session::{Favorites, JsonFileStateStore, ProgressAction, ProgressTracker, StateStore};
use std::sync::Arc;

#[tokio::test]
async fn favorites_and_progress_share_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    {
        let store = Arc::new(JsonFileStateStore::new(&path));
        let favorites = Favorites::new(Arc::clone(&store));
        favorites.toggle(LabTool::TruthTable).await.unwrap();
        favorites.toggle(LabTool::MolarMass).await.unwrap();

        let mut tracker = ProgressTracker::load(Arc::clone(&store), "logic-1")
            .await
            .unwrap();
        tracker
            .apply(ProgressAction::RecordQuizScore {
                quiz: "intro".to_string(),
                score: 85,
            })
            .await
            .unwrap();
        tracker
            .apply(ProgressAction::AddTimeSpent { secs: 120 })
            .await
            .unwrap();
    }

    let store = Arc::new(JsonFileStateStore::new(&path));
    let favorites = Favorites::new(Arc::clone(&store));
    assert_eq!(
        favorites.list().await.unwrap(),
        vec![LabTool::MolarMass, LabTool::TruthTable]
    );

    let tracker = ProgressTracker::load(Arc::clone(&store), "logic-1")
        .await
        .unwrap();
    assert_eq!(tracker.state().quiz_scores["intro"], 85);
    assert_eq!(tracker.state().time_spent_secs, 120);

    assert!(store.get(&progress_key("logic-1")).await.unwrap().is_some());
    assert!(store.get(&progress_key("other")).await.unwrap().is_none());
}
