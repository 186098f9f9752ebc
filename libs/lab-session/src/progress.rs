//! Lesson progress
//!
//! [`reduce`] is a pure state transition over [`LessonProgress`]; the
//! [`ProgressTracker`] wraps it and saves every new state through the
//! persistence port.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::error::Result;
use crate::state::{load_json, progress_key, save_json, StateStore};

/// Highest quiz score
pub const MAX_QUIZ_SCORE: u8 = 100;

/// Progress through one lesson
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub lesson_id: String,
    /// Section the student is currently viewing (zero-based)
    pub current_section: usize,
    pub completed_sections: BTreeSet<usize>,
    /// Best score per quiz, 0..=100
    pub quiz_scores: BTreeMap<String, u8>,
    pub time_spent_secs: u64,
    pub completed: bool,
    /// Set by the tracker on save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LessonProgress {
    pub fn new(lesson_id: impl Into<String>) -> Self {
        Self {
            lesson_id: lesson_id.into(),
            ..Self::default()
        }
    }

    /// Share of `total_sections` completed, in percent
    pub fn percent_complete(&self, total_sections: usize) -> f64 {
        if self.completed {
            return 100.0;
        }
        if total_sections == 0 {
            return 0.0;
        }
        let done = self
            .completed_sections
            .iter()
            .filter(|s| **s < total_sections)
            .count();
        done as f64 / total_sections as f64 * 100.0
    }

    /// Mean of recorded quiz scores
    pub fn average_quiz_score(&self) -> Option<f64> {
        if self.quiz_scores.is_empty() {
            return None;
        }
        let sum: u32 = self.quiz_scores.values().map(|s| u32::from(*s)).sum();
        Some(f64::from(sum) / self.quiz_scores.len() as f64)
    }
}

/// Progress transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressAction {
    /// Begin or resume a lesson; a different lesson starts from scratch
    StartLesson { lesson_id: String },
    GoToSection { section: usize },
    CompleteSection { section: usize },
    /// Keeps the best score per quiz; out-of-range scores are clamped
    RecordQuizScore { quiz: String, score: i64 },
    AddTimeSpent { secs: u64 },
    CompleteLesson,
    /// Clear all progress but keep the lesson id
    Reset,
}

/// Apply one action
pub fn reduce(state: LessonProgress, action: &ProgressAction) -> LessonProgress {
    match action {
        ProgressAction::StartLesson { lesson_id } => {
            if state.lesson_id == *lesson_id {
                state
            } else {
                LessonProgress::new(lesson_id.clone())
            }
        },
        ProgressAction::GoToSection { section } => LessonProgress {
            current_section: *section,
            ..state
        },
        ProgressAction::CompleteSection { section } => {
            let mut completed_sections = state.completed_sections;
            completed_sections.insert(*section);
            LessonProgress {
                completed_sections,
                ..state
            }
        },
        ProgressAction::RecordQuizScore { quiz, score } => {
            let score = (*score).clamp(0, i64::from(MAX_QUIZ_SCORE)) as u8;
            let mut quiz_scores = state.quiz_scores;
            let best = quiz_scores.entry(quiz.clone()).or_insert(score);
            *best = (*best).max(score);
            LessonProgress {
                quiz_scores,
                ..state
            }
        },
        ProgressAction::AddTimeSpent { secs } => LessonProgress {
            time_spent_secs: state.time_spent_secs.saturating_add(*secs),
            ..state
        },
        ProgressAction::CompleteLesson => LessonProgress {
            completed: true,
            ..state
        },
        ProgressAction::Reset => LessonProgress::new(state.lesson_id),
    }
}

// ============================================================================
// Tracker
// ============================================================================

/// Reducer plus auto-save
pub struct ProgressTracker<S: StateStore> {
    store: S,
    state: LessonProgress,
}

impl<S: StateStore> ProgressTracker<S> {
    /// Restore saved progress, or start fresh
    pub async fn load(store: S, lesson_id: &str) -> Result<Self> {
        let state = Self::restore(&store, lesson_id).await?;
        Ok(Self { store, state })
    }

    async fn restore(store: &S, lesson_id: &str) -> Result<LessonProgress> {
        let saved: Option<LessonProgress> = load_json(store, &progress_key(lesson_id)).await?;
        debug!(lesson = lesson_id, restored = saved.is_some(), "progress load");
        Ok(saved.unwrap_or_else(|| LessonProgress::new(lesson_id)))
    }

    pub fn state(&self) -> &LessonProgress {
        &self.state
    }

    /// Apply an action and save the result
    ///
    /// Starting a different lesson switches to that lesson's saved progress.
    pub async fn apply(&mut self, action: ProgressAction) -> Result<&LessonProgress> {
        let mut next = match &action {
            ProgressAction::StartLesson { lesson_id } if *lesson_id != self.state.lesson_id => {
                Self::restore(&self.store, lesson_id).await?
            },
            _ => reduce(self.state.clone(), &action),
        };
        next.updated_at = Some(Utc::now());

        save_json(&self.store, &progress_key(&next.lesson_id), &next).await?;
        info!(
            lesson = %next.lesson_id,
            section = next.current_section,
            completed = next.completed,
            "progress saved"
        );

        self.state = next;
        Ok(&self.state)
    }

    /// Delete the saved record and reset in memory
    pub async fn clear(&mut self) -> Result<()> {
        self.store.delete(&progress_key(&self.state.lesson_id)).await?;
        self.state = LessonProgress::new(self.state.lesson_id.clone());
        Ok(())
    }
}
