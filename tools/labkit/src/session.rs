//! Session commands: favorites and lesson progress

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use lab_calc::LabTool;
use lab_session::{Favorites, JsonFileStateStore, LessonProgress, ProgressAction, ProgressTracker};
use serde::Serialize;

use crate::output::{field, heading, yes_no, Output};

#[derive(Debug, Subcommand)]
pub enum FavoritesCommands {
    /// List favorite tools
    List,

    /// Add or remove a tool from favorites
    Toggle {
        /// Tool slug, see `labkit list`
        tool: LabTool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProgressCommands {
    /// Show saved progress for a lesson
    Show {
        lesson: String,

        /// Number of sections in the lesson, for the completion percentage
        #[arg(long)]
        sections: Option<usize>,
    },

    /// Apply an action given as JSON, e.g. '{"type":"complete_section","section":2}'
    Apply { lesson: String, action: String },
}

#[derive(Debug, Serialize)]
struct FavoriteToggle {
    tool: LabTool,
    favorite: bool,
}

pub async fn favorites(out: &Output, store: JsonFileStateStore, cmd: FavoritesCommands) -> Result<()> {
    let favorites = Favorites::new(store);
    match cmd {
        FavoritesCommands::List => {
            let tools = favorites.list().await?;
            out.emit(&tools, |tools| render_favorites(tools))
        },
        FavoritesCommands::Toggle { tool } => {
            let favorite = favorites.toggle(tool).await?;
            out.emit(&FavoriteToggle { tool, favorite }, |t| {
                let (verb, preposition) = if t.favorite {
                    ("Added", "to")
                } else {
                    ("Removed", "from")
                };
                format!("{} {} {} favorites", verb, t.tool.slug().bright_yellow(), preposition)
            })
        },
    }
}

pub fn render_favorites(tools: &[LabTool]) -> String {
    if tools.is_empty() {
        return "No favorites yet".dimmed().to_string();
    }
    let mut lines = vec![heading("Favorites")];
    for tool in tools {
        lines.push(format!("  ★ {:<20} {}", tool.slug(), tool.title()));
    }
    lines.join("\n")
}

pub async fn progress(out: &Output, store: JsonFileStateStore, cmd: ProgressCommands) -> Result<()> {
    match cmd {
        ProgressCommands::Show { lesson, sections } => {
            let tracker = ProgressTracker::load(store, &lesson).await?;
            out.emit(tracker.state(), |state| render_progress(state, sections))
        },
        ProgressCommands::Apply { lesson, action } => {
            let action: ProgressAction = serde_json::from_str(&action)
                .with_context(|| format!("Invalid progress action: {}", action))?;
            let mut tracker = ProgressTracker::load(store, &lesson).await?;
            let state = tracker.apply(action).await?;
            out.emit(state, |state| render_progress(state, None))
        },
    }
}

pub fn render_progress(state: &LessonProgress, sections: Option<usize>) -> String {
    let completed: Vec<String> = state
        .completed_sections
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut lines = vec![
        heading(&format!("Lesson {}", state.lesson_id)),
        field("Current section", state.current_section),
        field(
            "Completed sections",
            if completed.is_empty() {
                "none".to_string()
            } else {
                completed.join(", ")
            },
        ),
        field("Time spent", format!("{} s", state.time_spent_secs)),
        field("Lesson complete", yes_no(state.completed)),
    ];
    if let Some(total) = sections {
        lines.push(field(
            "Progress",
            format!("{:.0} %", state.percent_complete(total)),
        ));
    }
    for (quiz, score) in &state.quiz_scores {
        lines.push(field(&format!("Quiz {}", quiz), format!("{}/100", score)));
    }
    if let Some(updated) = state.updated_at {
        lines.push(field("Updated", updated.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    lines.join("\n")
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use lab_session::reduce;

    #[test]
    fn test_render_progress() {
        colored::control::set_override(false);
        let state = [
            ProgressAction::CompleteSection { section: 0 },
            ProgressAction::CompleteSection { section: 1 },
            ProgressAction::RecordQuizScore {
                quiz: "intro".to_string(),
                score: 90,
            },
        ]
        .iter()
        .fold(LessonProgress::new("chem-1"), |s, a| reduce(s, a));

        let text = render_progress(&state, Some(4));
        assert!(text.contains("Lesson chem-1"));
        assert!(text.contains("0, 1"));
        assert!(text.contains("50 %"));
        assert!(text.contains("90/100"));
    }

    #[test]
    fn test_render_favorites_empty() {
        colored::control::set_override(false);
        assert_eq!(render_favorites(&[]), "No favorites yet");
    }

    #[tokio::test]
    async fn test_progress_apply_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let out = Output::new(true);

        progress(
            &out,
            JsonFileStateStore::new(&path),
            ProgressCommands::Apply {
                lesson: "l1".to_string(),
                action: r#"{"type":"go_to_section","section":3}"#.to_string(),
            },
        )
        .await
        .unwrap();

        let tracker = ProgressTracker::load(JsonFileStateStore::new(&path), "l1")
            .await
            .unwrap();
        assert_eq!(tracker.state().current_section, 3);
    }

    #[tokio::test]
    async fn test_progress_apply_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let result = progress(
            &Output::new(true),
            JsonFileStateStore::new(dir.path().join("state.json")),
            ProgressCommands::Apply {
                lesson: "l1".to_string(),
                action: r#"{"type":"fly"}"#.to_string(),
            },
        )
        .await;
        assert!(result.is_err());
    }
}
