//! Daily habits.
//!
//! Each habit carries its own streak counter that moves by one whenever its
//! completion flag is toggled. That counter is not date-aware; the
//! date-aware day streak lives in [`crate::stats::HabitStats`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::daily::Language;
use crate::error::{CoreError, Result, ValidationError};

/// Goal given to newly created habits, in days.
pub const DEFAULT_TARGET_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitCategory {
    #[default]
    Health,
    Learning,
    Lifestyle,
    Mindfulness,
    Productivity,
}

impl HabitCategory {
    pub const ALL: [HabitCategory; 5] = [
        HabitCategory::Health,
        HabitCategory::Learning,
        HabitCategory::Lifestyle,
        HabitCategory::Mindfulness,
        HabitCategory::Productivity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HabitCategory::Health => "health",
            HabitCategory::Learning => "learning",
            HabitCategory::Lifestyle => "lifestyle",
            HabitCategory::Mindfulness => "mindfulness",
            HabitCategory::Productivity => "productivity",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            HabitCategory::Health => "red",
            HabitCategory::Learning => "green",
            HabitCategory::Lifestyle => "blue",
            HabitCategory::Mindfulness => "purple",
            HabitCategory::Productivity => "orange",
        }
    }
}

impl fmt::Display for HabitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| format!("unknown habit category: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: HabitCategory,
    pub color: String,
    #[serde(default)]
    pub streak: u32,
    /// Completed today.
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub target_days: Option<u32>,
}

impl Habit {
    /// Progress toward the target as a whole percentage, capped at 100.
    pub fn progress_pct(&self) -> Option<u32> {
        match self.target_days {
            Some(0) => Some(100),
            Some(target) => {
                let pct = u64::from(self.streak) * 100 / u64::from(target);
                Some(pct.min(100) as u32)
            }
            None => None,
        }
    }
}

/// Input for [`HabitList::add`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: HabitCategory,
}

impl HabitDraft {
    pub fn new(title: impl Into<String>, category: HabitCategory) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Result of flipping a habit's completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HabitToggle {
    pub completed: bool,
    pub streak: u32,
    /// True only on the incomplete -> complete transition.
    pub became_complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitList {
    habits: Vec<Habit>,
}

impl HabitList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starter set shown on first launch.
    pub fn starter(language: Language) -> Self {
        let seeds: [(&str, &str, &str, &str, HabitCategory); 5] = [
            (
                "Daily Exercise",
                "Exercise for at least 30 minutes",
                "تمرين يومي",
                "ممارسة الرياضة لمدة 30 دقيقة على الأقل",
                HabitCategory::Health,
            ),
            (
                "Read a Book",
                "Read at least 20 pages of a useful book",
                "قراءة كتاب",
                "قراءة 20 صفحة على الأقل من كتاب مفيد",
                HabitCategory::Learning,
            ),
            (
                "Drink Water",
                "Drink 8 glasses of water daily",
                "شرب الماء",
                "شرب 8 أكواب من الماء يومياً",
                HabitCategory::Lifestyle,
            ),
            (
                "Meditation",
                "Meditate for 10 minutes",
                "التأمل",
                "ممارسة التأمل لمدة 10 دقائق",
                HabitCategory::Mindfulness,
            ),
            (
                "Sleep Early",
                "Go to bed before 11 PM",
                "نوم مبكر",
                "النوم قبل الساعة 11 مساءً",
                HabitCategory::Lifestyle,
            ),
        ];

        let mut list = Self::new();
        for (en_title, en_desc, ar_title, ar_desc, category) in seeds {
            let (title, description) = match language {
                Language::En => (en_title, en_desc),
                Language::Ar => (ar_title, ar_desc),
            };
            list.habits.push(new_habit(
                HabitDraft::new(title, category).description(description),
            ));
        }
        list
    }

    pub fn iter(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.habits.iter().filter(|h| h.completed).count()
    }

    /// Append a new habit. An empty or whitespace-only title is rejected and
    /// nothing is added.
    pub fn add(&mut self, draft: HabitDraft) -> Result<&Habit> {
        if draft.title.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "title" }.into());
        }
        let habit = new_habit(draft);
        debug!(id = %habit.id, category = %habit.category, "habit added");
        let index = self.habits.len();
        self.habits.push(habit);
        Ok(&self.habits[index])
    }

    /// Flip today's completion. Completing adds one to the streak;
    /// un-completing takes one away, never going below zero.
    pub fn toggle(&mut self, id: &str) -> Result<HabitToggle> {
        let habit = self
            .habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| CoreError::not_found("habit", id))?;

        habit.completed = !habit.completed;
        habit.streak = if habit.completed {
            habit.streak.saturating_add(1)
        } else {
            habit.streak.saturating_sub(1)
        };
        debug!(id, completed = habit.completed, streak = habit.streak, "habit toggled");

        Ok(HabitToggle {
            completed: habit.completed,
            streak: habit.streak,
            became_complete: habit.completed,
        })
    }

    pub fn delete(&mut self, id: &str) -> Result<Habit> {
        let index = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| CoreError::not_found("habit", id))?;
        Ok(self.habits.remove(index))
    }
}

fn new_habit(draft: HabitDraft) -> Habit {
    Habit {
        id: Uuid::new_v4().to_string(),
        title: draft.title.trim().to_string(),
        description: draft.description,
        color: draft.category.color().to_string(),
        category: draft.category,
        streak: 0,
        completed: false,
        target_days: Some(DEFAULT_TARGET_DAYS),
    }
}
