//! Study task record and creation request.
//!
//! Rows written by earlier revisions may lack `category`, `priority`,
//! `subject` or even `completed`; those fields default on decode instead of
//! failing the whole fetch.

use std::fmt;
use std::str::FromStr;

use serde::de::Deserializer;
use serde::{Deserialize, Serialize, Serializer};

use super::date::TaskDate;
use super::ids::{OwnerId, TaskId};

/// Kind of study work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    #[serde(alias = "teoria")]
    Theory,
    #[serde(alias = "exercicio")]
    Exercise,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Theory, Category::Exercise];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Theory => "theory",
            Category::Exercise => "exercise",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "theory" | "teoria" => Ok(Category::Theory),
            "exercise" | "exercicio" => Ok(Category::Exercise),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "alta")]
    High,
    #[default]
    #[serde(alias = "media")]
    Medium,
    #[serde(alias = "baixa")]
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "alta" => Ok(Priority::High),
            "medium" | "media" => Ok(Priority::Medium),
            "low" | "baixa" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// Optional subject label.
///
/// On the wire this is a nullable text column: `null`, a missing field and an
/// empty string all mean `Unspecified`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Subject {
    #[default]
    Unspecified,
    Named(String),
}

impl Subject {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        if label.trim().is_empty() {
            Subject::Unspecified
        } else {
            Subject::Named(label)
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Subject::Unspecified => None,
            Subject::Named(s) => Some(s),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("unspecified"))
    }
}

impl Serialize for Subject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.label().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Subject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.map(Subject::new).unwrap_or_default())
    }
}

/// A persisted study task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub owner: OwnerId,
    pub title: String,

    /// Absent dates are never due.
    #[serde(default)]
    pub date: Option<TaskDate>,

    #[serde(default)]
    pub category: Category,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub subject: Subject,

    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn is_on(&self, day: &TaskDate) -> bool {
        self.date.as_ref() == Some(day)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("date is required")]
    MissingDate,

    #[error(transparent)]
    Date(#[from] super::date::DateError),
}

/// Creation request: everything but the store-assigned id and the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub date: Option<TaskDate>,
    pub category: Category,
    pub priority: Priority,
    pub subject: Subject,
}

impl NewTask {
    pub fn new(title: impl Into<String>, date: TaskDate) -> Self {
        Self {
            title: title.into(),
            date: Some(date),
            category: Category::default(),
            priority: Priority::default(),
            subject: Subject::Unspecified,
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn subject(mut self, subject: Subject) -> Self {
        self.subject = subject;
        self
    }

    /// Reject the request before it reaches the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let date = self.date.as_ref().ok_or(ValidationError::MissingDate)?;
        if date.as_str().trim().is_empty() {
            return Err(ValidationError::MissingDate);
        }
        TaskDate::parse(date.as_str())?;
        Ok(())
    }
}
