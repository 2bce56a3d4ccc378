use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::{check_id, ModelError};

/// Represents the effort classification of a task.
/// Stored in the `task.complexity` column as its display text.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    /// The stored value was not recognised.
    Unknown,
    Low,
    Medium,
    High,
}

/// Represents the completion state of a task.
/// Stored in the `task.status` column as its display text.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The stored value was not recognised.
    Unknown,
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In-Progress")]
    InProgress,
    Complete,
}

impl Complexity {
    /// Every variant a user may choose. `Unknown` is only produced by decoding.
    pub const SELECTABLE: [Complexity; 3] = [Complexity::Low, Complexity::Medium, Complexity::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Unknown => "Unknown",
            Complexity::Low => "Low",
            Complexity::Medium => "Medium",
            Complexity::High => "High",
        }
    }

    /// Tolerant decode used when reading rows: anything unrecognised becomes `Unknown`.
    pub fn decode(value: &str) -> Self {
        value.parse().unwrap_or(Complexity::Unknown)
    }
}

impl Status {
    pub const SELECTABLE: [Status; 3] = [Status::NotStarted, Status::InProgress, Status::Complete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unknown => "Unknown",
            Status::NotStarted => "Not Started",
            Status::InProgress => "In-Progress",
            Status::Complete => "Complete",
        }
    }

    /// Tolerant decode used when reading rows: anything unrecognised becomes `Unknown`.
    pub fn decode(value: &str) -> Self {
        value.parse().unwrap_or(Status::Unknown)
    }
}

/// Strict parse: only the selectable variants are accepted (case-insensitive).
impl FromStr for Complexity {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Complexity::SELECTABLE
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ModelError::InvalidComplexity(s.to_string()))
    }
}

/// Strict parse: only the selectable variants are accepted (case-insensitive).
impl FromStr for Status {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::SELECTABLE
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ModelError::InvalidStatus(s.to_string()))
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a due date given either as a date-time or as a bare date.
///
/// A bare date is taken to mean midnight at the start of that day.
pub fn parse_due_date(value: &str) -> Result<NaiveDateTime, ModelError> {
    let value = value.trim();
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ModelError::InvalidDueDate(value.to_string()))
}

/// A task belonging to a project, as stored in the `task` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: i32,
    project_id: i32,
    /// The name of the task. Unique within its project.
    pub name: String,
    pub brief_description: String,
    pub description: String,
    pub complexity: Complexity,
    pub due_date: NaiveDateTime,
    pub status: Status,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: 0,
            project_id: 0,
            name: String::new(),
            brief_description: String::new(),
            description: String::new(),
            complexity: Complexity::Low,
            due_date: Local::now().naive_local(),
            status: Status::NotStarted,
        }
    }
}

impl Task {
    /// Creates an unsaved task attached to `project_id`.
    pub fn new(project_id: i32) -> Result<Self, ModelError> {
        let mut task = Task::default();
        task.set_project_id(project_id)?;
        Ok(task)
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn set_id(&mut self, id: i32) -> Result<(), ModelError> {
        self.id = check_id("id", id)?;
        Ok(())
    }

    pub fn project_id(&self) -> i32 {
        self.project_id
    }

    pub fn set_project_id(&mut self, project_id: i32) -> Result<(), ModelError> {
        self.project_id = check_id("project_id", project_id)?;
        Ok(())
    }

    /// Sets the complexity from user input. `Unknown` and unrecognised text are rejected.
    pub fn set_complexity_str(&mut self, value: &str) -> Result<(), ModelError> {
        self.complexity = value.parse()?;
        Ok(())
    }

    /// Sets the status from user input. `Unknown` and unrecognised text are rejected.
    pub fn set_status_str(&mut self, value: &str) -> Result<(), ModelError> {
        self.status = value.parse()?;
        Ok(())
    }

    /// Sets the due date from a `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS` string.
    pub fn set_due_date_str(&mut self, value: &str) -> Result<(), ModelError> {
        self.due_date = parse_due_date(value)?;
        Ok(())
    }

    /// A task is past due when its due date has passed and it is not complete.
    pub fn is_past_due(&self) -> bool {
        self.is_past_due_at(Local::now().naive_local())
    }

    pub fn is_past_due_at(&self, now: NaiveDateTime) -> bool {
        self.due_date < now && self.status != Status::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn task_due(offset: Duration, status: Status) -> Task {
        let mut task = Task::new(1).unwrap();
        task.due_date = Local::now().naive_local() + offset;
        task.status = status;
        task
    }

    #[test]
    fn test_task_defaults() {
        let task = Task::new(3).unwrap();
        assert_eq!(task.id(), 0);
        assert_eq!(task.project_id(), 3);
        assert_eq!(task.complexity, Complexity::Low);
        assert_eq!(task.status, Status::NotStarted);
        assert!(Task::new(-3).is_err());
    }

    #[test]
    fn test_is_past_due() {
        assert!(task_due(Duration::days(-1), Status::InProgress).is_past_due());
        assert!(!task_due(Duration::days(-1), Status::Complete).is_past_due());
        assert!(!task_due(Duration::days(1), Status::NotStarted).is_past_due());
    }

    #[test]
    fn test_decode_is_tolerant() {
        assert_eq!(Complexity::decode("BOGUS"), Complexity::Unknown);
        assert_eq!(Complexity::decode("Medium"), Complexity::Medium);
        assert_eq!(Status::decode(""), Status::Unknown);
        assert_eq!(Status::decode("In-Progress"), Status::InProgress);
    }

    #[test]
    fn test_parse_is_strict() {
        assert_eq!("high".parse::<Complexity>(), Ok(Complexity::High));
        assert!("BOGUS".parse::<Complexity>().is_err());
        assert!("Unknown".parse::<Complexity>().is_err());
        assert_eq!("not started".parse::<Status>(), Ok(Status::NotStarted));
        assert!("Unknown".parse::<Status>().is_err());
        assert!("Done".parse::<Status>().is_err());
    }

    #[test]
    fn test_setters_reject_invalid_values() {
        let mut task = Task::new(1).unwrap();
        assert!(task.set_complexity_str("Extreme").is_err());
        assert_eq!(task.complexity, Complexity::Low);
        assert!(task.set_status_str("Complete").is_ok());
        assert_eq!(task.status, Status::Complete);
    }

    #[test]
    fn test_parse_due_date() {
        let date_only = parse_due_date("2024-03-15").unwrap();
        assert_eq!(date_only.to_string(), "2024-03-15 00:00:00");

        let date_time = parse_due_date("2024-03-15 13:45:00").unwrap();
        assert_eq!(date_time.to_string(), "2024-03-15 13:45:00");

        let html_local = parse_due_date("2024-03-15T13:45:00").unwrap();
        assert_eq!(html_local, date_time);

        assert!(parse_due_date("15/03/2024").is_err());
        assert!(parse_due_date("").is_err());
    }

    #[test]
    fn test_enum_serialization_uses_display_text() {
        assert_eq!(
            serde_json::to_value(Status::InProgress).unwrap(),
            serde_json::json!("In-Progress")
        );
        assert_eq!(Status::NotStarted.to_string(), "Not Started");
        assert_eq!(
            serde_json::to_value(Complexity::High).unwrap(),
            serde_json::json!("High")
        );
    }
}
