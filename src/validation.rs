//! Validation of submitted project, task and login forms.
//!
//! Every check runs, so a caller gets all problems with a submission at once.
//! Each field contributes at most one code, and the codes come back in field
//! order with the uniqueness check last. An empty list means the form is
//! valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::validate_length;

use crate::models::{parse_due_date, Complexity, ModelError, Project, Status, Task};

pub const PROJECT_NAME_MAX: u64 = 255;
pub const PROJECT_BRIEF_DESCRIPTION_MAX: u64 = 255;
pub const TASK_NAME_MAX: u64 = 50;
pub const TASK_BRIEF_DESCRIPTION_MAX: u64 = 50;
pub const TASK_DESCRIPTION_MAX: u64 = 1000;

/// Machine-readable reason a submission was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCode {
    NameBlank,
    NameLength,
    NameDuplicate,
    BriefDescriptionBlank,
    BriefDescriptionLength,
    DescriptionBlank,
    DescriptionLength,
    ComplexityBlank,
    ComplexityInvalid,
    DueDateBlank,
    DueDateInvalid,
    StatusBlank,
    StatusInvalid,
    UsernameBlank,
    PasswordBlank,
    UsernameNotExist,
    PasswordIncorrect,
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCode::NameBlank => "name_blank",
            ValidationCode::NameLength => "name_length",
            ValidationCode::NameDuplicate => "name_duplicate",
            ValidationCode::BriefDescriptionBlank => "brief_description_blank",
            ValidationCode::BriefDescriptionLength => "brief_description_length",
            ValidationCode::DescriptionBlank => "description_blank",
            ValidationCode::DescriptionLength => "description_length",
            ValidationCode::ComplexityBlank => "complexity_blank",
            ValidationCode::ComplexityInvalid => "complexity_invalid",
            ValidationCode::DueDateBlank => "due_date_blank",
            ValidationCode::DueDateInvalid => "due_date_invalid",
            ValidationCode::StatusBlank => "status_blank",
            ValidationCode::StatusInvalid => "status_invalid",
            ValidationCode::UsernameBlank => "username_blank",
            ValidationCode::PasswordBlank => "password_blank",
            ValidationCode::UsernameNotExist => "username_not_exist",
            ValidationCode::PasswordIncorrect => "password_incorrect",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Submitted project fields. A missing field counts as blank.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectForm {
    pub name: Option<String>,
    pub brief_description: Option<String>,
    pub description: Option<String>,
}

/// Submitted task fields, all as raw text. A missing field counts as blank.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskForm {
    pub name: Option<String>,
    pub brief_description: Option<String>,
    pub description: Option<String>,
    pub complexity: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
}

/// Submitted credentials.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

/// Blank wins over length.
fn check_text(
    value: &str,
    max: Option<u64>,
    blank: ValidationCode,
    too_long: ValidationCode,
) -> Option<ValidationCode> {
    if value.is_empty() {
        Some(blank)
    } else if !validate_length(value, None, max, None) {
        Some(too_long)
    } else {
        None
    }
}

/// Blank wins over a failed parse.
fn check_parse<T, E>(
    value: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
    blank: ValidationCode,
    invalid: ValidationCode,
) -> Option<ValidationCode> {
    if value.is_empty() {
        Some(blank)
    } else if parse(value).is_err() {
        Some(invalid)
    } else {
        None
    }
}

/// Validates a project submission.
///
/// `own_id` is the id of the project being edited (`0` for a new one), so
/// keeping a project's existing name is not reported as a duplicate.
pub fn validate_project(form: &ProjectForm, own_id: i32, existing: &[Project]) -> Vec<ValidationCode> {
    let name = text(&form.name);
    let name_error = check_text(
        name,
        Some(PROJECT_NAME_MAX),
        ValidationCode::NameBlank,
        ValidationCode::NameLength,
    );

    let mut errors: Vec<ValidationCode> = [
        name_error,
        check_text(
            text(&form.brief_description),
            Some(PROJECT_BRIEF_DESCRIPTION_MAX),
            ValidationCode::BriefDescriptionBlank,
            ValidationCode::BriefDescriptionLength,
        ),
        check_text(
            text(&form.description),
            None,
            ValidationCode::DescriptionBlank,
            ValidationCode::DescriptionLength,
        ),
    ]
    .into_iter()
    .flatten()
    .collect();

    if name_error.is_none()
        && existing
            .iter()
            .any(|project| project.name == name && project.id() != own_id)
    {
        errors.push(ValidationCode::NameDuplicate);
    }
    errors
}

/// Validates a task submission against the other tasks of the same project.
///
/// `own_id` is the id of the task being edited (`0` for a new one).
pub fn validate_task(form: &TaskForm, own_id: i32, siblings: &[Task]) -> Vec<ValidationCode> {
    let name = text(&form.name);
    let name_error = check_text(
        name,
        Some(TASK_NAME_MAX),
        ValidationCode::NameBlank,
        ValidationCode::NameLength,
    );

    let mut errors: Vec<ValidationCode> = [
        name_error,
        check_text(
            text(&form.brief_description),
            Some(TASK_BRIEF_DESCRIPTION_MAX),
            ValidationCode::BriefDescriptionBlank,
            ValidationCode::BriefDescriptionLength,
        ),
        check_text(
            text(&form.description),
            Some(TASK_DESCRIPTION_MAX),
            ValidationCode::DescriptionBlank,
            ValidationCode::DescriptionLength,
        ),
        check_parse(
            text(&form.complexity),
            |v| v.parse::<Complexity>(),
            ValidationCode::ComplexityBlank,
            ValidationCode::ComplexityInvalid,
        ),
        check_parse(
            text(&form.due_date),
            parse_due_date,
            ValidationCode::DueDateBlank,
            ValidationCode::DueDateInvalid,
        ),
        check_parse(
            text(&form.status),
            |v| v.parse::<Status>(),
            ValidationCode::StatusBlank,
            ValidationCode::StatusInvalid,
        ),
    ]
    .into_iter()
    .flatten()
    .collect();

    if name_error.is_none()
        && siblings
            .iter()
            .any(|task| task.name == name && task.id() != own_id)
    {
        errors.push(ValidationCode::NameDuplicate);
    }
    errors
}

/// Validates that both credentials were supplied.
pub fn validate_login(form: &LoginForm) -> Vec<ValidationCode> {
    let mut errors = Vec::new();
    if text(&form.username).is_empty() {
        errors.push(ValidationCode::UsernameBlank);
    }
    if text(&form.password).is_empty() {
        errors.push(ValidationCode::PasswordBlank);
    }
    errors
}

impl ProjectForm {
    /// Copies the submitted fields onto `project`. Call after validation passes.
    pub fn apply_to(&self, project: &mut Project) {
        project.name = text(&self.name).to_string();
        project.brief_description = text(&self.brief_description).to_string();
        project.description = text(&self.description).to_string();
    }
}

impl TaskForm {
    /// Copies the submitted fields onto `task` through its setters.
    /// Call after validation passes.
    pub fn apply_to(&self, task: &mut Task) -> Result<(), ModelError> {
        task.set_complexity_str(text(&self.complexity))?;
        task.set_due_date_str(text(&self.due_date))?;
        task.set_status_str(text(&self.status))?;
        task.name = text(&self.name).to_string();
        task.brief_description = text(&self.brief_description).to_string();
        task.description = text(&self.description).to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn project(id: i32, name: &str) -> Project {
        let mut project = Project::new(name, "brief", "description");
        project.set_id(id).unwrap();
        project
    }

    fn task(id: i32, project_id: i32, name: &str) -> Task {
        let mut task = Task::new(project_id).unwrap();
        task.set_id(id).unwrap();
        task.name = name.to_string();
        task
    }

    fn project_form(name: &str) -> ProjectForm {
        ProjectForm {
            name: Some(name.to_string()),
            brief_description: Some("Brief".to_string()),
            description: Some("Longer description".to_string()),
        }
    }

    fn task_form(name: &str) -> TaskForm {
        TaskForm {
            name: Some(name.to_string()),
            brief_description: Some("Brief".to_string()),
            description: Some("Longer description".to_string()),
            complexity: Some("Medium".to_string()),
            due_date: Some("2024-06-01".to_string()),
            status: Some("In-Progress".to_string()),
        }
    }

    #[test]
    fn test_valid_project() {
        let existing = vec![project(1, "Alpha")];
        assert!(validate_project(&project_form("Beta"), 0, &existing).is_empty());
    }

    #[test]
    fn test_project_blank_fields() {
        let errors = validate_project(&ProjectForm::default(), 0, &[]);
        assert_eq!(
            errors,
            vec![
                ValidationCode::NameBlank,
                ValidationCode::BriefDescriptionBlank,
                ValidationCode::DescriptionBlank,
            ]
        );

        let errors = validate_project(&project_form(""), 0, &[]);
        assert_eq!(errors, vec![ValidationCode::NameBlank]);
    }

    #[test]
    fn test_project_length_limits() {
        let at_limit = ProjectForm {
            name: Some("n".repeat(255)),
            brief_description: Some("b".repeat(255)),
            description: Some("d".repeat(5000)),
        };
        assert!(validate_project(&at_limit, 0, &[]).is_empty());

        let over_limit = ProjectForm {
            name: Some("n".repeat(256)),
            brief_description: Some("b".repeat(256)),
            description: Some("d".repeat(5000)),
        };
        assert_eq!(
            validate_project(&over_limit, 0, &[]),
            vec![
                ValidationCode::NameLength,
                ValidationCode::BriefDescriptionLength,
            ]
        );
    }

    #[test]
    fn test_project_name_duplicate() {
        let existing = vec![project(1, "Alpha"), project(2, "Beta")];

        // A new project reusing a name.
        assert_eq!(
            validate_project(&project_form("Alpha"), 0, &existing),
            vec![ValidationCode::NameDuplicate]
        );
        // Editing project 1 without renaming it.
        assert!(validate_project(&project_form("Alpha"), 1, &existing).is_empty());
        // Renaming project 2 onto project 1's name.
        assert_eq!(
            validate_project(&project_form("Alpha"), 2, &existing),
            vec![ValidationCode::NameDuplicate]
        );
    }

    #[test]
    fn test_valid_task() {
        assert!(validate_task(&task_form("Write tests"), 0, &[]).is_empty());
    }

    #[test]
    fn test_task_length_limits() {
        let mut form = task_form(&"n".repeat(50));
        form.brief_description = Some("b".repeat(50));
        form.description = Some("d".repeat(1000));
        assert!(validate_task(&form, 0, &[]).is_empty());

        form.name = Some("n".repeat(51));
        form.brief_description = Some("b".repeat(51));
        form.description = Some("d".repeat(1001));
        assert_eq!(
            validate_task(&form, 0, &[]),
            vec![
                ValidationCode::NameLength,
                ValidationCode::BriefDescriptionLength,
                ValidationCode::DescriptionLength,
            ]
        );
    }

    #[test]
    fn test_task_length_counts_characters() {
        // 50 multi-byte characters are more than 50 bytes but still allowed.
        let form = task_form(&"é".repeat(50));
        assert!(validate_task(&form, 0, &[]).is_empty());
    }

    #[test]
    fn test_task_invalid_choices() {
        let mut form = task_form("Deploy");
        form.complexity = Some("Extreme".to_string());
        form.due_date = Some("next week".to_string());
        form.status = Some("Unknown".to_string());
        assert_eq!(
            validate_task(&form, 0, &[]),
            vec![
                ValidationCode::ComplexityInvalid,
                ValidationCode::DueDateInvalid,
                ValidationCode::StatusInvalid,
            ]
        );
    }

    #[test]
    fn test_task_blank_wins_over_format() {
        let errors = validate_task(&TaskForm::default(), 0, &[]);
        assert_eq!(
            errors,
            vec![
                ValidationCode::NameBlank,
                ValidationCode::BriefDescriptionBlank,
                ValidationCode::DescriptionBlank,
                ValidationCode::ComplexityBlank,
                ValidationCode::DueDateBlank,
                ValidationCode::StatusBlank,
            ]
        );
    }

    #[test]
    fn test_task_name_duplicate_is_scoped_to_project() {
        let siblings = vec![task(1, 10, "Deploy"), task(2, 10, "Test")];
        assert_eq!(
            validate_task(&task_form("Deploy"), 0, &siblings),
            vec![ValidationCode::NameDuplicate]
        );
        // The same task keeping its name.
        assert!(validate_task(&task_form("Deploy"), 1, &siblings).is_empty());
        // Siblings of another project hold no "Deploy".
        let other_project = vec![task(3, 20, "Release")];
        assert!(validate_task(&task_form("Deploy"), 0, &other_project).is_empty());
    }

    #[test]
    fn test_too_long_name_is_not_also_duplicate() {
        let long = "n".repeat(51);
        let siblings = vec![task(1, 10, &long)];
        assert_eq!(
            validate_task(&task_form(&long), 0, &siblings),
            vec![ValidationCode::NameLength]
        );
    }

    #[test]
    fn test_validate_login() {
        let form = LoginForm {
            username: Some("admin".to_string()),
            password: Some(String::new()),
        };
        assert_eq!(validate_login(&form), vec![ValidationCode::PasswordBlank]);
        assert_eq!(
            validate_login(&LoginForm::default()),
            vec![ValidationCode::UsernameBlank, ValidationCode::PasswordBlank]
        );
    }

    #[test]
    fn test_apply_task_form() {
        let mut task = Task::new(4).unwrap();
        task_form("Deploy").apply_to(&mut task).unwrap();
        assert_eq!(task.name, "Deploy");
        assert_eq!(task.complexity, Complexity::Medium);
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.due_date.to_string(), "2024-06-01 00:00:00");
        assert_eq!(task.project_id(), 4);
    }

    #[test]
    fn test_apply_project_form() {
        let mut project = project(9, "Old");
        project_form("New").apply_to(&mut project);
        assert_eq!(project.name, "New");
        assert_eq!(project.id(), 9);
    }

    #[test]
    fn test_codes_serialize_as_snake_case() {
        assert_eq!(
            serde_json::to_value(ValidationCode::BriefDescriptionLength).unwrap(),
            serde_json::json!("brief_description_length")
        );
        assert_eq!(ValidationCode::DueDateInvalid.to_string(), "due_date_invalid");
    }
}
