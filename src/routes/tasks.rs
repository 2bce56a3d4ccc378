use crate::{
    auth::AuthenticatedLogin,
    database::Database,
    error::AppError,
    models::Task,
    validation::{validate_task, TaskForm},
    AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use log::info;
use serde::Serialize;

/// A task as returned by the API, with its derived past-due flag.
#[derive(Debug, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub past_due: bool,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        let past_due = task.is_past_due();
        Self { task, past_due }
    }
}

async fn require_project(db: &mut dyn Database, project_id: i32) -> Result<(), AppError> {
    match db.load_project(project_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::project_not_found(project_id)),
    }
}

async fn require_task(db: &mut dyn Database, project_id: i32, task_id: i32) -> Result<Task, AppError> {
    require_project(db, project_id).await?;
    db.load_task(project_id, task_id)
        .await?
        .ok_or_else(|| AppError::task_not_found(project_id, task_id))
}

/// Lists the tasks of a project.
///
/// ## Responses:
/// - `200 OK`: JSON array of tasks ordered by id, each with `past_due`.
/// - `404 Not Found`: no such project.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let project_id = path.into_inner();

    let tasks = state
        .with_database(move |db| {
            Box::pin(async move {
                require_project(db, project_id).await?;
                Ok::<_, AppError>(db.load_tasks(project_id).await?)
            })
        })
        .await?;

    let views: Vec<TaskView> = tasks.into_iter().map(TaskView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

/// Adds a task to a project.
///
/// ## Request Body:
/// `name`, `brief_description`, `description`, `complexity` (`Low`, `Medium`,
/// `High`), `due_date` (`YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`) and `status`
/// (`Not Started`, `In-Progress`, `Complete`), all as strings.
///
/// ## Responses:
/// - `201 Created`: the stored task.
/// - `404 Not Found`: no such project.
/// - `422 Unprocessable Entity`: validation codes.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Json<TaskForm>,
    login: AuthenticatedLogin,
) -> Result<impl Responder, AppError> {
    let project_id = path.into_inner();
    let form = form.into_inner();

    let task = state
        .with_database(move |db| {
            Box::pin(async move {
                require_project(db, project_id).await?;

                let siblings = db.load_tasks(project_id).await?;
                let errors = validate_task(&form, 0, &siblings);
                if !errors.is_empty() {
                    return Err(AppError::ValidationError(errors));
                }

                let mut task = Task::new(project_id)?;
                form.apply_to(&mut task)?;
                let id = db.insert_task(&task).await?;
                task.set_id(id)?;
                Ok(task)
            })
        })
        .await?;

    info!(
        "Login {} added task {} to project {}",
        login.0,
        task.id(),
        project_id
    );
    Ok(HttpResponse::Created().json(TaskView::from(task)))
}

/// Shows one task of a project.
///
/// ## Responses:
/// - `200 OK`: the task.
/// - `404 Not Found`: no such project, or no such task in it.
#[get("/{task_id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id) = path.into_inner();

    let task = state
        .with_database(move |db| Box::pin(async move { require_task(db, project_id, task_id).await }))
        .await?;

    Ok(HttpResponse::Ok().json(TaskView::from(task)))
}

/// Updates a task.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `404 Not Found`: no such project, or no such task in it.
/// - `422 Unprocessable Entity`: validation codes.
#[put("/{task_id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
    form: web::Json<TaskForm>,
    login: AuthenticatedLogin,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id) = path.into_inner();
    let form = form.into_inner();

    let task = state
        .with_database(move |db| {
            Box::pin(async move {
                let mut task = require_task(db, project_id, task_id).await?;

                let siblings = db.load_tasks(project_id).await?;
                let errors = validate_task(&form, task.id(), &siblings);
                if !errors.is_empty() {
                    return Err(AppError::ValidationError(errors));
                }

                form.apply_to(&mut task)?;
                db.update_task(&task).await?;
                Ok(task)
            })
        })
        .await?;

    info!(
        "Login {} updated task {} in project {}",
        login.0, task_id, project_id
    );
    Ok(HttpResponse::Ok().json(TaskView::from(task)))
}

/// Deletes a task.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `404 Not Found`: no such project, or no such task in it.
#[delete("/{task_id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
    login: AuthenticatedLogin,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id) = path.into_inner();

    state
        .with_database(move |db| {
            Box::pin(async move {
                require_task(db, project_id, task_id).await?;
                db.delete_task(project_id, task_id).await?;
                Ok::<_, AppError>(())
            })
        })
        .await?;

    info!(
        "Login {} deleted task {} from project {}",
        login.0, task_id, project_id
    );
    Ok(HttpResponse::NoContent().finish())
}
