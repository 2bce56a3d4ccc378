use crate::{
    auth::AuthenticatedLogin,
    error::AppError,
    models::Project,
    routes::tasks::TaskView,
    validation::{validate_project, ProjectForm},
    AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use log::info;
use serde::Serialize;

/// A project together with its tasks.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    pub project: Project,
    pub tasks: Vec<TaskView>,
}

/// Lists every project.
///
/// ## Responses:
/// - `200 OK`: JSON array of projects ordered by id.
/// - `500 Internal Server Error`: database failure.
#[get("")]
pub async fn get_projects(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let projects = state
        .with_database(|db| Box::pin(async move { Ok::<_, AppError>(db.load_projects().await?) }))
        .await?;

    Ok(HttpResponse::Ok().json(projects))
}

/// Creates a project.
///
/// The name must not be used by another project.
///
/// ## Responses:
/// - `201 Created`: the stored project, including its new id.
/// - `422 Unprocessable Entity`: `{ "errors": [...] }` with every violated rule.
#[post("")]
pub async fn create_project(
    state: web::Data<AppState>,
    form: web::Json<ProjectForm>,
    login: AuthenticatedLogin,
) -> Result<impl Responder, AppError> {
    let form = form.into_inner();

    let project = state
        .with_database(move |db| {
            Box::pin(async move {
                let existing = db.load_projects().await?;
                let errors = validate_project(&form, 0, &existing);
                if !errors.is_empty() {
                    return Err(AppError::ValidationError(errors));
                }

                let mut project = Project::default();
                form.apply_to(&mut project);
                let id = db.insert_project(&project).await?;
                project.set_id(id)?;
                Ok(project)
            })
        })
        .await?;

    info!("Login {} created project {}", login.0, project.id());
    Ok(HttpResponse::Created().json(project))
}

/// Shows a project and its tasks.
///
/// ## Responses:
/// - `200 OK`: `{ "project": ..., "tasks": [...] }`.
/// - `404 Not Found`: no such project.
#[get("/{project_id}")]
pub async fn get_project(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let project_id = path.into_inner();

    let detail = state
        .with_database(move |db| {
            Box::pin(async move {
                let project = db
                    .load_project(project_id)
                    .await?
                    .ok_or_else(|| AppError::project_not_found(project_id))?;
                let tasks = db.load_tasks(project_id).await?;
                Ok::<_, AppError>(ProjectDetail {
                    project,
                    tasks: tasks.into_iter().map(TaskView::from).collect(),
                })
            })
        })
        .await?;

    Ok(HttpResponse::Ok().json(detail))
}

/// Updates a project.
///
/// Keeping the project's current name is allowed; taking another project's is not.
///
/// ## Responses:
/// - `200 OK`: the updated project.
/// - `404 Not Found`: no such project.
/// - `422 Unprocessable Entity`: validation codes.
#[put("/{project_id}")]
pub async fn update_project(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Json<ProjectForm>,
    login: AuthenticatedLogin,
) -> Result<impl Responder, AppError> {
    let project_id = path.into_inner();
    let form = form.into_inner();

    let project = state
        .with_database(move |db| {
            Box::pin(async move {
                let mut project = db
                    .load_project(project_id)
                    .await?
                    .ok_or_else(|| AppError::project_not_found(project_id))?;

                let existing = db.load_projects().await?;
                let errors = validate_project(&form, project.id(), &existing);
                if !errors.is_empty() {
                    return Err(AppError::ValidationError(errors));
                }

                form.apply_to(&mut project);
                db.update_project(&project).await?;
                Ok(project)
            })
        })
        .await?;

    info!("Login {} updated project {}", login.0, project_id);
    Ok(HttpResponse::Ok().json(project))
}

/// Deletes a project and all of its tasks.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `404 Not Found`: no such project.
#[delete("/{project_id}")]
pub async fn delete_project(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    login: AuthenticatedLogin,
) -> Result<impl Responder, AppError> {
    let project_id = path.into_inner();

    state
        .with_database(move |db| {
            Box::pin(async move {
                if db.load_project(project_id).await?.is_none() {
                    return Err(AppError::project_not_found(project_id));
                }
                db.delete_project(project_id).await?;
                Ok(())
            })
        })
        .await?;

    info!("Login {} deleted project {}", login.0, project_id);
    Ok(HttpResponse::NoContent().finish())
}
