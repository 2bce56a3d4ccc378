pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use actix_web::web;

/// Registers the API routes. Mounted under `/api` behind `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").service(auth::login))
        // Registered before `/projects` so that scope does not swallow task paths.
        .service(
            web::scope("/projects/{project_id}/tasks")
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        )
        .service(
            web::scope("/projects")
                .service(projects::get_projects)
                .service(projects::create_project)
                .service(projects::get_project)
                .service(projects::update_project)
                .service(projects::delete_project),
        );
}
