use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::{debug, info};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, Executor, FromRow};

use super::error::{is_duplicate_table, DatabaseError, DatabaseResult};
use super::Database;
use crate::models::{Complexity, Login, ModelError, Project, Status, Task};

const SCHEMA: &str = include_str!("../../schema/postgresql.sql");

/// PostgreSQL implementation of [`Database`] over a single `PgConnection`.
pub struct PostgreSql {
    options: PgConnectOptions,
    hostname: String,
    port: u16,
    database_name: String,
    connection: Option<PgConnection>,
}

#[derive(FromRow)]
struct ProjectRow {
    id: i32,
    name: String,
    brief_description: String,
    description: String,
}

#[derive(FromRow)]
struct TaskRow {
    id: i32,
    project_id: i32,
    name: String,
    brief_description: String,
    description: String,
    complexity: String,
    due_date: NaiveDateTime,
    status: String,
}

#[derive(FromRow)]
struct LoginRow {
    id: i32,
    username: String,
    password: String,
}

impl From<ModelError> for DatabaseError {
    fn from(error: ModelError) -> Self {
        DatabaseError::DataCalculation(error.to_string())
    }
}

impl TryFrom<ProjectRow> for Project {
    type Error = DatabaseError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let mut project = Project::new(row.name, row.brief_description, row.description);
        project.set_id(row.id)?;
        Ok(project)
    }
}

/// Unknown complexity or status text decodes to `Unknown` instead of failing the read.
impl TryFrom<TaskRow> for Task {
    type Error = DatabaseError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let mut task = Task::new(row.project_id)?;
        task.set_id(row.id)?;
        task.name = row.name;
        task.brief_description = row.brief_description;
        task.description = row.description;
        task.complexity = Complexity::decode(&row.complexity);
        task.due_date = row.due_date;
        task.status = Status::decode(&row.status);
        Ok(task)
    }
}

impl TryFrom<LoginRow> for Login {
    type Error = DatabaseError;

    fn try_from(row: LoginRow) -> Result<Self, Self::Error> {
        let mut login = Login::new(row.username, row.password);
        login.set_id(row.id)?;
        Ok(login)
    }
}

/// Text forms of a task's choices as stored. `Unknown` only ever comes from
/// decoding a bad row and is never written back.
fn stored_choices(task: &Task) -> DatabaseResult<(&'static str, &'static str)> {
    if task.complexity == Complexity::Unknown {
        return Err(ModelError::InvalidComplexity(task.complexity.to_string()).into());
    }
    if task.status == Status::Unknown {
        return Err(ModelError::InvalidStatus(task.status.to_string()).into());
    }
    Ok((task.complexity.as_str(), task.status.as_str()))
}

impl PostgreSql {
    pub fn new(
        hostname: &str,
        port: u16,
        username: &str,
        password: &str,
        database_name: &str,
    ) -> Self {
        let options = PgConnectOptions::new()
            .host(hostname)
            .port(port)
            .username(username)
            .password(password)
            .database(database_name);

        Self {
            options,
            hostname: hostname.to_string(),
            port,
            database_name: database_name.to_string(),
            connection: None,
        }
    }

    fn connection(&mut self) -> DatabaseResult<&mut PgConnection> {
        self.connection.as_mut().ok_or(DatabaseError::NotOpen)
    }
}

#[async_trait]
impl Database for PostgreSql {
    async fn open(&mut self) -> DatabaseResult<()> {
        if self.connection.is_some() {
            debug!("Connection to {} is already open", self.database_name);
            return Ok(());
        }

        let connection = PgConnection::connect_with(&self.options)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        debug!(
            "Opened connection to {}:{}/{}",
            self.hostname, self.port, self.database_name
        );
        self.connection = Some(connection);
        Ok(())
    }

    async fn close(&mut self) -> DatabaseResult<()> {
        if let Some(connection) = self.connection.take() {
            connection
                .close()
                .await
                .map_err(|e| DatabaseError::Connection(e.to_string()))?;
            debug!("Closed connection to {}", self.database_name);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    async fn load_projects(&mut self) -> DatabaseResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            "SELECT id, name, brief_description, description FROM project ORDER BY id",
        )
        .fetch_all(self.connection()?)
        .await?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn load_project(&mut self, project_id: i32) -> DatabaseResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            "SELECT id, name, brief_description, description FROM project WHERE id = $1",
        )
        .bind(project_id)
        .fetch_optional(self.connection()?)
        .await?;

        row.map(Project::try_from).transpose()
    }

    async fn insert_project(&mut self, project: &Project) -> DatabaseResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO project (name, brief_description, description)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(&project.name)
        .bind(&project.brief_description)
        .bind(&project.description)
        .fetch_one(self.connection()?)
        .await?;

        debug!("Inserted project {} ({})", id, project.name);
        Ok(id)
    }

    async fn update_project(&mut self, project: &Project) -> DatabaseResult<()> {
        let result = sqlx::query(
            "UPDATE project SET name = $1, brief_description = $2, description = $3
             WHERE id = $4",
        )
        .bind(&project.name)
        .bind(&project.brief_description)
        .bind(&project.description)
        .bind(project.id())
        .execute(self.connection()?)
        .await?;

        debug!(
            "Updated project {} ({} row(s))",
            project.id(),
            result.rows_affected()
        );
        Ok(())
    }

    async fn delete_project(&mut self, project_id: i32) -> DatabaseResult<()> {
        let mut tx = self.connection()?.begin().await?;

        let tasks = sqlx::query("DELETE FROM task WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM project WHERE id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(
            "Deleted project {} and {} task(s)",
            project_id,
            tasks.rows_affected()
        );
        Ok(())
    }

    async fn load_tasks(&mut self, project_id: i32) -> DatabaseResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, project_id, name, brief_description, description, complexity, due_date, status
             FROM task WHERE project_id = $1 ORDER BY id",
        )
        .bind(project_id)
        .fetch_all(self.connection()?)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn load_task(&mut self, project_id: i32, task_id: i32) -> DatabaseResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(
            "SELECT id, project_id, name, brief_description, description, complexity, due_date, status
             FROM task WHERE project_id = $1 AND id = $2",
        )
        .bind(project_id)
        .bind(task_id)
        .fetch_optional(self.connection()?)
        .await?;

        row.map(Task::try_from).transpose()
    }

    async fn insert_task(&mut self, task: &Task) -> DatabaseResult<i32> {
        let (complexity, status) = stored_choices(task)?;
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO task (project_id, name, brief_description, description, complexity, due_date, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(task.project_id())
        .bind(&task.name)
        .bind(&task.brief_description)
        .bind(&task.description)
        .bind(complexity)
        .bind(task.due_date)
        .bind(status)
        .fetch_one(self.connection()?)
        .await?;

        debug!("Inserted task {} into project {}", id, task.project_id());
        Ok(id)
    }

    async fn update_task(&mut self, task: &Task) -> DatabaseResult<()> {
        let (complexity, status) = stored_choices(task)?;
        let result = sqlx::query(
            "UPDATE task
             SET name = $1, brief_description = $2, description = $3, complexity = $4, due_date = $5, status = $6
             WHERE id = $7 AND project_id = $8",
        )
        .bind(&task.name)
        .bind(&task.brief_description)
        .bind(&task.description)
        .bind(complexity)
        .bind(task.due_date)
        .bind(status)
        .bind(task.id())
        .bind(task.project_id())
        .execute(self.connection()?)
        .await?;

        debug!(
            "Updated task {} in project {} ({} row(s))",
            task.id(),
            task.project_id(),
            result.rows_affected()
        );
        Ok(())
    }

    async fn delete_task(&mut self, project_id: i32, task_id: i32) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM task WHERE id = $1 AND project_id = $2")
            .bind(task_id)
            .bind(project_id)
            .execute(self.connection()?)
            .await?;

        debug!("Deleted task {} from project {}", task_id, project_id);
        Ok(())
    }

    async fn load_login(&mut self, username: &str) -> DatabaseResult<Option<Login>> {
        let row = sqlx::query_as::<_, LoginRow>(
            "SELECT id, username, password FROM login WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.connection()?)
        .await?;

        row.map(Login::try_from).transpose()
    }

    async fn initialize_database(
        &mut self,
        admin_username: &str,
        admin_password: &str,
    ) -> DatabaseResult<()> {
        info!("Initializing database schema in {}", self.database_name);
        let mut tx = self.connection()?.begin().await?;

        match (&mut *tx).execute(SCHEMA).await {
            Ok(_) => {}
            Err(e) if is_duplicate_table(&e) => {
                tx.rollback().await?;
                info!("Database schema already exists; nothing to do");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }

        sqlx::query("INSERT INTO login (username, password) VALUES ($1, $2)")
            .bind(admin_username)
            .bind(admin_password)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!("Database initialized with login {}", admin_username);
        Ok(())
    }
}
