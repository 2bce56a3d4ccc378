use std::io;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use clap::{Parser, Subcommand};
use log::{error, info};

use projectmanagement::auth::AuthMiddleware;
use projectmanagement::config::{get_configuration, Configuration};
use projectmanagement::database;
use projectmanagement::error::AppError;
use projectmanagement::routes::{self, health};
use projectmanagement::AppState;

#[derive(Parser)]
#[command(name = "projectmanagement", version, about = "Track projects and their tasks")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Create the schema and the first login
    InitDb {
        /// Username of the initial login
        username: String,
        /// Password of the initial login, stored as given
        password: String,
    },
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    let configuration = get_configuration().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let database_url = configuration
        .database_url()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(configuration, database_url).await,
        Command::InitDb { username, password } => {
            init_db(&database_url, username, password).await
        }
    }
}

async fn init_db(database_url: &str, username: String, password: String) -> io::Result<()> {
    let result: Result<(), AppError> = database::with_database(database_url, move |db| {
        Box::pin(async move { Ok::<_, AppError>(db.initialize_database(&username, &password).await?) })
    })
    .await;

    match result {
        Ok(()) => {
            info!("Database initialized");
            Ok(())
        }
        Err(e) => {
            error!("Database initialization failed: {}", e);
            Err(io::Error::new(io::ErrorKind::Other, e.to_string()))
        }
    }
}

async fn serve(configuration: &Configuration, database_url: String) -> io::Result<()> {
    let state = web::Data::new(AppState::new(database_url, configuration.secret_key.clone()));

    info!("Starting server at {}", configuration.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((configuration.server_host.as_str(), configuration.server_port))?
    .run()
    .await
}
