use crate::{
    auth::{generate_token, AuthResponse},
    error::AppError,
    validation::{validate_login, LoginForm, ValidationCode},
    AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use log::info;

/// Log in
///
/// Checks the submitted credentials against the stored login and returns a
/// bearer token.
///
/// ## Responses:
/// - `200 OK`: `{ "token": ..., "login_id": ... }`.
/// - `401 Unauthorized`: `username_not_exist` or `password_incorrect`.
/// - `422 Unprocessable Entity`: `username_blank` and/or `password_blank`.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    form: web::Json<LoginForm>,
) -> Result<impl Responder, AppError> {
    let form = form.into_inner();
    let errors = validate_login(&form);
    if !errors.is_empty() {
        return Err(AppError::ValidationError(errors));
    }

    let username = form.username.unwrap_or_default();
    let password = form.password.unwrap_or_default();

    let login = state
        .with_database(move |db| {
            Box::pin(async move {
                let login = db.load_login(&username).await?.ok_or_else(|| {
                    AppError::Unauthorized(ValidationCode::UsernameNotExist.to_string())
                })?;
                if !login.check_login(&username, &password) {
                    return Err(AppError::Unauthorized(
                        ValidationCode::PasswordIncorrect.to_string(),
                    ));
                }
                Ok(login)
            })
        })
        .await?;

    let token = generate_token(login.id(), &state.secret_key)?;
    info!("Login {} authenticated", login.username);

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        login_id: login.id(),
    }))
}
