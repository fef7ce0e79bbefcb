use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::Redirect,
};
use serde_json::{Map, Value, json};
use storehub_auth::{Authorization, post_login_redirect};
use storehub_core::AppError;
use storehub_models::{LoginForm, RegisterForm};
use storehub_observability::{track_login_failure, track_login_success, track_registration};
use tower_sessions::Session;
use tracing::{Span, field, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::service::{
    AuthService, EMAIL_TAKEN, INACTIVE_ACCOUNT, INVALID_CREDENTIALS, LoginOutcome, REGISTERED,
};
use crate::middleware::auth::{Auth, LOGIN_PATH, SESSION_INTENDED_KEY, SESSION_USER_KEY};
use crate::session::remember_expiry;
use crate::state::AppState;
use crate::utils::flash;
use crate::utils::page::Page;
use crate::validator::field_errors;

const REGISTER_PATH: &str = "/register";
const HOME_PATH: &str = "/";
const UNREADABLE_FORM: &str = "The submitted form could not be read. Please try again.";

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Unwraps a posted form, or flashes an error and yields the redirect back
/// to the page it came from.
async fn read_form<T>(
    session: &Session,
    form: Result<Form<T>, FormRejection>,
    back: &'static str,
) -> Result<Result<T, Redirect>, AppError> {
    match form {
        Ok(Form(form)) => Ok(Ok(form)),
        Err(rejection) => {
            warn!(error = %rejection, path = back, "Unreadable form post");
            flash::flash_error(session, "form", UNREADABLE_FORM).await?;
            Ok(Err(Redirect::to(back)))
        }
    }
}

fn old_login_input(form: &LoginForm) -> Map<String, Value> {
    let mut old = Map::new();
    old.insert("email".to_string(), json!(form.email));
    old.insert("remember".to_string(), json!(form.remember));
    old
}

fn old_register_input(form: &RegisterForm) -> Map<String, Value> {
    let mut old = Map::new();
    old.insert("name".to_string(), json!(form.name));
    old.insert("email".to_string(), json!(form.email));
    old.insert("phone".to_string(), json!(form.phone));
    old
}

/// Login page
#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login page object", body = Page),
        (status = 303, description = "Already signed in; redirected to the landing page")
    ),
    tag = "Authentication"
)]
#[instrument(skip(auth, session))]
pub async fn show_login(Auth(auth): Auth, session: Session) -> Result<Page, AppError> {
    Page::new("Auth/Login", &auth)?
        .with_flashed(flash::take(&session).await?)?
        .with("can_register", true)
}

/// Registration page
#[utoipa::path(
    get,
    path = "/register",
    responses(
        (status = 200, description = "Registration page object", body = Page),
        (status = 303, description = "Already signed in; redirected to the landing page")
    ),
    tag = "Authentication"
)]
#[instrument(skip(auth, session))]
pub async fn show_register(Auth(auth): Auth, session: Session) -> Result<Page, AppError> {
    Page::new("Auth/Register", &auth)?.with_flashed(flash::take(&session).await?)
}

/// Sign in with email and password
///
/// Rejections redirect back to `/login` with flashed field errors and the
/// submitted email.
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Signed in, or rejected with flashed errors"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, session, form), fields(email = field::Empty))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let form = match read_form(&session, form, LOGIN_PATH).await? {
        Ok(form) => form,
        Err(back) => return Ok(back),
    };
    Span::current().record("email", form.email.as_str());

    if let Err(errors) = form.validate() {
        track_login_failure("validation");
        flash::flash_errors(&session, &field_errors(&errors)).await?;
        flash::flash_old_input(&session, old_login_input(&form)).await?;
        return Ok(Redirect::to(LOGIN_PATH));
    }

    match AuthService::attempt(state.users.as_ref(), &form).await? {
        LoginOutcome::InvalidCredentials => {
            track_login_failure("invalid_credentials");
            flash::flash_error(&session, "email", INVALID_CREDENTIALS).await?;
            flash::flash_old_input(&session, old_login_input(&form)).await?;
            Ok(Redirect::to(LOGIN_PATH))
        }
        LoginOutcome::Inactive => {
            track_login_failure("inactive");
            session.flush().await?;
            flash::flash_error(&session, "email", INACTIVE_ACCOUNT).await?;
            flash::flash_old_input(&session, old_login_input(&form)).await?;
            Ok(Redirect::to(LOGIN_PATH))
        }
        LoginOutcome::Authenticated(identity) => {
            let intended = session.remove::<String>(SESSION_INTENDED_KEY).await?;

            session.cycle_id().await?;
            session.insert(SESSION_USER_KEY, identity.id).await?;
            if form.remember {
                session.set_expiry(Some(remember_expiry(&state.session_config)));
            }

            let auth = Authorization::new(identity);
            track_login_success(auth.primary_role().map_or("none", |role| role.key()));

            Ok(Redirect::to(&post_login_redirect(&auth, intended)))
        }
    }
}

/// Register as a client
///
/// Creates an active identity with the client role and its customer record,
/// then signs it in.
#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Registered and signed in, or rejected with flashed errors"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, session, form), fields(email = field::Empty))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let form = match read_form(&session, form, REGISTER_PATH).await? {
        Ok(form) => form,
        Err(back) => return Ok(back),
    };
    Span::current().record("email", form.email.as_str());

    if let Err(errors) = form.validate() {
        flash::flash_errors(&session, &field_errors(&errors)).await?;
        flash::flash_old_input(&session, old_register_input(&form)).await?;
        return Ok(Redirect::to(REGISTER_PATH));
    }

    let (user, _customer) =
        match AuthService::register(state.users.as_ref(), &form, state.auth_config.bcrypt_cost)
            .await
        {
            Ok(created) => created,
            Err(err) if err.is_conflict() => {
                flash::flash_error(&session, "email", EMAIL_TAKEN).await?;
                flash::flash_old_input(&session, old_register_input(&form)).await?;
                return Ok(Redirect::to(REGISTER_PATH));
            }
            Err(err) => return Err(err),
        };

    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user.id).await?;
    flash::flash_success(&session, REGISTERED).await?;
    track_registration();

    Ok(Redirect::to(HOME_PATH))
}

/// Sign out
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 303, description = "Session flushed; redirected to `/`"),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    session.flush().await?;
    Ok(Redirect::to(HOME_PATH))
}
