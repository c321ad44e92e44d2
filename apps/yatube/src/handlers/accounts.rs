//! Account pages: signup, login and logout.

use actix_web::{HttpRequest, HttpResponse, web};

use yatube_core::domain::{NewUser, User};
use yatube_core::error::RepoError;
use yatube_core::forms::{FormErrors, LoginForm, SignupForm};
use yatube_shared::dto::{LoginData, SignupData};

use super::query_param;
use crate::middleware::auth::{Identity, OptionalIdentity, removal_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{self, FieldView, LoggedOutTemplate, LoginTemplate, Nav, SignupTemplate};

const INVALID_LOGIN: &str = "Please enter a correct username and password. Note that both fields may be case-sensitive.";
const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Only same-site paths are followed after login.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// Issue a session cookie for `user` and redirect to `location`.
fn sign_in(state: &AppState, user: &User, location: &str) -> AppResult<HttpResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = user.id, username = %user.username, "User signed in");

    Ok(HttpResponse::Found()
        .cookie(session_cookie(token, state.tokens.expiration_seconds()))
        .insert_header((actix_web::http::header::LOCATION, location.to_string()))
        .finish())
}

fn signup_page(
    viewer: Option<&Identity>,
    form: &SignupForm,
    errors: &FormErrors,
) -> AppResult<HttpResponse> {
    views::page(&SignupTemplate {
        nav: Nav::for_viewer(viewer),
        fields: vec![
            FieldView::new(SignupForm::USERNAME, "text", form.username.clone()).with_errors(errors),
            FieldView::new(SignupForm::EMAIL, "email", form.email.clone()).with_errors(errors),
            FieldView::new(SignupForm::PASSWORD1, "password", "").with_errors(errors),
            FieldView::new(SignupForm::PASSWORD2, "password", "").with_errors(errors),
        ],
        non_field_errors: errors.non_field().to_vec(),
    })
}

fn login_page(
    viewer: Option<&Identity>,
    form: &LoginForm,
    errors: &FormErrors,
    next: Option<String>,
) -> AppResult<HttpResponse> {
    views::page(&LoginTemplate {
        nav: Nav::for_viewer(viewer),
        fields: vec![
            FieldView::new(LoginForm::USERNAME, "text", form.username.clone()).with_errors(errors),
            FieldView::new(LoginForm::PASSWORD, "password", "").with_errors(errors),
        ],
        non_field_errors: errors.non_field().to_vec(),
        next,
    })
}

/// GET /auth/signup/
pub async fn signup_form(viewer: OptionalIdentity) -> AppResult<HttpResponse> {
    signup_page(viewer.identity(), &SignupForm::default(), &FormErrors::new())
}

/// POST /auth/signup/
pub async fn signup_submit(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    body: web::Form<SignupData>,
) -> AppResult<HttpResponse> {
    let data = body.into_inner();
    let form = SignupForm {
        username: data.username,
        email: data.email,
        password1: data.password1,
        password2: data.password2,
    };

    let cleaned = match form.clean() {
        Ok(cleaned) => cleaned,
        Err(errors) => return signup_page(viewer.identity(), &form, &errors),
    };

    if state.users.find_by_username(&cleaned.username).await?.is_some() {
        let mut errors = FormErrors::new();
        errors.add(SignupForm::USERNAME.name, USERNAME_TAKEN);
        return signup_page(viewer.identity(), &form, &errors);
    }

    let password_hash = state
        .passwords
        .hash(&cleaned.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = match state
        .users
        .create(NewUser::new(cleaned.username, cleaned.email, password_hash))
        .await
    {
        Ok(user) => user,
        // Lost a race against another signup with the same name.
        Err(RepoError::Constraint(_)) => {
            let mut errors = FormErrors::new();
            errors.add(SignupForm::USERNAME.name, USERNAME_TAKEN);
            return signup_page(viewer.identity(), &form, &errors);
        }
        Err(e) => return Err(e.into()),
    };

    sign_in(&state, &user, "/")
}

/// GET /auth/login/
pub async fn login_form(
    viewer: OptionalIdentity,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    login_page(
        viewer.identity(),
        &LoginForm::default(),
        &FormErrors::new(),
        query_param(&req, "next"),
    )
}

/// POST /auth/login/
pub async fn login_submit(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    body: web::Form<LoginData>,
) -> AppResult<HttpResponse> {
    let data = body.into_inner();
    let form = LoginForm {
        username: data.username,
        password: data.password,
    };

    let (username, password) = match form.clean() {
        Ok(credentials) => credentials,
        Err(errors) => return login_page(viewer.identity(), &form, &errors, data.next),
    };

    let user = match state.users.find_by_username(&username).await? {
        Some(user) => user,
        None => {
            tracing::debug!(username = %username, "Login for unknown user");
            return invalid_login(viewer.identity(), &form, data.next);
        }
    };

    let valid = state
        .passwords
        .verify(&password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        tracing::debug!(user_id = user.id, "Login with wrong password");
        return invalid_login(viewer.identity(), &form, data.next);
    }

    sign_in(&state, &user, safe_next(data.next.as_deref()))
}

fn invalid_login(
    viewer: Option<&Identity>,
    form: &LoginForm,
    next: Option<String>,
) -> AppResult<HttpResponse> {
    let mut errors = FormErrors::new();
    errors.add_non_field(INVALID_LOGIN);
    login_page(viewer, form, &errors, next)
}

/// GET|POST /auth/logout/
pub async fn logout(viewer: OptionalIdentity) -> AppResult<HttpResponse> {
    if let Some(identity) = viewer.identity() {
        tracing::info!(user_id = identity.user_id, "User signed out");
    }

    let body = views::render(&LoggedOutTemplate {
        nav: Nav::anonymous(),
    })?;

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie())
        .content_type(actix_web::http::header::ContentType::html())
        .body(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/create/")), "/create/");
        assert_eq!(safe_next(Some("/follow/?page=2")), "/follow/?page=2");
        assert_eq!(safe_next(Some("https://evil.example/")), "/");
        assert_eq!(safe_next(Some("//evil.example/")), "/");
        assert_eq!(safe_next(Some("/\\evil.example/")), "/");
        assert_eq!(safe_next(None), "/");
    }
}
