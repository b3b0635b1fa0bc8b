//! HTTP layer: handlers, the route table and shared rendering helpers.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::ErrorInternalServerError;
use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use serde::Deserialize;
use tera::{Context, Tera};

use crate::domain::session::SessionContext;
use crate::domain::validation::FieldErrors;
use crate::dto::users::UserDto;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::sessions::resolve_session;

pub mod articles;
pub mod categories;
pub mod comments;
pub mod pages;
pub mod sessions;
pub mod users;

pub const LOGIN_REQUIRED_WARNING: &str = "You must be logged in to perform that action";

/// `?page=N` query string shared by every listing.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

impl PageQuery {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }
}

/// Register every route. Literal segments such as `/articles/new` come before
/// their `{id}` siblings.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(pages::home)
        .service(pages::about)
        .service(users::new_user)
        .service(users::create_user)
        .service(users::list_users)
        .service(users::show_user)
        .service(users::edit_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(sessions::new_session)
        .service(sessions::create_session)
        .service(sessions::destroy_session)
        .service(articles::list_articles)
        .service(articles::new_article)
        .service(articles::create_article)
        .service(articles::show_article)
        .service(articles::edit_article)
        .service(articles::update_article)
        .service(articles::delete_article)
        .service(comments::create_comment)
        .service(comments::delete_comment)
        .service(categories::list_categories)
        .service(categories::new_category)
        .service(categories::create_category)
        .service(categories::show_category)
        .service(categories::edit_category)
        .service(categories::update_category)
        .service(categories::delete_category);
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(session_from_request(req))
    }
}

fn session_from_request(req: &HttpRequest) -> Result<SessionContext, actix_web::Error> {
    let token = req.get_identity().ok().and_then(|identity| identity.id().ok());
    let Some(repo) = req.app_data::<web::Data<DieselRepository>>() else {
        log::error!("Repository is not registered as application data");
        return Err(ErrorInternalServerError("repository unavailable"));
    };
    resolve_session(token.as_deref(), repo.get_ref()).map_err(ErrorInternalServerError)
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info => "info",
        Level::Debug => "secondary",
    }
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    render_template_with_status(tera, StatusCode::OK, template, context)
}

pub fn render_template_with_status(
    tera: &Tera,
    status: StatusCode,
    template: &str,
    context: &Context,
) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render template '{template}': {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Re-render a form with its errors as `422 Unprocessable Entity`.
pub fn render_invalid(
    tera: &Tera,
    template: &str,
    mut context: Context,
    errors: &FieldErrors,
) -> HttpResponse {
    context.insert("errors", errors);
    render_template_with_status(tera, StatusCode::UNPROCESSABLE_ENTITY, template, &context)
}

/// `303 See Other` so a POST is followed by a GET.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    session: &SessionContext,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert(
        "current_user",
        &session.current_user().cloned().map(UserDto::from),
    );
    context.insert("is_admin", &session.is_admin());
    context.insert("current_page", current_page);
    context.insert("errors", &FieldErrors::new());
    context
}

/// Map the non-form outcomes of a service call onto a response.
///
/// Forbidden actions flash their warning and go back to `fallback`.
pub fn service_error_response(err: ServiceError, fallback: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthenticated => {
            FlashMessage::warning(LOGIN_REQUIRED_WARNING).send();
            redirect("/login")
        }
        ServiceError::Forbidden(message) => {
            FlashMessage::warning(message).send();
            redirect(fallback)
        }
        ServiceError::Validation(errors) => {
            FlashMessage::error(errors.to_string()).send();
            redirect(fallback)
        }
        ServiceError::AuthenticationFailed => redirect("/login"),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Internal => HttpResponse::InternalServerError().finish(),
    }
}
