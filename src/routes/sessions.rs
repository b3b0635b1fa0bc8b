use actix_identity::Identity;
use actix_web::http::StatusCode;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::session::SessionContext;
use crate::forms::sessions::LoginForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, render_template_with_status};
use crate::services::ServiceError;
use crate::services::sessions::{login, logout};

pub const LOGIN_FAILED_WARNING: &str = "Login was not successful.  Please try again.";

#[get("/login")]
pub async fn new_session(
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, &session, "login");
    context.insert("form", &LoginForm::default());
    render_template(&tera, "sessions/new.html", &context)
}

#[post("/login")]
pub async fn create_session(
    request: HttpRequest,
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    match login(&form, repo.get_ref()) {
        Ok((user, token)) => {
            if let Err(e) = Identity::login(&request.extensions(), token.into_inner()) {
                log::error!("Failed to attach identity: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::info("Login was successful.").send();
            redirect(&format!("/users/{}", user.id))
        }
        Err(ServiceError::AuthenticationFailed) => {
            let mut context = base_context(&flash_messages, &session, "login");
            context.insert("alerts", &[(LOGIN_FAILED_WARNING, "warning")]);
            context.insert("form", &form);
            render_template_with_status(
                &tera,
                StatusCode::UNPROCESSABLE_ENTITY,
                "sessions/new.html",
                &context,
            )
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/logout")]
pub async fn destroy_session(
    identity: Option<Identity>,
    session: SessionContext,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(err) = logout(&session, repo.get_ref()) {
        log::error!("Failed to log out: {err}");
        return HttpResponse::InternalServerError().finish();
    }
    if let Some(identity) = identity {
        identity.logout();
    }
    FlashMessage::info("You are now logged out").send();
    redirect("/")
}
