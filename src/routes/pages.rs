use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::session::SessionContext;
use crate::routes::{base_context, redirect, render_template};
use crate::services::pages::home_redirect;

#[get("/")]
pub async fn home(
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Some(location) = home_redirect(&session) {
        return redirect(location);
    }
    let context = base_context(&flash_messages, &session, "home");
    render_template(&tera, "pages/home.html", &context)
}

#[get("/about")]
pub async fn about(
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &session, "about");
    render_template(&tera, "pages/about.html", &context)
}
