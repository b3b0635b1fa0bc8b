use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::session::SessionContext;
use crate::forms::users::{EditUserForm, SignupForm};
use crate::repository::DieselRepository;
use crate::routes::{
    PageQuery, base_context, redirect, render_invalid, render_template, service_error_response,
};
use crate::services::ServiceError;
use crate::services::users;

#[get("/signup")]
pub async fn new_user(
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, &session, "signup");
    context.insert("form", &SignupForm::default());
    render_template(&tera, "users/new.html", &context)
}

#[post("/users")]
pub async fn create_user(
    request: HttpRequest,
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<SignupForm>,
) -> impl Responder {
    match users::signup(form.clone(), repo.get_ref()) {
        Ok((user, token)) => {
            if let Err(e) = Identity::login(&request.extensions(), token.into_inner()) {
                log::error!("Failed to attach identity: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success(format!(
                "Welcome {}.  You have successfully signed up.",
                user.username
            ))
            .send();
            redirect("/articles")
        }
        Err(ServiceError::Validation(errors)) => {
            let mut context = base_context(&flash_messages, &session, "signup");
            context.insert("form", &form);
            render_invalid(&tera, "users/new.html", context, &errors)
        }
        Err(err) => service_error_response(err, "/signup"),
    }
}

#[get("/users")]
pub async fn list_users(
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    query: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match users::list_users(query.page(), repo.get_ref()) {
        Ok(users) => {
            let mut context = base_context(&flash_messages, &session, "users");
            context.insert("users", &users);
            render_template(&tera, "users/index.html", &context)
        }
        Err(err) => service_error_response(err, "/"),
    }
}

#[get("/users/{user_id}")]
pub async fn show_user(
    user_id: web::Path<i32>,
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    query: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match users::show_user(user_id.into_inner(), query.page(), &session, repo.get_ref()) {
        Ok(page) => {
            let mut context = base_context(&flash_messages, &session, "users");
            context.insert("page", &page);
            render_template(&tera, "users/show.html", &context)
        }
        Err(err) => service_error_response(err, "/users"),
    }
}

#[get("/users/{user_id}/edit")]
pub async fn edit_user(
    user_id: web::Path<i32>,
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let user_id = user_id.into_inner();
    match users::edit_user(user_id, &session, repo.get_ref()) {
        Ok(user) => {
            let form = EditUserForm {
                username: user.username.clone(),
                email: user.email.clone(),
                password: String::new(),
            };
            let mut context = base_context(&flash_messages, &session, "users");
            context.insert("user_id", &user.id);
            context.insert("form", &form);
            render_template(&tera, "users/edit.html", &context)
        }
        Err(err) => service_error_response(err, &format!("/users/{user_id}")),
    }
}

#[post("/users/{user_id}/update")]
pub async fn update_user(
    user_id: web::Path<i32>,
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<EditUserForm>,
) -> impl Responder {
    let user_id = user_id.into_inner();
    match users::update_user(user_id, form.clone(), &session, repo.get_ref()) {
        Ok(user) => {
            FlashMessage::success("User profile was updated successfully").send();
            redirect(&format!("/users/{}", user.id))
        }
        Err(ServiceError::Validation(errors)) => {
            let mut context = base_context(&flash_messages, &session, "users");
            context.insert("user_id", &user_id);
            context.insert("form", &form);
            render_invalid(&tera, "users/edit.html", context, &errors)
        }
        Err(err) => service_error_response(err, &format!("/users/{user_id}")),
    }
}

#[post("/users/{user_id}/delete")]
pub async fn delete_user(
    user_id: web::Path<i32>,
    identity: Option<Identity>,
    session: SessionContext,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let user_id = user_id.into_inner();
    match users::delete_user(user_id, &session, repo.get_ref()) {
        Ok(deleted_self) => {
            if deleted_self {
                if let Some(identity) = identity {
                    identity.logout();
                }
            }
            FlashMessage::success("User and all associated articles were deleted successfully.")
                .send();
            redirect("/")
        }
        Err(err) => service_error_response(err, &format!("/users/{user_id}")),
    }
}
