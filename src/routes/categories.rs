use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::session::SessionContext;
use crate::forms::categories::CategoryForm;
use crate::repository::DieselRepository;
use crate::routes::{
    PageQuery, base_context, redirect, render_invalid, render_template, service_error_response,
};
use crate::services::ServiceError;
use crate::services::categories;

#[get("/categories")]
pub async fn list_categories(
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    query: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match categories::list_categories(query.page(), repo.get_ref()) {
        Ok(categories) => {
            let mut context = base_context(&flash_messages, &session, "categories");
            context.insert("categories", &categories);
            render_template(&tera, "categories/index.html", &context)
        }
        Err(err) => service_error_response(err, "/"),
    }
}

#[get("/categories/new")]
pub async fn new_category(
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match categories::new_category(&session) {
        Ok(()) => {
            let mut context = base_context(&flash_messages, &session, "categories");
            context.insert("form", &CategoryForm::default());
            render_template(&tera, "categories/new.html", &context)
        }
        Err(err) => service_error_response(err, "/categories"),
    }
}

#[post("/categories")]
pub async fn create_category(
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    match categories::create_category(form.clone(), &session, repo.get_ref()) {
        Ok(_) => {
            FlashMessage::success("Category was created successfully.").send();
            redirect("/categories")
        }
        Err(ServiceError::Validation(errors)) => {
            let mut context = base_context(&flash_messages, &session, "categories");
            context.insert("form", &form);
            render_invalid(&tera, "categories/new.html", context, &errors)
        }
        Err(err) => service_error_response(err, "/categories"),
    }
}

#[get("/categories/{category_id}")]
pub async fn show_category(
    category_id: web::Path<i32>,
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    query: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match categories::show_category(category_id.into_inner(), query.page(), repo.get_ref()) {
        Ok(page) => {
            let mut context = base_context(&flash_messages, &session, "categories");
            context.insert("page", &page);
            render_template(&tera, "categories/show.html", &context)
        }
        Err(err) => service_error_response(err, "/categories"),
    }
}

#[get("/categories/{category_id}/edit")]
pub async fn edit_category(
    category_id: web::Path<i32>,
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match categories::edit_category(category_id.into_inner(), &session, repo.get_ref()) {
        Ok(category) => {
            let mut context = base_context(&flash_messages, &session, "categories");
            context.insert("category_id", &category.id);
            context.insert(
                "form",
                &CategoryForm {
                    name: category.name,
                },
            );
            render_template(&tera, "categories/edit.html", &context)
        }
        Err(err) => service_error_response(err, "/categories"),
    }
}

#[post("/categories/{category_id}/update")]
pub async fn update_category(
    category_id: web::Path<i32>,
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    let category_id = category_id.into_inner();
    match categories::update_category(category_id, form.clone(), &session, repo.get_ref()) {
        Ok(category) => {
            FlashMessage::success("Category was updated successfully.").send();
            redirect(&format!("/categories/{}", category.id))
        }
        Err(ServiceError::Validation(errors)) => {
            let mut context = base_context(&flash_messages, &session, "categories");
            context.insert("category_id", &category_id);
            context.insert("form", &form);
            render_invalid(&tera, "categories/edit.html", context, &errors)
        }
        Err(err) => service_error_response(err, "/categories"),
    }
}

#[post("/categories/{category_id}/delete")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    session: SessionContext,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match categories::delete_category(category_id.into_inner(), &session, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Category was deleted successfully.").send();
            redirect("/categories")
        }
        Err(err) => service_error_response(err, "/categories"),
    }
}
