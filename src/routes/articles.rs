use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::domain::session::SessionContext;
use crate::domain::validation::FieldErrors;
use crate::forms::articles::ArticleForm;
use crate::forms::comments::CommentForm;
use crate::repository::DieselRepository;
use crate::routes::{
    PageQuery, base_context, redirect, render_invalid, render_template, service_error_response,
};
use crate::services::ServiceError;
use crate::services::articles;

/// Context shared by the new and edit article pages.
fn form_context(
    flash_messages: &IncomingFlashMessages,
    session: &SessionContext,
    form: &ArticleForm,
    repo: &DieselRepository,
) -> Result<Context, HttpResponse> {
    let categories = articles::form_categories(repo).map_err(|e| service_error_response(e, "/"))?;
    let mut context = base_context(flash_messages, session, "articles");
    context.insert("form", form);
    context.insert("categories", &categories);
    Ok(context)
}

fn render_invalid_form(
    tera: &Tera,
    template: &str,
    mut context: Context,
    errors: &FieldErrors,
    article_id: Option<i32>,
) -> HttpResponse {
    context.insert("article_id", &article_id);
    render_invalid(tera, template, context, errors)
}

#[get("/articles")]
pub async fn list_articles(
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    query: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match articles::list_articles(query.page(), repo.get_ref()) {
        Ok(articles) => {
            let mut context = base_context(&flash_messages, &session, "articles");
            context.insert("articles", &articles);
            render_template(&tera, "articles/index.html", &context)
        }
        Err(err) => service_error_response(err, "/"),
    }
}

#[get("/articles/new")]
pub async fn new_article(
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match articles::new_article(&session, repo.get_ref()) {
        Ok(categories) => {
            let mut context = base_context(&flash_messages, &session, "new_article");
            context.insert("form", &ArticleForm::default());
            context.insert("categories", &categories);
            render_template(&tera, "articles/new.html", &context)
        }
        Err(err) => service_error_response(err, "/articles"),
    }
}

#[post("/articles")]
pub async fn create_article(
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(pairs): web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let form = ArticleForm::from_pairs(pairs);
    match articles::create_article(form.clone(), &session, repo.get_ref()) {
        Ok(article) => {
            FlashMessage::success("Article was saved successfully.").send();
            redirect(&format!("/articles/{}", article.id))
        }
        Err(ServiceError::Validation(errors)) => {
            match form_context(&flash_messages, &session, &form, repo.get_ref()) {
                Ok(context) => {
                    render_invalid_form(&tera, "articles/new.html", context, &errors, None)
                }
                Err(response) => response,
            }
        }
        Err(err) => service_error_response(err, "/articles"),
    }
}

#[get("/articles/{article_id}")]
pub async fn show_article(
    article_id: web::Path<i32>,
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match articles::show_article(article_id.into_inner(), &session, repo.get_ref()) {
        Ok(page) => {
            let mut context = base_context(&flash_messages, &session, "articles");
            context.insert("page", &page);
            context.insert("comment_form", &CommentForm::default());
            render_template(&tera, "articles/show.html", &context)
        }
        Err(err) => service_error_response(err, "/articles"),
    }
}

#[get("/articles/{article_id}/edit")]
pub async fn edit_article(
    article_id: web::Path<i32>,
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let article_id = article_id.into_inner();
    match articles::edit_article(article_id, &session, repo.get_ref()) {
        Ok((article, categories)) => {
            let mut context = base_context(&flash_messages, &session, "articles");
            context.insert("form", &ArticleForm::from(&article));
            context.insert("categories", &categories);
            context.insert("article_id", &article.id);
            render_template(&tera, "articles/edit.html", &context)
        }
        Err(err) => service_error_response(err, &format!("/articles/{article_id}")),
    }
}

#[post("/articles/{article_id}/update")]
pub async fn update_article(
    article_id: web::Path<i32>,
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(pairs): web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let article_id = article_id.into_inner();
    let form = ArticleForm::from_pairs(pairs);
    match articles::update_article(article_id, form.clone(), &session, repo.get_ref()) {
        Ok(article) => {
            FlashMessage::success("Article was updated successfully.").send();
            redirect(&format!("/articles/{}", article.id))
        }
        Err(ServiceError::Validation(errors)) => {
            match form_context(&flash_messages, &session, &form, repo.get_ref()) {
                Ok(context) => render_invalid_form(
                    &tera,
                    "articles/edit.html",
                    context,
                    &errors,
                    Some(article_id),
                ),
                Err(response) => response,
            }
        }
        Err(err) => service_error_response(err, &format!("/articles/{article_id}")),
    }
}

#[post("/articles/{article_id}/delete")]
pub async fn delete_article(
    article_id: web::Path<i32>,
    session: SessionContext,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let article_id = article_id.into_inner();
    match articles::delete_article(article_id, &session, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Article was deleted successfully.").send();
            redirect("/articles")
        }
        Err(err) => service_error_response(err, &format!("/articles/{article_id}")),
    }
}
