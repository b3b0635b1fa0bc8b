use actix_web::{Responder, post, web};

use crate::domain::session::SessionContext;
use crate::forms::comments::CommentForm;
use crate::repository::DieselRepository;
use crate::routes::{redirect, service_error_response};
use crate::services::comments;

#[post("/articles/{article_id}/comments")]
pub async fn create_comment(
    article_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CommentForm>,
) -> impl Responder {
    let article_id = article_id.into_inner();
    let location = format!("/articles/{article_id}");
    match comments::create_comment(article_id, form, repo.get_ref()) {
        Ok(_) => redirect(&location),
        Err(err) => service_error_response(err, &location),
    }
}

#[post("/articles/{article_id}/comments/{comment_id}/delete")]
pub async fn delete_comment(
    path: web::Path<(i32, i32)>,
    session: SessionContext,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (article_id, comment_id) = path.into_inner();
    let location = format!("/articles/{article_id}");
    match comments::delete_comment(article_id, comment_id, &session, repo.get_ref()) {
        Ok(()) => redirect(&location),
        Err(err) => service_error_response(err, &location),
    }
}
