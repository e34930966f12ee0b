pub mod answer;
pub mod auth;
pub mod health;
pub mod question;
pub mod test;
pub mod user;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::middleware::auth::require_bearer_auth;
use crate::AppState;

pub fn router(state: AppState) -> Router {
    let open = Router::new()
        .route("/auth", get(auth::auth))
        .route("/health", get(health::health));

    let protected = Router::new()
        .route("/user", post(user::create_user).get(user::list_users))
        .route("/user/email/:email", get(user::get_user_by_email))
        .route(
            "/user/:id",
            get(user::get_user)
                .put(user::update_user)
                .patch(user::patch_user)
                .delete(user::delete_user),
        )
        .route("/test", post(test::create_test).get(test::list_tests))
        .route(
            "/test/:id",
            get(test::get_test)
                .put(test::update_test)
                .patch(test::patch_test)
                .delete(test::delete_test),
        )
        .route(
            "/question",
            post(question::create_question).get(question::list_questions),
        )
        .route(
            "/question/:id",
            get(question::get_question)
                .put(question::update_question)
                .patch(question::patch_question)
                .delete(question::delete_question),
        )
        .route(
            "/answer",
            post(answer::create_answer).get(answer::list_answers),
        )
        .route(
            "/answer/:id",
            get(answer::get_answer)
                .put(answer::update_answer)
                .patch(answer::patch_answer)
                .delete(answer::delete_answer),
        )
        .layer(from_fn_with_state(state.clone(), require_bearer_auth));

    open.merge(protected).with_state(state)
}
