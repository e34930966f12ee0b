pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::{
    answer_service::AnswerService, auth_service::AuthService, question_service::QuestionService,
    test_service::TestService, user_service::UserService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub user_service: UserService,
    pub test_service: TestService,
    pub question_service: QuestionService,
    pub answer_service: AnswerService,
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let config = Arc::new(config);
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        let user_service = UserService::new(pool.clone());
        let test_service = TestService::new(pool.clone());
        let question_service = QuestionService::new(pool.clone());
        let answer_service = AnswerService::new(pool.clone());
        let auth_service = AuthService::new(pool.clone(), http_client, config.clone());

        Self {
            pool,
            config,
            user_service,
            test_service,
            question_service,
            answer_service,
            auth_service,
        }
    }
}
