use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value as JsonValue};
use tokio::net::TcpListener;
use tower::ServiceExt;
use uuid::Uuid;

use quiz_backend::{
    config::Config, database::pool::create_pool, dto::user_dto::CreateUserPayload, routes,
    utils::token, AppState,
};

async fn setup() -> Option<(Router, AppState)> {
    dotenvy::dotenv().ok();
    if env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping end-to-end test");
        return None;
    }
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("JWT_ALGORITHM", "HS256");
    env::set_var("JWT_TTL_MINUTES", "60");
    env::set_var("GOOGLE_CLIENT_ID", "test-client-id");
    env::set_var("GOOGLE_CLIENT_SECRET", "test-client-secret");

    let config = Config::from_env().expect("config");
    let pool = create_pool(&config).await.expect("pool");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");

    let state = AppState::new(pool, config);
    Some((routes::router(state.clone()), state))
}

async fn seed_actor(state: &AppState) -> (Uuid, String) {
    let user = state
        .user_service
        .create(CreateUserPayload {
            name: "Seed".into(),
            surname: "Actor".into(),
            email: format!("actor_{}@example.com", Uuid::new_v4()),
        })
        .await
        .expect("seed actor");
    let access_token = token::issue(&user, &state.config).expect("sign token");
    (user.guid, access_token)
}

fn request(method: &str, uri: &str, bearer: Option<&str>, body: Option<JsonValue>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", bearer));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_or_invalid_token_is_challenged() {
    let Some((app, _state)) = setup().await else {
        return;
    };

    let response = app
        .clone()
        .oneshot(request("GET", "/user", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );

    let response = app
        .oneshot(request("GET", "/user", Some("garbage"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
}

#[tokio::test]
async fn crud_graph_flow() {
    let Some((app, state)) = setup().await else {
        return;
    };
    let (actor, bearer) = seed_actor(&state).await;

    // Test -> Question -> Answer, then the full graph in one fetch.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/test",
            Some(&bearer),
            Some(json!({"title": "T1"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let test = body_json(response).await;
    assert_eq!(test["createdBy"], json!(actor.to_string()));
    let test_id = test["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/question",
            Some(&bearer),
            Some(json!({"testGuid": test_id, "title": "Q1", "type": "single"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let question = body_json(response).await;
    let question_id = question["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/answer",
            Some(&bearer),
            Some(json!({"questionGuid": question_id, "text": "A", "isCorrect": true})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let answer = body_json(response).await;
    let answer_id = answer["id"].as_str().unwrap().to_string();
    assert_eq!(answer["isCorrect"], json!(true));

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/test/{}", test_id),
            Some(&bearer),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let graph = body_json(response).await;
    assert_eq!(graph["questions"].as_array().unwrap().len(), 1);
    assert_eq!(graph["questions"][0]["id"], json!(question_id));
    assert_eq!(graph["questions"][0]["answers"][0]["id"], json!(answer_id));

    // Creating a question under an unknown test fails before any write.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/question",
            Some(&bearer),
            Some(json!({"testGuid": Uuid::new_v4(), "title": "Q", "type": "single"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Patch changes only the named field; update overwrites every field.
    let response = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/question/{}", question_id),
            Some(&bearer),
            Some(json!({"title": "Q1 patched"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let patched = body_json(response).await;
    assert_eq!(patched["title"], json!("Q1 patched"));
    assert_eq!(patched["type"], json!("single"));
    assert_eq!(patched["updatedBy"], json!(actor.to_string()));
    assert_eq!(patched["created"], question["created"]);

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/question/{}", question_id),
            Some(&bearer),
            Some(json!({"testGuid": test_id, "title": "Q1 replaced", "type": "multi"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let replaced = body_json(response).await;
    assert_eq!(replaced["title"], json!("Q1 replaced"));
    assert_eq!(replaced["type"], json!("multi"));

    // Soft-delete: the question disappears from reads, the test keeps an
    // empty question list, and the row survives with its tombstone set.
    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/question/{}", question_id),
            Some(&bearer),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/question/{}", question_id),
            Some(&bearer),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/test/{}", test_id),
            Some(&bearer),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let graph = body_json(response).await;
    assert!(graph["questions"].as_array().unwrap().is_empty());

    let tombstone: i32 = sqlx::query_scalar("SELECT is_deleted FROM question WHERE guid = $1")
        .bind(Uuid::parse_str(&question_id).unwrap())
        .fetch_one(&state.pool)
        .await
        .unwrap();
    assert_eq!(tombstone, 1);

    // Deleting again targets a tombstoned row: NotFound before any write.
    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/question/{}", question_id),
            Some(&bearer),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sub_text_patch_distinguishes_null_from_omitted() {
    let Some((app, state)) = setup().await else {
        return;
    };
    let (_actor, bearer) = seed_actor(&state).await;

    let test = body_json(
        app.clone()
            .oneshot(request(
                "POST",
                "/test",
                Some(&bearer),
                Some(json!({"title": "T"})),
            ))
            .await
            .unwrap(),
    )
    .await;
    let question = body_json(
        app.clone()
            .oneshot(request(
                "POST",
                "/question",
                Some(&bearer),
                Some(json!({"testGuid": test["id"], "title": "Q", "type": "single"})),
            ))
            .await
            .unwrap(),
    )
    .await;
    let answer = body_json(
        app.clone()
            .oneshot(request(
                "POST",
                "/answer",
                Some(&bearer),
                Some(json!({
                    "questionGuid": question["id"],
                    "text": "A",
                    "subText": "hint",
                    "isCorrect": false
                })),
            ))
            .await
            .unwrap(),
    )
    .await;
    let answer_id = answer["id"].as_str().unwrap().to_string();

    // Omitted subText stays untouched.
    let patched = body_json(
        app.clone()
            .oneshot(request(
                "PATCH",
                &format!("/answer/{}", answer_id),
                Some(&bearer),
                Some(json!({"text": "A2"})),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(patched["subText"], json!("hint"));

    // Explicit null clears it.
    let patched = body_json(
        app.clone()
            .oneshot(request(
                "PATCH",
                &format!("/answer/{}", answer_id),
                Some(&bearer),
                Some(json!({"subText": null})),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(patched["subText"], JsonValue::Null);
    assert_eq!(patched["text"], json!("A2"));
}

#[tokio::test]
async fn pagination_windows_are_disjoint_and_exhaustive() {
    let Some((app, state)) = setup().await else {
        return;
    };
    let (_actor, bearer) = seed_actor(&state).await;

    let test = body_json(
        app.clone()
            .oneshot(request(
                "POST",
                "/test",
                Some(&bearer),
                Some(json!({"title": "Paginated"})),
            ))
            .await
            .unwrap(),
    )
    .await;
    let question = body_json(
        app.clone()
            .oneshot(request(
                "POST",
                "/question",
                Some(&bearer),
                Some(json!({"testGuid": test["id"], "title": "Q", "type": "single"})),
            ))
            .await
            .unwrap(),
    )
    .await;

    let mut created: Vec<String> = Vec::new();
    for i in 0..4 {
        let answer = body_json(
            app.clone()
                .oneshot(request(
                    "POST",
                    "/answer",
                    Some(&bearer),
                    Some(json!({
                        "questionGuid": question["id"],
                        "text": format!("A{}", i),
                        "isCorrect": false
                    })),
                ))
                .await
                .unwrap(),
        )
        .await;
        created.push(answer["id"].as_str().unwrap().to_string());
    }

    let ids_filter: String = created
        .iter()
        .map(|id| format!("ids={}", id))
        .collect::<Vec<_>>()
        .join("&");

    let mut seen: Vec<String> = Vec::new();
    for offset in [0, 2] {
        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/answer?{}&limit=2&offset={}", ids_filter, offset),
                Some(&bearer),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-pagination-count").unwrap(),
            "4"
        );
        assert_eq!(
            response.headers().get("x-pagination-limit").unwrap(),
            "2"
        );
        assert_eq!(
            response
                .headers()
                .get("x-pagination-offset")
                .unwrap()
                .to_str()
                .unwrap(),
            offset.to_string()
        );
        let page = body_json(response).await;
        let page = page.as_array().unwrap();
        assert_eq!(page.len(), 2);
        for item in page {
            seen.push(item["id"].as_str().unwrap().to_string());
        }
    }

    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 4);
    created.sort();
    assert_eq!(seen, created);

    // Out-of-range limit lands in the validation envelope.
    let response = app
        .clone()
        .oneshot(request("GET", "/answer?limit=1001", Some(&bearer), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], json!("Request validation failed"));
}

#[tokio::test]
async fn login_provisions_exactly_one_user() {
    let Some((_app, state)) = setup().await else {
        return;
    };

    let email = format!("fresh_{}@example.com", Uuid::new_v4());
    let claims_email = email.clone();
    let stub = Router::new().route(
        "/tokeninfo",
        get(move || {
            let email = claims_email.clone();
            async move {
                Json(json!({
                    "aud": "test-client-id",
                    "email": email,
                    "given_name": "Grace",
                    "family_name": "Hopper"
                }))
            }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub).await.unwrap();
    });

    let auth = state
        .auth_service
        .clone()
        .with_tokeninfo_url(format!("http://{}/tokeninfo", addr));

    let first = auth.login("stub-id-token").await.unwrap();
    let second = auth.login("stub-id-token").await.unwrap();

    let first_claims = token::decode_claims(&first.access_token, &state.config).unwrap();
    let second_claims = token::decode_claims(&second.access_token, &state.config).unwrap();
    assert_eq!(first_claims.sub, second_claims.sub);
    assert_eq!(first_claims.email, email);

    let provisioned: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(guid) FROM "user" WHERE email = $1"#)
            .bind(&email)
            .fetch_one(&state.pool)
            .await
            .unwrap();
    assert_eq!(provisioned, 1);

    let resolved = state.user_service.get_one(first_claims.sub).await.unwrap();
    assert_eq!(resolved.email, email);
}
