use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};

use crate::{
    auth::extractors::AuthUser,
    i18n::{localize, Locale, MessageKey},
    response::{ErrorReply, ResponseBody},
    state::AppState,
    users::{
        dto::{CreateUserRequest, LoginRequest, TokenData},
        repo_types::User,
        services::UserError,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/user/me", get(me))
}

fn reply(err: UserError, locale: Locale) -> ErrorReply {
    match err {
        UserError::ValidationFailed(v) => ErrorReply::bad_request(v.message(locale)),
        UserError::AlreadyExists => {
            ErrorReply::bad_request(localize(MessageKey::AlreadyExists, locale))
        }
        UserError::NotFound => ErrorReply::bad_request(localize(MessageKey::NotFound, locale)),
        UserError::WrongPassword => {
            ErrorReply::bad_request(localize(MessageKey::WrongPassword, locale))
        }
        UserError::Internal(e) => {
            error!(error = ?e, "internal error");
            ErrorReply::internal(locale)
        }
    }
}

fn decode<T>(payload: Result<Json<T>, JsonRejection>, locale: Locale) -> Result<T, ErrorReply> {
    payload.map(|Json(body)| body).map_err(|e| {
        warn!(error = %e, "failed to decode JSON body");
        ErrorReply::bad_request(localize(MessageKey::FailedDecodeJson, locale))
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    locale: Locale,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ResponseBody<TokenData>>), ErrorReply> {
    let req = decode(payload, locale)?;
    let data = state.users.create(req).await.map_err(|e| reply(e, locale))?;
    Ok((StatusCode::CREATED, Json(ResponseBody::success(locale, data))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    locale: Locale,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ResponseBody<TokenData>>, ErrorReply> {
    let req = decode(payload, locale)?;
    let data = state.users.login(req).await.map_err(|e| reply(e, locale))?;
    Ok(Json(ResponseBody::success(locale, data)))
}

#[instrument(skip(state, auth))]
pub async fn me(
    State(state): State<AppState>,
    locale: Locale,
    auth: AuthUser,
) -> Result<Json<ResponseBody<User>>, ErrorReply> {
    let AuthUser(uid) = auth;
    let user = state.users.profile(&uid).await.map_err(|e| reply(e, locale))?;
    Ok(Json(ResponseBody::success(locale, user)))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request},
    };
    use serde_json::{json, Value};
    use time::macros::date;
    use tower::ServiceExt;

    use super::*;
    use crate::app::build_app;
    use crate::users::{
        repo::UserRepository,
        repo_types::{NewUser, Sex},
    };

    async fn call(app: &Router, req: Request<Body>) -> (StatusCode, ResponseBody<Value>) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn tav() -> Value {
        json!({
            "name": "Tav",
            "email": "e@x.com",
            "username": "tavishere",
            "password": "Pass12345!",
            "sex": "female",
            "birthdate": "1999-10-23"
        })
    }

    #[tokio::test]
    async fn register_then_login_scenario() {
        let (state, _repo) = AppState::fake();
        let app = build_app(state);

        let (status, body) = call(&app, post("/v1/user/register", tav())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.code, "SUCCESS");
        let token = body.data.unwrap()["token"].as_str().unwrap().to_owned();
        assert!(!token.is_empty());

        let (status, body) = call(&app, post("/v1/user/register", tav())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "4XX");
        assert_eq!(body.message, "User already exists");
        assert!(body.data.is_none());

        let wrong = json!({ "username": "tavishere", "password": "Wrong12345!" });
        let (status, body) = call(&app, post("/v1/user/login", wrong)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Wrong password");

        let unknown = json!({ "username": "nobodyhere", "password": "Pass12345!" });
        let (status, body) = call(&app, post("/v1/user/login", unknown)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "User not found");

        let good = json!({ "username": "tavishere", "password": "Pass12345!" });
        let (status, body) = call(&app, post("/v1/user/login", good)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.code, "SUCCESS");
        assert!(body.data.unwrap()["token"].as_str().is_some());
    }

    #[tokio::test]
    async fn register_validation_error_is_field_specific() {
        let (state, repo) = AppState::fake();
        let app = build_app(state);

        let mut payload = tav();
        payload["name"] = json!("a");
        let (status, body) = call(&app, post("/v1/user/register", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "4XX");
        assert_eq!(body.message, "name: the length must be between 3 and 50");
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn undecodable_json_is_bad_request() {
        let (state, _repo) = AppState::fake();
        let app = build_app(state);

        let req = Request::builder()
            .method(Method::POST)
            .uri("/v1/user/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Failed to decode JSON");
    }

    #[tokio::test]
    async fn messages_follow_accept_language() {
        let (state, _repo) = AppState::fake();
        let app = build_app(state);

        let mut req = post(
            "/v1/user/login",
            json!({ "username": "nobodyhere", "password": "Pass12345!" }),
        );
        req.headers_mut()
            .insert(header::ACCEPT_LANGUAGE, "id".parse().unwrap());
        let (_, body) = call(&app, req).await;
        assert_eq!(body.message, "User tidak ditemukan");

        let req = post(
            "/v1/user/login",
            json!({ "username": "nobodyhere", "password": "Pass12345!" }),
        );
        let (_, body) = call(&app, req).await;
        assert_eq!(body.message, "User not found");
    }

    #[tokio::test]
    async fn store_failure_is_generic_internal_error() {
        let (state, repo) = AppState::fake();
        let app = build_app(state);
        *repo.fail_with.lock().unwrap() = Some("db is down at 10.0.0.5".into());

        let (status, body) = call(&app, post("/v1/user/register", tav())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "5XX");
        assert_eq!(body.message, "Internal server error");
    }

    #[tokio::test]
    async fn login_with_corrupt_stored_hash_is_internal_error() {
        let (state, repo) = AppState::fake();
        let app = build_app(state);
        repo.create(&NewUser {
            uid: "AbCdEf0123456789".into(),
            name: "Tav".into(),
            email: "e@x.com".into(),
            username: "tavishere".into(),
            hashed_password: "not-a-phc-string".into(),
            sex: Sex::Female,
            birthdate: date!(1999 - 10 - 23),
        })
        .await
        .unwrap();

        let creds = json!({ "username": "tavishere", "password": "Pass12345!" });
        let (status, body) = call(&app, post("/v1/user/login", creds)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "5XX");
        assert_eq!(body.message, "Internal server error");
        assert!(body.data.is_none());
    }

    #[tokio::test]
    async fn me_requires_valid_bearer_token() {
        let (state, _repo) = AppState::fake();
        let app = build_app(state);

        let (_, body) = call(&app, post("/v1/user/register", tav())).await;
        let token = body.data.unwrap()["token"].as_str().unwrap().to_owned();

        let req = Request::builder()
            .uri("/v1/user/me")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        let user = body.data.unwrap();
        assert_eq!(user["username"], "tavishere");
        assert_eq!(user["birthdate"], "1999-10-23");
        assert_eq!(user["sex"], "female");
        assert_eq!(user["verified"], false);
        assert!(user.get("hashed_password").is_none());

        let req = Request::builder().uri("/v1/user/me").body(Body::empty()).unwrap();
        let (status, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.code, "4XX");

        let req = Request::builder()
            .uri("/v1/user/me")
            .header(header::AUTHORIZATION, "Bearer not.a.token")
            .body(Body::empty())
            .unwrap();
        let (status, _) = call(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
