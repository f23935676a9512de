//! Minimal axum app that signs users in through ESC.
//!
//! Export `ESC_CLIENT_ID`, `ESC_CLIENT_SECRET`, `ESC_REDIRECT_URI` (pointing at `/callback`),
//! `ESC_API_URL`, and `ESC_OAUTH_URL`, then run `cargo run --example demo_server` and open
//! `http://127.0.0.1:3000/login`.
//!
//! - `GET /login` redirects to the ESC consent page.
//! - `GET /callback?code=..` exchanges the code and returns the token response as JSON.
//! - `GET /me` requires `Authorization: Bearer <access_token>` and returns the profile.
//! - `POST /refresh` takes `{"refresh_token": ".."}` and returns a fresh token response.

// std
use std::sync::Arc;
// crates.io
use axum::{
	Json, Router,
	extract::{Query, State},
	middleware,
	response::Redirect,
	routing::{get, post},
};
use color_eyre::Result;
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
// self
use esc_oauth::{
	auth::{Profile, TokenResponse},
	client::ReqwestEscClient,
	config::ClientConfigBuilder,
	error::Error,
	middleware::{BearerToken, require_bearer},
};

type AppState = Arc<ReqwestEscClient>;

#[derive(Deserialize)]
struct CallbackQuery {
	code: String,
}

#[derive(Deserialize)]
struct RefreshRequest {
	refresh_token: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let config = ClientConfigBuilder::from_env().build()?;
	let client: AppState = Arc::new(ReqwestEscClient::new(config));
	let protected =
		Router::new().route("/me", get(me)).route_layer(middleware::from_fn(require_bearer));
	let app = Router::new()
		.route("/login", get(login))
		.route("/callback", get(callback))
		.route("/refresh", post(refresh))
		.merge(protected)
		.with_state(client);
	let listener = TcpListener::bind("127.0.0.1:3000").await?;

	tracing::info!("Listening on http://{}.", listener.local_addr()?);

	axum::serve(listener, app).await?;

	Ok(())
}

async fn login(State(client): State<AppState>) -> Redirect {
	Redirect::to(client.default_authorization_url().as_str())
}

async fn callback(
	State(client): State<AppState>,
	Query(query): Query<CallbackQuery>,
) -> Result<Json<TokenResponse>, Error> {
	Ok(Json(client.exchange_code(&query.code).await?))
}

async fn me(State(client): State<AppState>, token: BearerToken) -> Result<Json<Profile>, Error> {
	Ok(Json(client.fetch_profile(token.secret()).await?))
}

async fn refresh(
	State(client): State<AppState>,
	Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, Error> {
	Ok(Json(client.refresh_token(&request.refresh_token).await?))
}
