//! Admin route handlers.
//!
//! ```text
//! GET  /        - Dashboard (requires session)
//! GET  /login   - Login page
//! POST /login   - Verify password, start session
//! POST /logout  - End session
//! ```

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AdminError, Result};
use crate::session::{RequireAdmin, SIGNED_IN_KEY};
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub product_count: i64,
    pub out_of_stock_count: i64,
    pub order_count: i64,
    pub pending_order_count: i64,
}

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub password: String,
}

/// Create all routes for the admin shell.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

/// Display the login page.
pub async fn login_page() -> LoginTemplate {
    LoginTemplate { error: None }
}

/// Verify the password and start a session.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<axum::response::Response> {
    let hash = state.config().password_hash.expose_secret().to_string();

    // Argon2 verification is CPU-bound; keep it off the async executor
    let verified = tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash)
            .map_err(|e| AdminError::Internal(format!("bad ADMIN_PASSWORD_HASH: {e}")))?;
        Ok::<bool, AdminError>(
            Argon2::default()
                .verify_password(form.password.as_bytes(), &parsed)
                .is_ok(),
        )
    })
    .await
    .map_err(|e| AdminError::Internal(e.to_string()))??;

    if !verified {
        tracing::warn!("Failed admin login attempt");
        return Ok(LoginTemplate {
            error: Some("Incorrect password".to_string()),
        }
        .into_response());
    }

    // Rotate the session ID on privilege change
    session.cycle_id().await?;
    session.insert(SIGNED_IN_KEY, true).await?;

    tracing::info!("Admin signed in");
    Ok(Redirect::to("/").into_response())
}

/// End the session.
pub async fn logout(session: Session) -> Result<Redirect> {
    session.flush().await?;
    Ok(Redirect::to("/login"))
}

/// Dashboard: live catalog and order counts.
pub async fn dashboard(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<DashboardTemplate> {
    let pool = state.pool();

    let product_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
        .fetch_one(pool)
        .await?;
    let out_of_stock_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE stock = 0")
            .fetch_one(pool)
            .await?;
    let order_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM \"order\"")
        .fetch_one(pool)
        .await?;
    let pending_order_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM \"order\" WHERE status = 'pending'")
            .fetch_one(pool)
            .await?;

    Ok(DashboardTemplate {
        product_count,
        out_of_stock_count,
        order_count,
        pending_order_count,
    })
}
