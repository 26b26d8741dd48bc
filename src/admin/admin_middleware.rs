use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use crate::{error::Result, middleware::CurrentUser};

/// Rejects non-admin callers; must run inside `auth_middleware`.
pub async fn admin_authorization(
    user: CurrentUser,
    request: Request,
    next: Next,
) -> Result<Response> {
    user.require_admin()?;
    Ok(next.run(request).await)
}
