use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    auth::{bearer_token, TokenAuthority},
    error::AppError,
};

/// Rejects the request unless it carries a valid bearer token, then hands the
/// caller's [`Identity`](crate::auth::Identity) to the handler.
///
/// Without an authority every request is refused.
pub async fn auth_middleware(
    State(authority): State<Option<TokenAuthority>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authority =
        authority.ok_or(AppError::Unauthorized("Authentication is not configured"))?;
    let identity = authority.verify(bearer_token(request.headers())?)?;

    tracing::Span::current().record("user_id", identity.subject.as_str());
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
