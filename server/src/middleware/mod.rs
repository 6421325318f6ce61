use crate::error::AppError;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware,
    response::Response,
};
use portero::{Decision, Gatekeeper};
use std::{net::SocketAddr, sync::Arc};

/// Runs before every route; only requests whose resolved origin is on the
/// allow-list get past it.
pub async fn ip_gatekeeper(
    State(gatekeeper): State<Arc<Gatekeeper>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: middleware::Next,
) -> Result<Response, AppError> {
    match gatekeeper.evaluate(request.headers(), peer.ip()) {
        Decision::Allow { addr } => {
            tracing::info!("Allowing request from IP: {addr}");
            Ok(next.run(request).await)
        }
        Decision::Deny { addr } => {
            tracing::info!("Denying request from IP: {addr}");
            Err((
                StatusCode::FORBIDDEN,
                format!("Acceso prohibido: Su dirección IP ({addr}) no está autorizada."),
            )
                .into())
        }
    }
}
