use std::future::Future;

use crewcall_ports::error::PortError;
use crewcall_ports::outbound::SessionGate;

use crate::error::AppError;

/// Run a backend call with the expired-session policy: on an unauthorized
/// response, refresh the session once and retry the call exactly once. A
/// failed refresh (or a second unauthorized) abandons the operation as
/// `SessionExpired`, which forces logout upstream.
pub async fn with_session_retry<S, T, F, Fut>(session: &S, call: F) -> Result<T, AppError>
where
    S: SessionGate,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, PortError>>,
{
    match call().await {
        Err(PortError::Unauthorized) => {
            if session.refresh().await.is_err() {
                return Err(AppError::SessionExpired);
            }
            call().await.map_err(|e| match e {
                PortError::Unauthorized => AppError::SessionExpired,
                other => AppError::Port(other),
            })
        }
        other => other.map_err(AppError::from),
    }
}
