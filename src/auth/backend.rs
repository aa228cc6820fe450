use super::{
    postgres::PgAuthService,
    procedure::{AuthService, ProcedureCall},
    response::RpcResponse,
    rest::RestAuthService,
};
use tracing::error;

/// Transport chosen at startup from `--api-url` or `--dsn`.
#[derive(Clone, Debug)]
pub enum Backend {
    Rest(RestAuthService),
    Postgres(PgAuthService),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DependencyStatus {
    Ok,
    Error,
    /// The transport has no cheap liveness probe.
    Unchecked,
}

impl DependencyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Unchecked => "unchecked",
        }
    }

    #[must_use]
    pub const fn is_healthy(self) -> bool {
        !matches!(self, Self::Error)
    }
}

impl Backend {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Rest(_) => "rest",
            Self::Postgres(_) => "postgres",
        }
    }

    pub async fn dependency_status(&self) -> DependencyStatus {
        match self {
            Self::Rest(_) => DependencyStatus::Unchecked,
            Self::Postgres(service) => match service.ping().await {
                Ok(()) => DependencyStatus::Ok,
                Err(err) => {
                    error!("Database health check failed: {:#}", err);

                    DependencyStatus::Error
                }
            },
        }
    }
}

impl AuthService for Backend {
    async fn call(&self, call: ProcedureCall) -> RpcResponse {
        match self {
            Self::Rest(service) => service.call(call).await,
            Self::Postgres(service) => service.call(call).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_status_strings() {
        assert_eq!(DependencyStatus::Ok.as_str(), "ok");
        assert_eq!(DependencyStatus::Error.as_str(), "error");
        assert_eq!(DependencyStatus::Unchecked.as_str(), "unchecked");
        assert!(DependencyStatus::Unchecked.is_healthy());
        assert!(!DependencyStatus::Error.is_healthy());
    }

    #[tokio::test]
    async fn rest_backend_is_unchecked() -> anyhow::Result<()> {
        let backend = Backend::Rest(RestAuthService::new("http://127.0.0.1:1", None)?);
        assert_eq!(backend.kind(), "rest");
        assert_eq!(backend.dependency_status().await, DependencyStatus::Unchecked);
        Ok(())
    }
}
