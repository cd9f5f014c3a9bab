//! VIP entitlement gate

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;

/// Entitlement service
pub struct EntitlementService {
    ctx: Arc<ServiceContext>,
}

impl EntitlementService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Whether the account may bind domains.
    ///
    /// Fails open on query errors; an expired credential propagates.
    pub async fn check(&self) -> CoreResult<bool> {
        match self.ctx.api.check_entitlement().await {
            Ok(is_vip) => Ok(is_vip),
            Err(e) if e.is_credential_expired() => Err(CoreError::CredentialExpired),
            Err(e) => {
                log::warn!("Entitlement check failed, continuing: {e}");
                Ok(true)
            }
        }
    }

    /// `Ok(())` when entitled, `EntitlementDenied` otherwise
    pub async fn ensure(&self) -> CoreResult<()> {
        if self.check().await? {
            Ok(())
        } else {
            Err(CoreError::EntitlementDenied)
        }
    }
}
