use noshow_domain::{Admission, Denial, ID};
use noshow_infra::{NoShowContext, TenantLockGuard};
use tracing::warn;

#[derive(Debug)]
pub enum ReserveOutcome {
    Admitted(CreditReservation),
    Denied(Denial),
}

#[derive(Debug, PartialEq)]
pub enum LedgerError {
    TenantNotFound(ID),
}

/// Exclusive right to spend one credit of a `Tenant`.
///
/// The tenant lock is held until the reservation is committed or dropped, so
/// no other send for the same tenant can be admitted on a stale balance.
/// Dropping it without committing spends nothing.
pub struct CreditReservation {
    tenant_id: ID,
    _guard: TenantLockGuard,
}

impl std::fmt::Debug for CreditReservation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreditReservation")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

impl CreditReservation {
    /// Spends the reserved credit. Returns the remaining credits.
    pub async fn commit(self, ctx: &NoShowContext) -> anyhow::Result<Option<i64>> {
        let remaining = ctx.repos.tenants.decrement_credits(&self.tenant_id).await?;
        if remaining.is_none() {
            warn!(
                "Tenant: {} had no credits left when committing a reservation",
                self.tenant_id
            );
        }
        Ok(remaining)
    }
}

/// Evaluates the admission policy against a fresh read of the `Tenant`
pub async fn try_reserve(
    tenant_id: &ID,
    ctx: &NoShowContext,
) -> Result<ReserveOutcome, LedgerError> {
    let guard = ctx.tenant_locks.lock(tenant_id).await;
    let tenant = ctx
        .repos
        .tenants
        .find(tenant_id)
        .await
        .ok_or_else(|| LedgerError::TenantNotFound(tenant_id.clone()))?;

    match tenant.admission() {
        Admission::Admitted => Ok(ReserveOutcome::Admitted(CreditReservation {
            tenant_id: tenant_id.clone(),
            _guard: guard,
        })),
        Admission::Denied(denial) => Ok(ReserveOutcome::Denied(denial)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noshow_domain::{DenialReason, RemediationAction, SubscriptionState, Tenant};

    async fn insert_tenant(ctx: &NoShowContext, credits: i64, subscription: SubscriptionState) -> Tenant {
        let mut tenant = Tenant::new_trial("Smile Dental".into(), None, 0);
        tenant.credits = credits;
        tenant.subscription = subscription;
        ctx.repos.tenants.insert(&tenant).await.unwrap();
        tenant
    }

    #[actix_web::main]
    #[test]
    async fn it_spends_exactly_one_credit_on_commit() {
        let ctx = NoShowContext::create_inmemory();
        let tenant = insert_tenant(&ctx, 2, SubscriptionState::Active).await;

        let reservation = match try_reserve(&tenant.id, &ctx).await.unwrap() {
            ReserveOutcome::Admitted(reservation) => reservation,
            ReserveOutcome::Denied(denial) => panic!("Unexpected denial: {}", denial),
        };
        assert_eq!(reservation.commit(&ctx).await.unwrap(), Some(1));
    }

    #[actix_web::main]
    #[test]
    async fn dropping_a_reservation_spends_nothing() {
        let ctx = NoShowContext::create_inmemory();
        let tenant = insert_tenant(&ctx, 1, SubscriptionState::Trial).await;

        let outcome = try_reserve(&tenant.id, &ctx).await.unwrap();
        assert!(matches!(outcome, ReserveOutcome::Admitted(_)));
        drop(outcome);

        // The lock was released and the credit is still there
        let outcome = try_reserve(&tenant.id, &ctx).await.unwrap();
        assert!(matches!(outcome, ReserveOutcome::Admitted(_)));
        drop(outcome);
        assert_eq!(ctx.repos.tenants.find(&tenant.id).await.unwrap().credits, 1);
    }

    #[actix_web::main]
    #[test]
    async fn it_denies_with_a_reason_keyed_to_the_subscription() {
        let ctx = NoShowContext::create_inmemory();

        let trial = insert_tenant(&ctx, 0, SubscriptionState::Trial).await;
        match try_reserve(&trial.id, &ctx).await.unwrap() {
            ReserveOutcome::Denied(denial) => {
                assert_eq!(denial.reason, DenialReason::TrialExhausted);
                assert_eq!(denial.action, RemediationAction::Subscribe);
            }
            _ => panic!("Expected denial"),
        }

        let active = insert_tenant(&ctx, 0, SubscriptionState::Active).await;
        match try_reserve(&active.id, &ctx).await.unwrap() {
            ReserveOutcome::Denied(denial) => {
                assert_eq!(denial.reason, DenialReason::PlanExhausted);
                assert_eq!(denial.action, RemediationAction::Upgrade);
            }
            _ => panic!("Expected denial"),
        }
    }

    #[actix_web::main]
    #[test]
    async fn it_reports_missing_tenants() {
        let ctx = NoShowContext::create_inmemory();
        let tenant_id = ID::new();
        assert_eq!(
            try_reserve(&tenant_id, &ctx).await.unwrap_err(),
            LedgerError::TenantNotFound(tenant_id)
        );
    }
}
