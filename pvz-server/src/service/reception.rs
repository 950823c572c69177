//! Reception state machine
//!
//! ```text
//!   NoOpenReception --open--> Open --close--> Closed (terminal)
//! ```
//!
//! Both transitions are single conditional writes in the store; concurrent
//! opens for one pickup point cannot both succeed.

use shared::error::AppResult;
use shared::models::Reception;
use uuid::Uuid;

use crate::db::PvzStore;
use crate::metrics::{RECEPTIONS_CREATED_TOTAL, counter};

/// Open a reception. Conflict when one is already in progress.
pub async fn open(store: &dyn PvzStore, pvz_id: Uuid) -> AppResult<Reception> {
    let reception = store.open_reception(pvz_id, shared::util::now()).await?;

    counter!(RECEPTIONS_CREATED_TOTAL).increment(1);
    tracing::info!(pvz_id = %pvz_id, reception_id = %reception.id, "Reception opened");
    Ok(reception)
}

/// Close the reception in progress. Not idempotent: a second close fails
/// with `NoActiveReception`.
pub async fn close(store: &dyn PvzStore, pvz_id: Uuid) -> AppResult<Reception> {
    let reception = store
        .close_open_reception(pvz_id, shared::util::now())
        .await?;

    tracing::info!(pvz_id = %pvz_id, reception_id = %reception.id, "Reception closed");
    Ok(reception)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use shared::error::ErrorCode;
    use shared::models::ReceptionStatus;

    #[tokio::test]
    async fn test_open_close_cycle() {
        let store = MemoryStore::new();
        let pvz = crate::service::pickup_point::create(&store, "Kazan")
            .await
            .unwrap();

        let opened = open(&store, pvz.id).await.unwrap();
        assert_eq!(opened.status, ReceptionStatus::Open);

        let err = open(&store, pvz.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReceptionAlreadyOpen);

        let closed = close(&store, pvz.id).await.unwrap();
        assert_eq!(closed.id, opened.id);
        assert_eq!(closed.status, ReceptionStatus::Closed);

        let err = close(&store, pvz.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NoActiveReception);

        // A closed reception frees the slot.
        let reopened = open(&store, pvz.id).await.unwrap();
        assert_ne!(reopened.id, opened.id);
    }

    #[tokio::test]
    async fn test_open_unknown_pickup_point() {
        let store = MemoryStore::new();
        let err = open(&store, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PickupPointNotFound);
    }
}
