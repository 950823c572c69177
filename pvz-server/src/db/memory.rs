//! In-memory store
//!
//! Same guarantees as [`PgStore`](super::PgStore): each operation runs under
//! one lock, so guard checks and writes are atomic. Used by tests and by
//! `STORAGE=memory`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use shared::models::{City, PickupPoint, Product, ProductType, Reception, ReceptionStatus, Role};
use uuid::Uuid;

use super::{DateRange, JoinedRow, PvzStore, StoreError, StoreResult, UserRecord};

/// Row wrapper carrying the insertion sequence
#[derive(Debug, Clone)]
struct Seq<T> {
    seq: u64,
    value: T,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    pvz: Vec<Seq<PickupPoint>>,
    receptions: Vec<Seq<Reception>>,
    products: Vec<Seq<Product>>,
    /// reception id -> close time, the `closed_at` column of the SQL schema
    closed_at: HashMap<Uuid, DateTime<Utc>>,
    users: HashMap<String, UserRecord>,
}

impl Inner {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn open_reception_index(&self, pvz_id: Uuid) -> Option<usize> {
        self.receptions
            .iter()
            .position(|r| r.value.pvz_id == pvz_id && r.value.status.is_open())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PvzStore for MemoryStore {
    async fn create_pickup_point(&self, city: City, now: DateTime<Utc>) -> StoreResult<PickupPoint> {
        let mut inner = self.inner.lock();
        let pvz = PickupPoint {
            id: Uuid::new_v4(),
            registration_date: now,
            city,
        };
        let seq = inner.next_seq();
        inner.pvz.push(Seq {
            seq,
            value: pvz.clone(),
        });
        Ok(pvz)
    }

    async fn open_reception(&self, pvz_id: Uuid, now: DateTime<Utc>) -> StoreResult<Reception> {
        let mut inner = self.inner.lock();
        if !inner.pvz.iter().any(|p| p.value.id == pvz_id) {
            return Err(StoreError::PickupPointNotFound);
        }
        if inner.open_reception_index(pvz_id).is_some() {
            return Err(StoreError::ReceptionAlreadyOpen);
        }
        let reception = Reception {
            id: Uuid::new_v4(),
            date_time: now,
            pvz_id,
            status: ReceptionStatus::Open,
        };
        let seq = inner.next_seq();
        inner.receptions.push(Seq {
            seq,
            value: reception.clone(),
        });
        Ok(reception)
    }

    async fn close_open_reception(&self, pvz_id: Uuid, now: DateTime<Utc>) -> StoreResult<Reception> {
        let mut inner = self.inner.lock();
        let idx = inner
            .open_reception_index(pvz_id)
            .ok_or(StoreError::NoActiveReception)?;
        let reception = &mut inner.receptions[idx].value;
        reception.status = reception
            .status
            .close()
            .ok_or(StoreError::NoActiveReception)?;
        let reception = reception.clone();
        inner.closed_at.insert(reception.id, now);
        Ok(reception)
    }

    async fn add_product(
        &self,
        pvz_id: Uuid,
        product_type: ProductType,
        now: DateTime<Utc>,
    ) -> StoreResult<Product> {
        let mut inner = self.inner.lock();
        let idx = inner
            .open_reception_index(pvz_id)
            .ok_or(StoreError::NoActiveReception)?;
        let product = Product {
            id: Uuid::new_v4(),
            date_time: now,
            product_type,
            reception_id: inner.receptions[idx].value.id,
        };
        let seq = inner.next_seq();
        inner.products.push(Seq {
            seq,
            value: product.clone(),
        });
        Ok(product)
    }

    async fn remove_last_product(&self, pvz_id: Uuid) -> StoreResult<Product> {
        let mut inner = self.inner.lock();
        let idx = inner
            .open_reception_index(pvz_id)
            .ok_or(StoreError::NoActiveReception)?;
        let reception_id = inner.receptions[idx].value.id;

        let last = inner
            .products
            .iter()
            .enumerate()
            .filter(|(_, p)| p.value.reception_id == reception_id)
            .max_by_key(|(_, p)| (p.value.date_time, p.seq))
            .map(|(i, _)| i)
            .ok_or(StoreError::NoProductsToDelete)?;

        Ok(inner.products.remove(last).value)
    }

    async fn joined_rows(&self, range: DateRange) -> StoreResult<Vec<JoinedRow>> {
        let inner = self.inner.lock();
        let mut rows = Vec::new();

        // Newest insertion first at every level, matching the SQL ORDER BY.
        for pvz in inner.pvz.iter().rev() {
            let mut receptions = inner
                .receptions
                .iter()
                .rev()
                .filter(|r| r.value.pvz_id == pvz.value.id && range.contains(r.value.date_time))
                .peekable();

            if receptions.peek().is_none() {
                rows.push(JoinedRow {
                    pvz: pvz.value.clone(),
                    reception: None,
                    product: None,
                });
                continue;
            }

            for reception in receptions {
                let mut products = inner
                    .products
                    .iter()
                    .rev()
                    .filter(|p| p.value.reception_id == reception.value.id)
                    .peekable();

                if products.peek().is_none() {
                    rows.push(JoinedRow {
                        pvz: pvz.value.clone(),
                        reception: Some(reception.value.clone()),
                        product: None,
                    });
                    continue;
                }

                for product in products {
                    rows.push(JoinedRow {
                        pvz: pvz.value.clone(),
                        reception: Some(reception.value.clone()),
                        product: Some(product.value.clone()),
                    });
                }
            }
        }

        Ok(rows)
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> StoreResult<UserRecord> {
        let mut inner = self.inner.lock();
        if inner.users.contains_key(email) {
            return Err(StoreError::UserAlreadyExists);
        }
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: now,
        };
        inner.users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.inner.lock().users.get(email).cloned())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[tokio::test]
    async fn test_open_requires_existing_pickup_point() {
        let store = MemoryStore::new();
        let err = store.open_reception(Uuid::new_v4(), t(0)).await.unwrap_err();
        assert!(matches!(err, StoreError::PickupPointNotFound));
    }

    #[tokio::test]
    async fn test_second_open_conflicts() {
        let store = MemoryStore::new();
        let pvz = store.create_pickup_point(City::Kazan, t(0)).await.unwrap();
        store.open_reception(pvz.id, t(1)).await.unwrap();
        let err = store.open_reception(pvz.id, t(2)).await.unwrap_err();
        assert!(matches!(err, StoreError::ReceptionAlreadyOpen));
        assert_eq!(store.inner.lock().receptions.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_breaks_timestamp_ties_by_insertion_order() {
        let store = MemoryStore::new();
        let pvz = store.create_pickup_point(City::Moscow, t(0)).await.unwrap();
        store.open_reception(pvz.id, t(1)).await.unwrap();
        let first = store
            .add_product(pvz.id, ProductType::Shoes, t(5))
            .await
            .unwrap();
        let second = store
            .add_product(pvz.id, ProductType::Clothing, t(5))
            .await
            .unwrap();

        assert_eq!(store.remove_last_product(pvz.id).await.unwrap(), second);
        assert_eq!(store.remove_last_product(pvz.id).await.unwrap(), first);
        assert!(matches!(
            store.remove_last_product(pvz.id).await.unwrap_err(),
            StoreError::NoProductsToDelete
        ));
    }

    #[tokio::test]
    async fn test_remove_uses_timestamp_before_insertion_order() {
        let store = MemoryStore::new();
        let pvz = store.create_pickup_point(City::Moscow, t(0)).await.unwrap();
        store.open_reception(pvz.id, t(1)).await.unwrap();
        let newer = store
            .add_product(pvz.id, ProductType::Shoes, t(10))
            .await
            .unwrap();
        store
            .add_product(pvz.id, ProductType::Shoes, t(10) - Duration::seconds(5))
            .await
            .unwrap();

        assert_eq!(store.remove_last_product(pvz.id).await.unwrap(), newer);
    }

    #[tokio::test]
    async fn test_joined_rows_filters_receptions_not_pickup_points() {
        let store = MemoryStore::new();
        let a = store.create_pickup_point(City::Moscow, t(0)).await.unwrap();
        let b = store.create_pickup_point(City::Kazan, t(1)).await.unwrap();
        store.open_reception(a.id, t(100)).await.unwrap();
        store
            .add_product(a.id, ProductType::Electronics, t(101))
            .await
            .unwrap();

        let range = DateRange {
            start: Some(t(200)),
            end: None,
        };
        let rows = store.joined_rows(range).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pvz.id, b.id);
        assert_eq!(rows[1].pvz.id, a.id);
        assert!(rows.iter().all(|r| r.reception.is_none() && r.product.is_none()));
    }

    #[tokio::test]
    async fn test_close_records_close_time() {
        let store = MemoryStore::new();
        let pvz = store.create_pickup_point(City::Kazan, t(0)).await.unwrap();
        let opened = store.open_reception(pvz.id, t(1)).await.unwrap();
        assert!(store.inner.lock().closed_at.is_empty());

        let closed = store.close_open_reception(pvz.id, t(9)).await.unwrap();
        assert_eq!(closed.id, opened.id);
        assert_eq!(store.inner.lock().closed_at.get(&opened.id), Some(&t(9)));

        // A failed second close leaves the recorded time alone
        store.close_open_reception(pvz.id, t(20)).await.unwrap_err();
        assert_eq!(store.inner.lock().closed_at.get(&opened.id), Some(&t(9)));
    }

    #[tokio::test]
    async fn test_duplicate_user_email() {
        let store = MemoryStore::new();
        store
            .create_user("a@b.c", "hash", Role::Employee, t(0))
            .await
            .unwrap();
        let err = store
            .create_user("a@b.c", "hash", Role::Moderator, t(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UserAlreadyExists));
    }
}
