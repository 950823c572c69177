//! Pickup point listing
//!
//! One flat join is folded into `pvz -> receptions -> products` with an
//! arena per level (a `Vec` for order plus an id index for lookup), then
//! every level is sorted newest first and only the outer level is paged.
//!
//! The join repeats a pickup point once per (reception, product) pair, and
//! a reception once per product. The fold therefore keys every level by id
//! and drops repeated product ids, so the result does not depend on the
//! join producing each triple exactly once.

use std::collections::{HashMap, HashSet};

use shared::error::AppResult;
use shared::models::{PickupPointView, ReceptionView};
use uuid::Uuid;

use crate::db::{DateRange, JoinedRow, PvzStore};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 30;

/// Outer-level page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Normalize client values: a page below 1 becomes 1, a page beyond
    /// `u32::MAX` saturates (an empty page, never the first), a limit outside
    /// `1..=30` becomes 10
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page
            .filter(|p| *p >= 1)
            .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
            .unwrap_or(1);
        let limit = limit
            .filter(|l| (1..=i64::from(MAX_LIMIT)).contains(l))
            .and_then(|l| u32::try_from(l).ok())
            .unwrap_or(DEFAULT_LIMIT);
        Self { page, limit }
    }

    fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.limit as usize)
    }
}

/// First-seen-order grouping of joined rows
#[derive(Default)]
struct Arena {
    views: Vec<PickupPointView>,
    pvz_index: HashMap<Uuid, usize>,
    reception_index: HashMap<Uuid, (usize, usize)>,
    seen_products: HashSet<Uuid>,
}

impl Arena {
    fn pvz_slot(&mut self, row: &JoinedRow) -> usize {
        if let Some(&i) = self.pvz_index.get(&row.pvz.id) {
            return i;
        }
        self.views.push(PickupPointView {
            pvz: row.pvz.clone(),
            receptions: Vec::new(),
        });
        let i = self.views.len() - 1;
        self.pvz_index.insert(row.pvz.id, i);
        i
    }

    fn push(&mut self, row: JoinedRow) {
        let pi = self.pvz_slot(&row);

        let Some(reception) = row.reception else {
            return;
        };
        let (pi, ri) = match self.reception_index.get(&reception.id) {
            Some(&slot) => slot,
            None => {
                let receptions = &mut self.views[pi].receptions;
                let id = reception.id;
                receptions.push(ReceptionView {
                    reception,
                    products: Vec::new(),
                });
                let slot = (pi, receptions.len() - 1);
                self.reception_index.insert(id, slot);
                slot
            }
        };

        if let Some(product) = row.product
            && self.seen_products.insert(product.id)
        {
            self.views[pi].receptions[ri].products.push(product);
        }
    }
}

/// Group joined rows by id, keeping first-seen order within each group
pub fn fold(rows: impl IntoIterator<Item = JoinedRow>) -> Vec<PickupPointView> {
    let mut arena = Arena::default();
    for row in rows {
        arena.push(row);
    }
    arena.views
}

/// Newest first at every level. Stable, so equal timestamps keep fold order.
pub fn sort_descending(views: &mut [PickupPointView]) {
    views.sort_by(|a, b| b.pvz.registration_date.cmp(&a.pvz.registration_date));
    for view in views.iter_mut() {
        view.receptions
            .sort_by(|a, b| b.reception.date_time.cmp(&a.reception.date_time));
        for reception in view.receptions.iter_mut() {
            reception
                .products
                .sort_by(|a, b| b.date_time.cmp(&a.date_time));
        }
    }
}

pub fn paginate(views: Vec<PickupPointView>, pagination: Pagination) -> Vec<PickupPointView> {
    views
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.limit as usize)
        .collect()
}

/// Fold, sort and page a set of joined rows
pub fn assemble(rows: Vec<JoinedRow>, pagination: Pagination) -> Vec<PickupPointView> {
    let mut views = fold(rows);
    sort_descending(&mut views);
    paginate(views, pagination)
}

/// Load and assemble one page of the listing
pub async fn list(
    store: &dyn PvzStore,
    range: DateRange,
    pagination: Pagination,
) -> AppResult<Vec<PickupPointView>> {
    let rows = store.joined_rows(range).await?;
    let row_count = rows.len();
    let page = assemble(rows, pagination);

    tracing::debug!(
        rows = row_count,
        returned = page.len(),
        page = pagination.page,
        limit = pagination.limit,
        "Pickup point listing assembled"
    );
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use shared::models::{City, PickupPoint, Product, ProductType, Reception, ReceptionStatus};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn pvz(secs: i64) -> PickupPoint {
        PickupPoint {
            id: Uuid::new_v4(),
            registration_date: t(secs),
            city: City::Moscow,
        }
    }

    fn reception(pvz: &PickupPoint, secs: i64) -> Reception {
        Reception {
            id: Uuid::new_v4(),
            date_time: t(secs),
            pvz_id: pvz.id,
            status: ReceptionStatus::Closed,
        }
    }

    fn product(reception: &Reception, secs: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            date_time: t(secs),
            product_type: ProductType::Shoes,
            reception_id: reception.id,
        }
    }

    fn row(p: &PickupPoint, r: Option<&Reception>, pr: Option<&Product>) -> JoinedRow {
        JoinedRow {
            pvz: p.clone(),
            reception: r.cloned(),
            product: pr.cloned(),
        }
    }

    #[test]
    fn test_pagination_normalization() {
        assert_eq!(Pagination::new(None, None), Pagination::default());
        assert_eq!(Pagination::new(Some(0), Some(0)), Pagination { page: 1, limit: 10 });
        assert_eq!(Pagination::new(Some(-3), Some(31)), Pagination { page: 1, limit: 10 });
        assert_eq!(Pagination::new(Some(2), Some(30)), Pagination { page: 2, limit: 30 });
        assert_eq!(Pagination::new(Some(5), Some(1)), Pagination { page: 5, limit: 1 });
        assert_eq!(
            Pagination::new(Some(5_000_000_000), None),
            Pagination { page: u32::MAX, limit: 10 }
        );
    }

    #[test]
    fn test_oversized_page_is_empty() {
        let rows: Vec<_> = (0..3).map(|i| row(&pvz(i), None, None)).collect();
        let page = assemble(rows, Pagination::new(Some(i64::MAX), Some(30)));
        assert!(page.is_empty());
    }

    #[test]
    fn test_fold_keeps_empty_levels() {
        let a = pvz(1);
        let b = pvz(2);
        let ra = reception(&a, 10);
        let views = fold([row(&a, Some(&ra), None), row(&b, None, None)]);

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].receptions.len(), 1);
        assert!(views[0].receptions[0].products.is_empty());
        assert!(views[1].receptions.is_empty());
    }

    #[test]
    fn test_fold_ignores_duplicate_rows() {
        let a = pvz(1);
        let r = reception(&a, 10);
        let p = product(&r, 11);
        let rows = vec![
            row(&a, Some(&r), Some(&p)),
            row(&a, Some(&r), Some(&p)),
            row(&a, Some(&r), Some(&p)),
        ];
        let views = fold(rows);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].receptions.len(), 1);
        assert_eq!(views[0].receptions[0].products.len(), 1);
    }

    #[test]
    fn test_sort_descending_every_level() {
        let old = pvz(1);
        let new = pvz(2);
        let r_old = reception(&new, 10);
        let r_new = reception(&new, 20);
        let p_old = product(&r_new, 21);
        let p_new = product(&r_new, 22);

        let rows = vec![
            row(&old, None, None),
            row(&new, Some(&r_old), None),
            row(&new, Some(&r_new), Some(&p_old)),
            row(&new, Some(&r_new), Some(&p_new)),
        ];
        let views = assemble(rows, Pagination::default());

        assert_eq!(views[0].pvz.id, new.id);
        assert_eq!(views[1].pvz.id, old.id);
        assert_eq!(views[0].receptions[0].reception.id, r_new.id);
        assert_eq!(views[0].receptions[1].reception.id, r_old.id);
        assert_eq!(views[0].receptions[0].products[0].id, p_new.id);
        assert_eq!(views[0].receptions[0].products[1].id, p_old.id);
    }

    #[test]
    fn test_equal_timestamps_keep_fold_order() {
        let a = pvz(5);
        let b = pvz(5);
        let views = assemble(
            vec![row(&b, None, None), row(&a, None, None)],
            Pagination::default(),
        );
        assert_eq!(views[0].pvz.id, b.id);
        assert_eq!(views[1].pvz.id, a.id);
    }

    #[test]
    fn test_page_window_applies_to_outer_level_only() {
        let first = pvz(1);
        let second = pvz(2);
        let r = reception(&first, 10);
        let products: Vec<_> = (0..40).map(|i| product(&r, 11 + i)).collect();

        let mut rows = vec![row(&second, None, None)];
        rows.extend(products.iter().map(|p| row(&first, Some(&r), Some(p))));

        let page = assemble(rows.clone(), Pagination { page: 1, limit: 1 });
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].pvz.id, second.id);

        let page = assemble(rows.clone(), Pagination { page: 2, limit: 1 });
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].receptions[0].products.len(), 40);

        let page = assemble(rows, Pagination { page: 3, limit: 1 });
        assert!(page.is_empty());
    }
}
