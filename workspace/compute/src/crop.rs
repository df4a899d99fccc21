//! Aggregate profit figures for crop cycles.
//!
//! Each figure is one SUM pushed down to the storage engine over the
//! principal's scoped child set, so a figure always reflects a
//! consistent snapshot of its own query and never includes rows the
//! principal could not list directly.

use common::{CropMetrics, Principal};
use model::entities::{crop, expense, output};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{ColumnTrait, ConnectionTrait, QueryFilter, QuerySelect};
use tracing::instrument;

use crate::error::Result;
use crate::scope;

/// Sum of `amount` over the scoped expenses of one crop. 0 if none.
#[instrument(skip(db, principal))]
pub async fn total_expense<C>(db: &C, principal: &Principal, crop_id: i32) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let total = scope::expenses(principal)
        .filter(expense::Column::CropId.eq(crop_id))
        .select_only()
        .column_as(expense::Column::Amount.sum(), "total")
        .into_tuple::<Option<Decimal>>()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(Decimal::ZERO))
}

/// Sum of `total_mann * rate_per_mann` over the scoped outputs of one
/// crop. 0 if none. The multiplication happens inside the SUM.
#[instrument(skip(db, principal))]
pub async fn total_output<C>(db: &C, principal: &Principal, crop_id: i32) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let revenue = Expr::expr(
        Expr::col(output::Column::TotalMann).mul(Expr::col(output::Column::RatePerMann)),
    )
    .sum();

    let total = scope::outputs(principal)
        .filter(output::Column::CropId.eq(crop_id))
        .select_only()
        .column_as(revenue, "total")
        .into_tuple::<Option<Decimal>>()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(Decimal::ZERO))
}

/// All derived figures for one crop row, as shown and filtered on by the
/// list views.
#[instrument(skip(db, principal, crop))]
pub async fn metrics<C>(db: &C, principal: &Principal, crop: &crop::Model) -> Result<CropMetrics>
where
    C: ConnectionTrait,
{
    let total_expense = total_expense(db, principal, crop.id).await?;
    let total_output = total_output(db, principal, crop.id).await?;
    Ok(CropMetrics::new(
        crop.id,
        total_expense,
        total_output,
        crop.total_acres,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit;
    use common::BalanceSign;

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    #[tokio::test]
    async fn crop_with_children_sums_exactly() {
        let (db, seed) = testkit::seed().await;
        let p1 = Principal::restricted(seed.owner1.id);

        // Expenses [100, 50], one output of 2 mann at rate 80.
        let m = metrics(&db, &p1, &seed.crop1).await.unwrap();
        assert_eq!(m.total_expense, dec(150));
        assert_eq!(m.total_output, dec(160));
        assert_eq!(m.net_profit, dec(10));
        assert_eq!(m.profit_sign, BalanceSign::Positive);
        assert_eq!(m.net_profit, m.total_output - m.total_expense);
    }

    #[tokio::test]
    async fn crop_without_children_sums_to_zero() {
        let (db, seed) = testkit::seed().await;
        let p2 = Principal::restricted(seed.owner2.id);

        let m = metrics(&db, &p2, &seed.crop2).await.unwrap();
        assert_eq!(m.total_expense, Decimal::ZERO);
        assert_eq!(m.total_output, Decimal::ZERO);
        assert_eq!(m.net_profit, Decimal::ZERO);
        assert_eq!(m.profit_sign, BalanceSign::Positive);
    }

    #[tokio::test]
    async fn metrics_only_cover_rows_the_principal_can_see() {
        let (db, seed) = testkit::seed().await;

        // Crop 1 belongs to owner 1; for owner 2 the scoped child set is
        // empty, so the figures are zero rather than leaked sums.
        let p2 = Principal::restricted(seed.owner2.id);
        assert_eq!(
            total_expense(&db, &p2, seed.crop1.id).await.unwrap(),
            Decimal::ZERO
        );
        assert_eq!(
            total_output(&db, &p2, seed.crop1.id).await.unwrap(),
            Decimal::ZERO
        );

        // The superuser sees the full sums.
        let admin = Principal::superuser(seed.admin.id);
        assert_eq!(
            total_expense(&db, &admin, seed.crop1.id).await.unwrap(),
            dec(150)
        );
    }

    #[tokio::test]
    async fn per_acre_ratios_divide_by_crop_acres() {
        let (db, seed) = testkit::seed().await;
        let p1 = Principal::restricted(seed.owner1.id);

        // crop1 covers 4 acres.
        let m = metrics(&db, &p1, &seed.crop1).await.unwrap();
        assert_eq!(m.expense_per_acre, dec(150).checked_div(dec(4)));
        assert_eq!(m.output_per_acre, dec(160).checked_div(dec(4)));
        assert_eq!(m.net_profit_per_acre, dec(10).checked_div(dec(4)));
    }
}
