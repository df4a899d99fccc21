//! Running debit/credit totals for ledgers.

use common::{LedgerBalance, Principal};
use model::entities::ledger_entry::{self, EntryType};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, QueryFilter, QuerySelect};
use tracing::instrument;

use crate::error::Result;
use crate::scope;

/// Sum of `amount` over the scoped entries of one ledger on one side of
/// the account. 0 if none.
#[instrument(skip(db, principal))]
pub async fn total_for_type<C>(
    db: &C,
    principal: &Principal,
    ledger_id: i32,
    entry_type: EntryType,
) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let total = scope::ledger_entries(principal)
        .filter(ledger_entry::Column::LedgerId.eq(ledger_id))
        .filter(ledger_entry::Column::EntryType.eq(entry_type))
        .select_only()
        .column_as(ledger_entry::Column::Amount.sum(), "total")
        .into_tuple::<Option<Decimal>>()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(Decimal::ZERO))
}

/// Debit/credit totals and the net balance for one ledger row.
#[instrument(skip(db, principal))]
pub async fn balance<C>(db: &C, principal: &Principal, ledger_id: i32) -> Result<LedgerBalance>
where
    C: ConnectionTrait,
{
    let total_debit = total_for_type(db, principal, ledger_id, EntryType::Debit).await?;
    let total_credit = total_for_type(db, principal, ledger_id, EntryType::Credit).await?;
    Ok(LedgerBalance::new(ledger_id, total_debit, total_credit))
}
