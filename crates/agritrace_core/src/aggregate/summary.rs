//! Dashboard summaries per role.
//!
//! # Invariants
//! - Summaries are pure folds; the same collection always yields the same summary.
//! - Divisions by a zero quantity contribute zero instead of failing.

use crate::model::crop::{CropRecord, CropStatus};
use crate::model::inventory::InventoryItem;
use crate::model::stock::StockItem;
use serde::Serialize;

/// Folds a full collection into its dashboard summary.
pub trait Summarize: Sized {
    type Summary;

    fn summarize(records: &[Self]) -> Self::Summary;
}

/// Convenience entry point: `aggregate(&crops)`.
pub fn aggregate<R: Summarize>(records: &[R]) -> R::Summary {
    R::summarize(records)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropSummary {
    pub total_revenue: f64,
    pub available_count: usize,
    pub bid_placed_count: usize,
    pub sold_count: usize,
    pub total_count: usize,
}

impl Summarize for CropRecord {
    type Summary = CropSummary;

    fn summarize(records: &[Self]) -> CropSummary {
        records
            .iter()
            .fold(CropSummary::default(), |mut summary, crop| {
                summary.total_count += 1;
                summary.total_revenue += crop.revenue();
                match crop.status {
                    CropStatus::Available => summary.available_count += 1,
                    CropStatus::BidPlaced { .. } => summary.bid_placed_count += 1,
                    CropStatus::Sold(_) => summary.sold_count += 1,
                }
                summary
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub total_in_hand: f64,
    pub total_dispatched: f64,
    pub total_wasted: f64,
    /// Σ (selling − buying − transport) × dispatched; may be negative.
    pub profit_margin: f64,
    pub item_count: usize,
}

impl Summarize for StockItem {
    type Summary = StockSummary;

    fn summarize(records: &[Self]) -> StockSummary {
        records
            .iter()
            .fold(StockSummary::default(), |mut summary, item| {
                summary.item_count += 1;
                summary.total_in_hand += item.quantity_in_hand.get();
                summary.total_dispatched += item.quantity_dispatched.get();
                summary.total_wasted += item.quantity_wasted.get();
                summary.profit_margin += item.dispatch_profit();
                summary
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub inventory_value: f64,
    pub total_sales: f64,
    pub total_profit: f64,
    pub total_items: f64,
    pub item_count: usize,
}

impl Summarize for InventoryItem {
    type Summary = InventorySummary;

    fn summarize(records: &[Self]) -> InventorySummary {
        records
            .iter()
            .fold(InventorySummary::default(), |mut summary, item| {
                summary.item_count += 1;
                summary.inventory_value += item.stock_value();
                summary.total_sales += item.sales();
                summary.total_profit += item.profit();
                summary.total_items += item.quantity.get();
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{aggregate, CropSummary, StockSummary};
    use crate::model::crop::CropRecord;
    use crate::model::stock::StockItem;

    #[test]
    fn empty_collections_summarize_to_zero() {
        assert_eq!(aggregate::<CropRecord>(&[]), CropSummary::default());
        assert_eq!(aggregate::<StockItem>(&[]), StockSummary::default());
    }
}
