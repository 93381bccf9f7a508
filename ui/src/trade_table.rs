//! View state of the OTC trades table: order and expanded rows.

use std::cmp::Ordering;

use api::amount::parse_decimal;
use api::types::otc_trade::OtcTrade;
use chrono::DateTime;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortableColumn {
    #[default]
    Time,
    Pair,
    Type,
    Amount,
    Rate,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TradeRow {
    pub trade: OtcTrade,
    pub expanded: bool,
}

impl TradeRow {
    /// The timestamp as "dd/mm/YYYY HH:MM" (UTC).
    pub fn time(&self) -> String {
        DateTime::from_timestamp(self.trade.timestamp, 0)
            .map(|t| t.format(crate::trade_form::TIME_FORMAT).to_string())
            .unwrap_or_else(|| self.trade.timestamp.to_string())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TradeTable {
    /// Always in display order.
    rows: Vec<TradeRow>,
    sort_column: SortableColumn,
    sort_direction: SortDirection,
}

fn figure(s: &str) -> f64 {
    parse_decimal(s).unwrap_or(0.0)
}

impl TradeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[TradeRow] {
        &self.rows
    }

    pub fn sort_column(&self) -> SortableColumn {
        self.sort_column
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Replaces every row. All rows start collapsed.
    pub fn replace(&mut self, trades: Vec<OtcTrade>) {
        self.rows = trades
            .into_iter()
            .map(|trade| TradeRow {
                trade,
                expanded: false,
            })
            .collect();
        self.sort();
    }

    /// Clicking the active column flips its direction; any other column
    /// becomes active, ascending.
    pub fn sort_by(&mut self, column: SortableColumn) {
        if self.sort_column == column {
            self.sort_direction = match self.sort_direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.sort_column = column;
            self.sort_direction = SortDirection::Ascending;
        }
        self.sort();
    }

    /// Flips the row at display position `index`. Returns its new state,
    /// or None if there is no such row.
    pub fn toggle_expanded(&mut self, index: usize) -> Option<bool> {
        let row = self.rows.get_mut(index)?;
        row.expanded = !row.expanded;
        Some(row.expanded)
    }

    fn sort(&mut self) {
        let column = self.sort_column;
        let direction = self.sort_direction;
        // stable, so equal keys keep the backend's order.
        self.rows.sort_by(|a, b| {
            let (a, b) = (&a.trade, &b.trade);
            let ordering = match column {
                SortableColumn::Time => a.timestamp.cmp(&b.timestamp),
                SortableColumn::Pair => a.pair.cmp(&b.pair),
                SortableColumn::Type => a.trade_type.to_string().cmp(&b.trade_type.to_string()),
                SortableColumn::Amount => figure(&a.amount)
                    .partial_cmp(&figure(&b.amount))
                    .unwrap_or(Ordering::Equal),
                SortableColumn::Rate => figure(&a.rate)
                    .partial_cmp(&figure(&b.rate))
                    .unwrap_or(Ordering::Equal),
            };
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::types::otc_trade::TradeType;

    fn trade(timestamp: i64, pair: &str, amount: &str) -> OtcTrade {
        OtcTrade {
            id: None,
            timestamp,
            pair: pair.to_string(),
            trade_type: TradeType::Buy,
            amount: amount.to_string(),
            rate: "1".to_string(),
            fee: String::new(),
            fee_currency: None,
            link: String::new(),
            notes: String::new(),
        }
    }

    fn timestamps(table: &TradeTable) -> Vec<i64> {
        table.rows().iter().map(|r| r.trade.timestamp).collect()
    }

    #[test]
    fn test_default_sort_is_time_ascending() {
        let mut table = TradeTable::new();
        table.replace(vec![trade(30, "A_B", "1"), trade(10, "C_D", "2"), trade(20, "E_F", "3")]);
        assert_eq!(timestamps(&table), [10, 20, 30]);
    }

    #[test]
    fn test_sort_by_toggles_direction() {
        let mut table = TradeTable::new();
        table.replace(vec![trade(1, "A_B", "10"), trade(2, "C_D", "9.5"), trade(3, "E_F", "100")]);

        table.sort_by(SortableColumn::Amount);
        assert_eq!(timestamps(&table), [2, 1, 3]);
        table.sort_by(SortableColumn::Amount);
        assert_eq!(table.sort_direction(), SortDirection::Descending);
        assert_eq!(timestamps(&table), [3, 1, 2]);

        table.sort_by(SortableColumn::Time);
        assert_eq!(table.sort_direction(), SortDirection::Ascending);
        table.sort_by(SortableColumn::Time);
        assert_eq!(timestamps(&table), [3, 2, 1]);
    }

    #[test]
    fn test_toggle_expanded_and_reload_collapses() {
        let mut table = TradeTable::new();
        table.replace(vec![trade(1, "A_B", "1")]);
        assert_eq!(table.toggle_expanded(0), Some(true));
        assert_eq!(table.toggle_expanded(3), None);
        assert!(table.rows()[0].expanded);

        table.replace(vec![trade(1, "A_B", "1")]);
        assert!(!table.rows()[0].expanded);
    }

    #[test]
    fn test_row_time() {
        let row = TradeRow {
            trade: trade(1545748200, "BTC_EUR", "1"),
            expanded: false,
        };
        assert_eq!(row.time(), "25/12/2018 14:30");
    }
}
