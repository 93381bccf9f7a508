use api::types::otc_trade::OtcTrade;
use api::types::otc_trade::TradeType;
use dioxus::prelude::*;
use strum::IntoEnumIterator;

use crate::app_state_mut::AppStateMut;
use crate::components::empty_state::EmptyState;
use crate::components::pico::Button;
use crate::components::pico::ButtonType;
use crate::components::pico::Card;
use crate::components::pico::Grid;
use crate::components::pico::Input;
use crate::hooks::use_session_worker::SessionCommand;
use crate::trade_form::TradeForm;
use crate::trade_table::SortableColumn;
use crate::trade_table::TradeRow;
use crate::trade_table::TradeTable;

#[component]
fn SortableHeader(
    title: &'static str,
    column: SortableColumn,
    mut table: Signal<TradeTable>,
) -> Element {
    let arrow_char = if table.read().sort_column() == column {
        table.read().sort_direction().arrow()
    } else {
        "\u{00A0}"
    };

    rsx! {
        th {
            style: "position: sticky; top: 0; background: var(--pico-card-background-color); cursor: pointer; white-space: nowrap;",
            onclick: move |_| table.write().sort_by(column),
            "{title}"
            span {
                style: "display: inline-block; width: 1.2em; text-align: right;",
                "{arrow_char}"
            }
        }
    }
}

#[component]
fn TradeRowView(
    row: TradeRow,
    index: usize,
    on_toggle: EventHandler<usize>,
    on_edit: EventHandler<OtcTrade>,
    on_delete: EventHandler<OtcTrade>,
) -> Element {
    let trade = row.trade.clone();
    let edit_trade = trade.clone();
    let delete_trade = trade.clone();
    let marker = if row.expanded { "▾" } else { "▸" };

    rsx! {
        tr {
            style: "cursor: pointer;",
            onclick: move |_| on_toggle.call(index),
            td { "{marker} {row.time()}" }
            td { "{trade.pair}" }
            td { "{trade.trade_type}" }
            td { "{trade.amount}" }
            td { "{trade.rate}" }
        }
        if row.expanded {
            tr {
                td {
                    colspan: "5",
                    p { "Fee: {trade.fee} {trade.fee_currency.as_deref().unwrap_or(\"\")}" }
                    if !trade.link.is_empty() {
                        p { "Link: {trade.link}" }
                    }
                    if !trade.notes.is_empty() {
                        p { "Notes: {trade.notes}" }
                    }
                    div {
                        style: "display: flex; gap: 0.5rem;",
                        Button {
                            button_type: ButtonType::Secondary,
                            outline: true,
                            on_click: move |_| on_edit.call(edit_trade.clone()),
                            "Edit"
                        }
                        Button {
                            button_type: ButtonType::Contrast,
                            outline: true,
                            on_click: move |_| on_delete.call(delete_trade.clone()),
                            "Delete"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn TradeFormView(mut form: Signal<TradeForm>, busy: bool, on_submit: EventHandler<()>) -> Element {
    let current = form.read().clone();

    rsx! {
        Grid {
            Input {
                label: "Time",
                name: "otc_time",
                placeholder: "25/12/2018 14:30",
                value: current.time.clone(),
                on_input: move |v| form.write().time = v,
            }
            Input {
                label: "Pair",
                name: "otc_pair",
                placeholder: "BTC_EUR",
                value: current.pair.clone(),
                on_input: move |v| form.write().pair = v,
            }
            label {
                "Type"
                select {
                    name: "otc_type",
                    value: "{current.trade_type}",
                    onchange: move |evt| {
                        if let Ok(trade_type) = evt.value().parse::<TradeType>() {
                            form.write().trade_type = trade_type;
                        }
                    },
                    for trade_type in TradeType::iter() {
                        option {
                            value: "{trade_type}",
                            selected: trade_type == current.trade_type,
                            "{trade_type}"
                        }
                    }
                }
            }
        }
        Grid {
            Input {
                label: "Amount",
                name: "otc_amount",
                value: current.amount.clone(),
                on_input: move |v| form.write().amount = v,
            }
            Input {
                label: "Rate",
                name: "otc_rate",
                value: current.rate.clone(),
                on_input: move |v| form.write().rate = v,
            }
            Input {
                label: "Fee",
                name: "otc_fee",
                value: current.fee.clone(),
                on_input: move |v| form.write().fee = v,
            }
        }
        Grid {
            Input {
                label: "Link",
                name: "otc_link",
                value: current.link.clone(),
                on_input: move |v| form.write().link = v,
            }
            Input {
                label: "Notes",
                name: "otc_notes",
                value: current.notes.clone(),
                on_input: move |v| form.write().notes = v,
            }
        }
        div {
            style: "display: flex; gap: 0.5rem;",
            Button {
                busy,
                on_click: move |_| on_submit.call(()),
                "{current.submit_label()}"
            }
            if current.is_editing() {
                Button {
                    button_type: ButtonType::Secondary,
                    outline: true,
                    on_click: move |_| form.write().reset(),
                    "Cancel"
                }
            }
        }
    }
}

/// Manually recorded trades: the add/edit form above a sortable table.
#[component]
pub fn OtcTradesScreen() -> Element {
    let state = use_context::<AppStateMut>();
    let worker = use_coroutine_handle::<SessionCommand>();
    let form = state.trade_form;
    let busy = state.saving_trade;

    use_hook(move || worker.send(SessionCommand::ReloadTrades));

    let submit = move |_: ()| {
        let snapshot = form.read().clone();
        worker.send(SessionCommand::SubmitTrade(snapshot));
    };

    let delete = move |trade: OtcTrade| worker.send(SessionCommand::DeleteTrade(trade));

    let mut edit_form = form;
    let rows = state.trades.read().rows().to_vec();

    rsx! {
        Card {
            h3 {
                if form.read().is_editing() { "Edit Trade" } else { "Add Trade" }
            }
            TradeFormView { form, busy: busy(), on_submit: submit }
        }
        Card {
            h3 { "OTC Trades ({rows.len()})" }
            if rows.is_empty() {
                EmptyState {
                    title: "No trades recorded",
                    description: Some("Trades you add above are listed here.".to_string()),
                    icon: Some("📒".to_string()),
                }
            } else {
                div {
                    style: "max-height: 50vh; overflow-y: auto;",
                    table {
                        thead {
                            tr {
                                SortableHeader { title: "Time", column: SortableColumn::Time, table: state.trades }
                                SortableHeader { title: "Pair", column: SortableColumn::Pair, table: state.trades }
                                SortableHeader { title: "Type", column: SortableColumn::Type, table: state.trades }
                                SortableHeader { title: "Amount", column: SortableColumn::Amount, table: state.trades }
                                SortableHeader { title: "Rate", column: SortableColumn::Rate, table: state.trades }
                            }
                        }
                        tbody {
                            for (index, row) in rows.into_iter().enumerate() {
                                TradeRowView {
                                    key: "{index}-{row.trade.timestamp}",
                                    row,
                                    index,
                                    on_toggle: move |i| {
                                        let mut trades = state.trades;
                                        trades.write().toggle_expanded(i);
                                    },
                                    on_edit: move |trade: OtcTrade| edit_form.write().edit(&trade),
                                    on_delete: delete,
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
