use contracts::domain::a002_order::{Order, OrderAction};
use contracts::shared::date_utils::format_date_time;
use contracts::shared::number_format::format_price;
use leptos::prelude::*;

use crate::domain::a002_order::ui::list::OrderListViewModel;
use crate::shared::components::ui::{Button, StatusBadge};
use crate::shared::icons::icon;

/// Detail pane of the selected order
#[component]
pub fn OrderDetails(vm: OrderListViewModel) -> impl IntoView {
    view! {
        <aside class="order-details">
            {move || match vm.selected.get() {
                Some(order) => view! { <OrderDetailsBody vm=vm order=order /> }.into_any(),
                None => view! {
                    <div class="order-details__empty">"Select an order to see its items"</div>
                }.into_any(),
            }}
        </aside>
    }
}

#[component]
fn OrderDetailsBody(vm: OrderListViewModel, order: Order) -> impl IntoView {
    let can_complete = order.can_transition() && !order.items.is_empty();
    let busy = {
        let id = order.id.clone();
        move || id.is_some() && vm.busy.get() == id
    };
    let table = order.table_number.clone().unwrap_or_else(|| "-".to_string());
    let ordered = order
        .placed_at()
        .map(format_date_time)
        .unwrap_or_else(|| "-".to_string());
    let total = format_price(order.items_total());
    let status = order.status.clone();
    let items = order.items.clone();

    view! {
        <div class="order-details__header">
            <h3 class="order-details__title">{format!("Table {}", table)}</h3>
            <button class="button button--ghost button--small" title="Reload" on:click=move |_| vm.refresh_selected()>
                {icon("refresh")}
            </button>
            <button class="button button--ghost button--small" title="Close" on:click=move |_| vm.clear_selection()>
                {icon("x")}
            </button>
        </div>

        <dl class="order-details__meta">
            <dt>"Ordered"</dt>
            <dd>{ordered}</dd>
            <dt>"Status"</dt>
            <dd><StatusBadge status=status /></dd>
        </dl>

        <table class="table__data">
            <thead class="table__head">
                <tr>
                    <th class="table__header-cell">"Item"</th>
                    <th class="table__header-cell table__header-cell--right">"Qty"</th>
                    <th class="table__header-cell table__header-cell--right">"Price"</th>
                </tr>
            </thead>
            <tbody>
                {items.into_iter().map(|item| view! {
                    <tr class="table__row">
                        <td class="table__cell">{item.display_name().to_string()}</td>
                        <td class="table__cell table__cell--right">{item.quantity}</td>
                        <td class="table__cell table__cell--right">{format_price(item.price)}</td>
                    </tr>
                }).collect_view()}
            </tbody>
        </table>

        <div class="order-details__footer">
            <div class="order-details__total">
                <span>"Total"</span>
                <strong>{format!("£{}", total)}</strong>
            </div>
            <Button
                disabled={!can_complete}
                loading=Signal::derive(busy)
                on_click=Callback::new(move |_| vm.transition_status(&order, OrderAction::Complete))
            >
                {icon("check")}
                "Complete"
            </Button>
        </div>
    }
}
