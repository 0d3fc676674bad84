use contracts::domain::a002_order::{Order, OrderAction};
use contracts::shared::date_utils::time_ago_from_now;
use contracts::shared::number_format::format_price;
use leptos::prelude::*;
use thaw::Spinner;

use super::view_model::OrderListViewModel;
use crate::domain::a002_order::ui::details::OrderDetails;
use crate::shared::components::page_header::PageHeader;
use crate::shared::components::ui::{Button, StatusBadge};
use crate::shared::icons::icon;

/// Order list of the admin page. `refresh` re-runs the fetch whenever it
/// changes after mount (bumped by new-order notifications).
#[component]
pub fn OrderList(vm: OrderListViewModel, #[prop(into)] refresh: Signal<u32>) -> impl IntoView {
    vm.fetch_orders();

    Effect::watch(
        move || refresh.get(),
        move |_, _, _| vm.fetch_orders(),
        false,
    );

    view! {
        <section class="admin-section orders">
            <PageHeader title="Orders" count=Signal::derive(move || Some(vm.orders.with(|o| o.len())))>
                <Button variant="secondary" size="sm" on_click=Callback::new(move |_| vm.fetch_orders())>
                    {icon("refresh")}
                    "Refresh"
                </Button>
            </PageHeader>

            {move || vm.error.get().map(|e| view! {
                <div class="warning-box">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}
            {move || vm.message.get().map(|m| view! {
                <div class="info-box">
                    <span class="info-box__text">{m}</span>
                    <button class="info-box__close" on:click=move |_| vm.message.set(None)>
                        {icon("x")}
                    </button>
                </div>
            })}

            <div class="orders__layout">
                <div class="table orders__table">
                    <Show when=move || vm.loading.get()>
                        <div class="loading"><Spinner /></div>
                    </Show>
                    <table class="table__data table--striped">
                        <thead class="table__head">
                            <tr>
                                <th class="table__header-cell">"Table"</th>
                                <th class="table__header-cell table__header-cell--right">"Items"</th>
                                <th class="table__header-cell">"Ordered"</th>
                                <th class="table__header-cell table__header-cell--right">"Total"</th>
                                <th class="table__header-cell">"Status"</th>
                                <th class="table__header-cell"></th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || vm.orders.get().into_iter().map(|order| {
                                view! { <OrderRow vm=vm order=order /> }
                            }).collect_view()}
                        </tbody>
                    </table>
                    <Show when=move || !vm.loading.get() && vm.orders.with(|o| o.is_empty())>
                        <div class="empty-state">"No orders yet"</div>
                    </Show>
                </div>

                <OrderDetails vm=vm />
            </div>
        </section>
    }
}

#[component]
fn OrderRow(vm: OrderListViewModel, order: Order) -> impl IntoView {
    let is_selected = {
        let order = order.clone();
        move || vm.selected.with(|s| s.as_ref().is_some_and(|o| o.is_same(&order)))
    };
    let is_busy = {
        let id = order.id.clone();
        move || id.is_some() && vm.busy.get() == id
    };
    let pending = order.can_transition();
    let status = order.status.clone();
    let table = order.table_number.clone().unwrap_or_else(|| "-".to_string());
    let ordered = order
        .placed_at()
        .map(time_ago_from_now)
        .unwrap_or_else(|| "-".to_string());
    let total = format_price(order.total_price);
    let count = order.item_count;

    let for_select = order.clone();
    let for_complete = order.clone();
    let for_cancel = order;

    view! {
        <tr
            class=move || if is_selected() { "table__row table__row--selected" } else { "table__row" }
            on:click=move |_| vm.select_order(for_select.clone())
        >
            <td class="table__cell">{table}</td>
            <td class="table__cell table__cell--right">{count}</td>
            <td class="table__cell">{ordered}</td>
            <td class="table__cell table__cell--right">{format!("£{}", total)}</td>
            <td class="table__cell"><StatusBadge status=status /></td>
            <td class="table__cell table__cell--actions">
                {pending.then(|| view! {
                    <div class="row-actions">
                        <Button
                            size="sm"
                            loading=Signal::derive(is_busy.clone())
                            on_click=Callback::new(move |_| vm.transition_status(&for_complete, OrderAction::Complete))
                        >
                            {icon("check")}
                            {OrderAction::Complete.label()}
                        </Button>
                        <Button
                            variant="danger"
                            size="sm"
                            disabled=Signal::derive(is_busy)
                            on_click=Callback::new(move |_| vm.transition_status(&for_cancel, OrderAction::Cancel))
                        >
                            {icon("x")}
                            {OrderAction::Cancel.label()}
                        </Button>
                    </div>
                })}
            </td>
        </tr>
    }
}
