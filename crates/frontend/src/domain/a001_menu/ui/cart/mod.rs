use contracts::shared::number_format::format_price;
use leptos::prelude::*;

use super::menu_page::MenuViewModel;
use crate::shared::components::ui::{Badge, Button};
use crate::shared::icons::icon;

/// Cart side panel of the menu page
#[component]
pub fn CartPanel(vm: MenuViewModel) -> impl IntoView {
    let item_count = move || vm.cart.with(|c| c.item_count());
    let total = move || vm.cart.with(|c| format_price(c.total_price()));

    view! {
        <aside class="cart">
            <div class="cart__header">
                {icon("cart")}
                <h2 class="cart__title">"Your order"</h2>
                <Badge variant="primary">{move || item_count().to_string()}</Badge>
            </div>

            {move || vm.error.get().map(|e| view! {
                <div class="warning-box">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                    <button class="warning-box__close" on:click=move |_| vm.dismiss_error()>
                        {icon("x")}
                    </button>
                </div>
            })}

            <Show
                when=move || !vm.cart.with(|c| c.is_empty())
                fallback=|| view! { <div class="cart__empty">"Your cart is empty"</div> }
            >
                <table class="table__data cart__lines">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell">"Item"</th>
                            <th class="table__header-cell table__header-cell--right">"Qty"</th>
                            <th class="table__header-cell table__header-cell--right">"Price"</th>
                            <th class="table__header-cell table__header-cell--right">"Total"</th>
                            <th class="table__header-cell"></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || vm.cart.get().into_lines().into_iter().enumerate().map(|(index, line)| {
                            view! {
                                <tr class="table__row">
                                    <td class="table__cell">{line.display_name().to_string()}</td>
                                    <td class="table__cell table__cell--right">{line.quantity}</td>
                                    <td class="table__cell table__cell--right">{format_price(line.price)}</td>
                                    <td class="table__cell table__cell--right">{format_price(line.line_total())}</td>
                                    <td class="table__cell">
                                        <button
                                            class="button button--ghost button--small"
                                            title="Remove"
                                            on:click=move |_| vm.remove_from_cart(index)
                                        >
                                            {icon("delete")}
                                        </button>
                                    </td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
            </Show>

            <div class="cart__footer">
                <div class="cart__total">
                    <span>"Total"</span>
                    <strong>{move || format!("£{}", total())}</strong>
                </div>
                <Button
                    class="cart__submit"
                    disabled=Signal::derive(move || vm.cart.with(|c| c.is_empty()))
                    loading=Signal::derive(move || vm.submitting.get())
                    on_click=Callback::new(move |_| vm.submit_order())
                >
                    {move || if vm.submitting.get() { "Submitting Order..." } else { "Submit Order" }}
                </Button>
            </div>
        </aside>
    }
}
