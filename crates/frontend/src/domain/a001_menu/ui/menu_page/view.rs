use std::collections::HashSet;

use contracts::domain::a001_menu::{Category, MenuItem, SubCategory};
use contracts::shared::number_format::format_price;
use leptos::prelude::*;
use thaw::Spinner;

use super::view_model::MenuViewModel;
use crate::domain::a001_menu::ui::cart::CartPanel;
use crate::shared::api_client::use_api_client;
use crate::shared::icons::icon;
use crate::shared::query::current_table_number;

#[component]
pub fn MenuPage() -> impl IntoView {
    let vm = MenuViewModel::new(use_api_client());
    // Keys of expanded categories ("c:name") and sub-categories ("s:cat/sub")
    let expanded = RwSignal::new(HashSet::<String>::new());
    let table_number = current_table_number();

    vm.fetch_menu();

    view! {
        <div class="page menu-page">
            <div class="menu-page__catalog">
                <div class="header">
                    <div class="header__content">
                        <h1 class="header__title">"Menu"</h1>
                        {table_number.map(|t| view! {
                            <span class="header__subtitle">{format!("Table {}", t)}</span>
                        })}
                    </div>
                </div>

                <Show when=move || vm.loading.get()>
                    <div class="loading">
                        <Spinner />
                        <span>"Loading menu..."</span>
                    </div>
                </Show>

                <Show when=move || !vm.loading.get() && vm.menus.with(|m| m.is_empty())>
                    <div class="empty-state">"No menu available"</div>
                </Show>

                {move || vm.menus.get().into_iter().flat_map(|menu| menu.categories).map(|category| {
                    view! { <CategorySection vm=vm category=category expanded=expanded /> }
                }).collect_view()}
            </div>

            <CartPanel vm=vm />
        </div>
    }
}

fn toggle(expanded: RwSignal<HashSet<String>>, key: &str) {
    expanded.update(|set| {
        if !set.remove(key) {
            set.insert(key.to_string());
        }
    });
}

#[component]
fn CategorySection(
    vm: MenuViewModel,
    category: Category,
    expanded: RwSignal<HashSet<String>>,
) -> impl IntoView {
    let Category {
        name: category_name,
        sub_categories,
    } = category;
    let key = format!("c:{}", category_name);
    let is_open = {
        let key = key.clone();
        move || expanded.with(|set| set.contains(&key))
    };
    let chevron = is_open.clone();
    let title = category_name.clone();

    view! {
        <section class="menu-category">
            <button class="menu-category__header" on:click=move |_| toggle(expanded, &key)>
                {move || if chevron() { icon("chevron-down") } else { icon("chevron-right") }}
                <span>{title}</span>
            </button>
            <Show when=is_open>
                {
                    let category_name = category_name.clone();
                    sub_categories.clone().into_iter().map(move |sub| {
                        view! {
                            <SubCategorySection
                                vm=vm
                                category_name=category_name.clone()
                                sub=sub
                                expanded=expanded
                            />
                        }
                    }).collect_view()
                }
            </Show>
        </section>
    }
}

#[component]
fn SubCategorySection(
    vm: MenuViewModel,
    category_name: String,
    sub: SubCategory,
    expanded: RwSignal<HashSet<String>>,
) -> impl IntoView {
    let SubCategory {
        name,
        menu_item_list,
    } = sub;
    let key = format!("s:{}/{}", category_name, name);
    let is_open = {
        let key = key.clone();
        move || expanded.with(|set| set.contains(&key))
    };
    let chevron = is_open.clone();

    view! {
        <div class="menu-subcategory">
            <button class="menu-subcategory__header" on:click=move |_| toggle(expanded, &key)>
                {move || if chevron() { icon("chevron-down") } else { icon("chevron-right") }}
                <span>{name}</span>
            </button>
            <Show when=is_open>
                <div class="menu-items">
                    {menu_item_list.clone().into_iter().map(|item| {
                        view! { <MenuItemCard vm=vm item=item /> }
                    }).collect_view()}
                </div>
            </Show>
        </div>
    }
}

#[component]
fn MenuItemCard(vm: MenuViewModel, item: MenuItem) -> impl IntoView {
    let name = item.name.clone();
    let is_selected = move || vm.selected.with(|s| s.contains(&name));
    let price = format_price(item.price);
    let description = item.description.clone();
    let title = item.name.clone();

    view! {
        <div
            class=move || if is_selected() { "menu-item menu-item--selected" } else { "menu-item" }
            on:click=move |_| vm.add_to_cart(&item)
        >
            <div class="menu-item__top">
                <span class="menu-item__name">{title}</span>
                <span class="menu-item__price">{format!("£{}", price)}</span>
            </div>
            {(!description.is_empty()).then(|| view! {
                <p class="menu-item__description">{description}</p>
            })}
        </div>
    }
}
