use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::domain::a001_menu::ui::menu_page::MenuPage;
use crate::domain::a004_admin::ui::page::AdminPage;

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="page not-found">
            <h1>"Page not found"</h1>
            <a href="/">"Back to the menu"</a>
        </div>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <NotFound /> }>
                    <Route path=path!("/") view=MenuPage />
                    <Route path=path!("/admin") view=AdminPage />
                </Routes>
            </main>
        </Router>
    }
}
