use chrono::Utc;
use contracts::push::{NotificationInbox, UiNotification};
use contracts::shared::date_utils::time_ago;
use leptos::prelude::*;

use crate::shared::components::page_header::PageHeader;
use crate::shared::components::ui::{Badge, Button};
use crate::shared::icons::icon;

/// Notifications received while the admin page is open
#[component]
pub fn InboxPanel(inbox: RwSignal<NotificationInbox>) -> impl IntoView {
    let unread = move || inbox.with(|i| i.unread_count());

    view! {
        <section class="admin-section inbox">
            <PageHeader title="Notifications">
                <Show when=move || { unread() > 0 }>
                    <Badge variant="error">{move || unread().to_string()}</Badge>
                </Show>
                <Button
                    variant="secondary"
                    size="sm"
                    disabled=Signal::derive(move || unread() == 0)
                    on_click=Callback::new(move |_| inbox.update(|i| i.mark_all_read()))
                >
                    {icon("check")}
                    "Mark all read"
                </Button>
                <Button
                    variant="ghost"
                    size="sm"
                    disabled=Signal::derive(move || inbox.with(|i| i.is_empty()))
                    on_click=Callback::new(move |_| inbox.update(|i| i.clear()))
                >
                    {icon("delete")}
                    "Clear"
                </Button>
            </PageHeader>

            <Show
                when=move || !inbox.with(|i| i.is_empty())
                fallback=|| view! {
                    <div class="empty-state">
                        {icon("bell")}
                        <span>"No notifications yet"</span>
                    </div>
                }
            >
                <ul class="inbox__list">
                    {move || inbox.with(|i| i.entries().to_vec()).into_iter().map(|entry| {
                        view! { <InboxEntry inbox=inbox entry=entry /> }
                    }).collect_view()}
                </ul>
            </Show>
        </section>
    }
}

#[component]
fn InboxEntry(inbox: RwSignal<NotificationInbox>, entry: UiNotification) -> impl IntoView {
    let UiNotification {
        id,
        title,
        body,
        timestamp,
        read,
        ..
    } = entry;
    let received = time_ago(&timestamp.to_rfc3339(), Utc::now());

    view! {
        <li
            class=if read { "inbox__entry" } else { "inbox__entry inbox__entry--unread" }
            on:click=move |_| {
                inbox.update(|i| {
                    i.mark_read(&id);
                });
            }
        >
            <div class="inbox__entry-top">
                <strong class="inbox__title">{title}</strong>
                <span class="inbox__time">{received}</span>
            </div>
            {(!body.is_empty()).then(|| view! { <p class="inbox__body">{body}</p> })}
        </li>
    }
}
