use contracts::shared::date_utils::time_ago_from_now;
use leptos::prelude::*;
use thaw::Spinner;

use super::view_model::QrCodeListViewModel;
use crate::shared::api_client::use_api_client;
use crate::shared::components::page_header::PageHeader;
use crate::shared::components::ui::{Button, Input};
use crate::shared::export::QR_IMAGE_CONTAINER_ID;
use crate::shared::icons::icon;

#[component]
pub fn QrCodeList() -> impl IntoView {
    let vm = QrCodeListViewModel::new(use_api_client());
    vm.fetch_qr_codes();

    view! {
        <section class="admin-section qr-codes">
            <PageHeader title="Table QR codes" count=Signal::derive(move || Some(vm.codes.with(|c| c.len())))>
                <Button variant="secondary" size="sm" on_click=Callback::new(move |_| vm.fetch_qr_codes())>
                    {icon("refresh")}
                    "Refresh"
                </Button>
            </PageHeader>

            <div class="qr-codes__form">
                <Input
                    label="Table number"
                    value=vm.table_input
                    on_input=Callback::new(move |v: String| vm.table_input.set(v))
                    on_enter=Callback::new(move |_| vm.generate_qr_code())
                    placeholder="e.g. 12"
                    disabled=Signal::derive(move || vm.generating.get())
                />
                <Button
                    loading=Signal::derive(move || vm.generating.get())
                    on_click=Callback::new(move |_| vm.generate_qr_code())
                >
                    {icon("qr")}
                    "Generate"
                </Button>
            </div>

            {move || vm.error.get().map(|e| view! {
                <div class="warning-box">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}

            <div id=QR_IMAGE_CONTAINER_ID class="qr-codes__preview"></div>

            <Show when=move || vm.loading.get()>
                <div class="loading"><Spinner /></div>
            </Show>

            <table class="table__data table--striped">
                <thead class="table__head">
                    <tr>
                        <th class="table__header-cell">"Table"</th>
                        <th class="table__header-cell">"Code"</th>
                        <th class="table__header-cell">"Created"</th>
                        <th class="table__header-cell"></th>
                    </tr>
                </thead>
                <tbody>
                    {move || vm.codes.get().into_iter().map(|qr| {
                        let table = qr.table_number.clone().unwrap_or_else(|| "-".to_string());
                        let preview = qr.preview();
                        let created = qr
                            .created_at
                            .as_deref()
                            .map(time_ago_from_now)
                            .unwrap_or_else(|| "-".to_string());
                        view! {
                            <tr class="table__row">
                                <td class="table__cell">{table}</td>
                                <td class="table__cell table__cell--mono">{preview}</td>
                                <td class="table__cell">{created}</td>
                                <td class="table__cell">
                                    <Button
                                        variant="ghost"
                                        size="sm"
                                        on_click=Callback::new(move |_| vm.display_and_download(&qr))
                                    >
                                        {icon("download")}
                                        "Download"
                                    </Button>
                                </td>
                            </tr>
                        }
                    }).collect_view()}
                </tbody>
            </table>
        </section>
    }
}
