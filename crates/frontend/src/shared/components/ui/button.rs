use leptos::prelude::*;
use thaw::{Spinner, SpinnerSize};

/// Button with variants (primary, secondary, ghost, danger) and sizes (sm, md).
/// While `loading` is set the button is disabled and shows a spinner before
/// its content.
#[component]
pub fn Button(
    /// "primary" (default), "secondary", "ghost" or "danger"
    #[prop(optional, into)]
    variant: MaybeProp<String>,
    /// "md" (default) or "sm"
    #[prop(optional, into)]
    size: MaybeProp<String>,
    #[prop(optional, into)]
    class: MaybeProp<String>,
    #[prop(optional, into)]
    button_type: MaybeProp<String>,
    #[prop(optional, into)]
    disabled: MaybeProp<bool>,
    #[prop(optional, into)]
    loading: MaybeProp<bool>,
    #[prop(optional)]
    on_click: Option<Callback<leptos::ev::MouseEvent>>,
    children: Children,
) -> impl IntoView {
    let variant_class = move || match variant.get().as_deref().unwrap_or("primary") {
        "secondary" => "button--secondary",
        "ghost" => "button--ghost",
        "danger" => "button--danger",
        _ => "button--primary",
    };

    let size_class = move || {
        if size.get().as_deref() == Some("sm") {
            "button--small"
        } else {
            ""
        }
    };

    let is_loading = move || loading.get().unwrap_or(false);
    let additional_class = move || class.get().unwrap_or_default();
    let btn_type = move || button_type.get().unwrap_or_else(|| "button".to_string());

    view! {
        <button
            type=btn_type
            class=move || format!("button {} {} {}", variant_class(), size_class(), additional_class())
            disabled=move || disabled.get().unwrap_or(false) || is_loading()
            on:click=move |ev| {
                ev.stop_propagation();
                if let Some(handler) = on_click {
                    handler.run(ev);
                }
            }
        >
            <Show when=is_loading>
                <Spinner size=SpinnerSize::Tiny />
            </Show>
            {children()}
        </button>
    }
}
