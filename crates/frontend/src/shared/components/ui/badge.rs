use contracts::domain::a002_order::OrderStatus;
use leptos::prelude::*;

/// Badge component with different variants
#[component]
pub fn Badge(
    /// Badge variant: "primary", "success", "warning", "error", "neutral" (default)
    #[prop(optional, into)]
    variant: MaybeProp<String>,
    /// Badge content
    children: Children,
    /// Additional CSS classes
    #[prop(optional, into)]
    class: MaybeProp<String>,
) -> impl IntoView {
    let variant_class = move || match variant.get().as_deref().unwrap_or("neutral") {
        "primary" => "badge--primary",
        "success" => "badge--success",
        "warning" => "badge--warning",
        "error" => "badge--error",
        _ => "badge--neutral",
    };

    let additional_class = move || class.get().unwrap_or_default();

    view! {
        <span class=move || format!("badge {} {}", variant_class(), additional_class())>
            {children()}
        </span>
    }
}

/// Order status badge
#[component]
pub fn StatusBadge(
    #[prop(into)]
    status: Signal<OrderStatus>,
) -> impl IntoView {
    let status_class = move || match status.get() {
        OrderStatus::Pending => "badge badge--status badge--warning",
        OrderStatus::Completed => "badge badge--status badge--success",
        OrderStatus::Cancel => "badge badge--status badge--error",
        OrderStatus::Unknown(_) => "badge badge--status badge--neutral",
    };

    view! {
        <span class=status_class>
            {move || status.get().to_string()}
        </span>
    }
}
