use leptos::prelude::*;

/// Header of a page or a page section: title, optional subtitle and counter,
/// actions on the right
#[component]
pub fn PageHeader(
    #[prop(into)]
    title: String,
    #[prop(optional, into)]
    subtitle: MaybeProp<String>,
    /// Shown as a pill next to the title when set
    #[prop(optional, into)]
    count: MaybeProp<usize>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="page-header">
            <div class="page-header__content">
                <div class="page-header__text">
                    <h2 class="page-header__title">
                        {title}
                        {move || count.get().map(|n| view! {
                            <span class="page-header__count">{n}</span>
                        })}
                    </h2>
                    {move || subtitle.get().map(|s| view! {
                        <div class="page-header__subtitle">{s}</div>
                    })}
                </div>
            </div>
            <div class="page-header__actions">
                {children()}
            </div>
        </div>
    }
}
