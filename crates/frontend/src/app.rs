use crate::config::AppConfig;
use crate::routes::routes::AppRoutes;
use crate::shared::api_client::ApiClient;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_env();
    log::info!(
        "Digital menu starting (api: {}, push: {})",
        config.api_url,
        config.push.provider
    );

    // Shared by every page through context
    provide_context(ApiClient::new(&config));
    provide_context(config);

    view! {
        <AppRoutes />
    }
}
