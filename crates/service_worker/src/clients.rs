//! Window clients of the worker

use std::collections::HashSet;

use contracts::push::{broadcast_targets, ClientInfo, RelayMessage};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Client, ClientQueryOptions, WindowClient};

use crate::config::scope;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchAllOptions {
    r#type: &'static str,
    include_uncontrolled: bool,
}

/// Every window client, controlled or not, with its plain description
pub async fn window_clients() -> Result<Vec<(ClientInfo, Client)>, JsValue> {
    let options = MatchAllOptions {
        r#type: "window",
        include_uncontrolled: true,
    }
    .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
    .map_err(JsValue::from)?;
    let options: &ClientQueryOptions = options.unchecked_ref();

    let list = JsFuture::from(scope().clients().match_all_with_options(options)).await?;
    let list: js_sys::Array = list.dyn_into()?;

    Ok(list
        .iter()
        .filter_map(|value| value.dyn_into::<Client>().ok())
        .map(|client| {
            let focused = client
                .dyn_ref::<WindowClient>()
                .map(|w| w.focused())
                .unwrap_or(false);
            let info = ClientInfo {
                id: client.id(),
                url: client.url(),
                focused,
            };
            (info, client)
        })
        .collect())
}

/// Post `message` to each distinct client once. Returns how many got it.
pub fn broadcast(clients: &[(ClientInfo, Client)], message: &RelayMessage) -> Result<usize, JsValue> {
    let body = message
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)?;

    let infos: Vec<ClientInfo> = clients.iter().map(|(info, _)| info.clone()).collect();
    let mut pending: HashSet<&str> = broadcast_targets(&infos)
        .into_iter()
        .map(|info| info.id.as_str())
        .collect();

    let mut sent = 0;
    for (info, client) in clients {
        if !pending.remove(info.id.as_str()) {
            continue;
        }
        match client.post_message(&body) {
            Ok(()) => sent += 1,
            Err(e) => log::warn!("postMessage to {} failed: {:?}", info.url, e),
        }
    }
    Ok(sent)
}
