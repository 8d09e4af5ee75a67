//! Client-side reload script
//!
//! Served at `/<path>.js` and referenced from every HTML page. It keeps a
//! WebSocket open to the server and reloads the page on `{"reload": true}`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
};

use super::websocket::state::AppState;

/// Delay before reconnecting after the socket closes
pub const RECONNECT_DELAY_MS: u64 = 1000;

const SCRIPT_TEMPLATE: &str = r#"(function(){
	var w;
	var connecting = false;
	function connect(){
		if (connecting) {
			return;
		}
		try {
			connecting = true;
			w = new WebSocket("ws://__SOCKET_URL__");

			w.onclose = function(){
				console.error("Connection closed, try to reconnect");
				connecting = false;
				setTimeout(connect, __RECONNECT_DELAY__);
			};

			w.onopen = function(){
				console.info("Connected to reload websocket");
				connecting = false;
			};

			w.onmessage = function(m){
				var d = JSON.parse(m.data);
				if (d.reload) {
					document.location.reload();
				}
			};
		} catch(e) {
			connecting = false;
			w = null;
			setTimeout(connect, __RECONNECT_DELAY__);
		}
	}

	connect();
})();"#;

/// Render the script for a socket at `ws://<host>/<path>`
pub fn reload_script(host: &str, path: &str) -> String {
    SCRIPT_TEMPLATE
        .replace("__SOCKET_URL__", &format!("{}/{}", host, path))
        .replace("__RECONNECT_DELAY__", &RECONNECT_DELAY_MS.to_string())
}

/// Script endpoint; the socket host is taken from the request's `Host` header
pub async fn script_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");

    (
        [(header::CONTENT_TYPE, "application/javascript")],
        reload_script(host, &state.reload_path),
    )
}
