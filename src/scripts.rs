//! Auxiliary script loading. All fetches are issued concurrently and joined;
//! partial success is not a supported state, so any failure aborts startup.

use futures::future;
use tracing::debug;

use crate::error::ScriptFailure;
use crate::events::{EventSink, HostEvent};
use crate::http::{HttpRequest, HttpSend};

/// Fetch every configured script. Each individual failure is reported to the
/// event sink; the whole call fails if any fetch failed. With zero URLs this
/// is a no-op.
pub async fn load_all(
    http: &dyn HttpSend,
    urls: &[String],
    events: &dyn EventSink,
) -> Result<Vec<String>, Vec<ScriptFailure>> {
    if urls.is_empty() {
        debug!("no auxiliary scripts configured");
        return Ok(Vec::new());
    }

    let fetches = urls.iter().map(|url| http.send(HttpRequest::get(url.as_str())));
    let results = future::join_all(fetches).await;

    let mut bodies = Vec::with_capacity(urls.len());
    let mut failures = Vec::new();
    for (url, result) in urls.iter().zip(results) {
        match result {
            Ok(body) => bodies.push(body),
            Err(error) => {
                events.emit(HostEvent::ScriptLoadFailed {
                    url: url.clone(),
                    status: error.status,
                    status_text: error.status_text.clone(),
                });
                failures.push(ScriptFailure {
                    url: url.clone(),
                    error,
                });
            }
        }
    }

    if failures.is_empty() {
        debug!(count = bodies.len(), "auxiliary scripts loaded");
        Ok(bodies)
    } else {
        Err(failures)
    }
}
