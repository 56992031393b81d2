//! Scripted session: a worker thread drives the window the way a user and a
//! page script would, while the main thread runs the loop.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use deskgui_common::events::{
    WebviewNavigationStarting, WebviewOnMessage, WindowClose, WindowResize, WindowShow,
};
use deskgui_common::{Event, Result, ViewSize};
use deskgui_core::{App, Webview, Window};
use tracing::{debug, info, warn};

/// Page shown in the demo webview.
pub const PAGE: &str = r#"<!doctype html>
<html>
  <body>
    <h1>deskgui</h1>
    <script>
      window.webview.onMessage(function (reply) { document.body.append(reply); });
      greet("page");
    </script>
  </body>
</html>
"#;

/// Schemes the demo webview may navigate to.
const ALLOWED_SCHEMES: [&str; 3] = ["https://", "file://", "about:"];

/// What the worker observed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub round_trips: u32,
    pub navigation_blocked: bool,
    pub replies: usize,
    pub resize_events: usize,
    pub closed: bool,
}

/// Connect logging listeners and the `greet` callback. Call on the main thread.
pub fn install_listeners(window: &Window, webview: &Arc<Webview>) -> Result<()> {
    window.events().connect(|event: &mut WindowResize| {
        info!(size = %event.size(), "window resized");
    });
    window.events().connect(|event: &mut WindowShow| {
        debug!(visible = event.state(), "window visibility changed");
    });
    window
        .events()
        .connect_signal::<WindowClose, _>(|| info!("window closing"));

    webview
        .events()
        .connect(|event: &mut WebviewNavigationStarting| {
            if !ALLOWED_SCHEMES.iter().any(|s| event.url().starts_with(s)) {
                warn!(url = event.url(), "blocked navigation");
                event.prevent_default();
            }
        });
    webview.events().connect(|event: &mut WebviewOnMessage| {
        debug!(message = event.message(), "page message");
    });

    let target = Arc::downgrade(webview);
    webview.add_callback("greet", move |payload| {
        let Some(webview) = target.upgrade() else {
            return;
        };
        let name: String = serde_json::from_str(&payload).unwrap_or_else(|_| "stranger".into());
        if let Err(e) = webview.post_message(format!("hello, {name}")) {
            warn!("failed to reply to greet: {e}");
        }
    })?;
    Ok(())
}

/// Drive the window from the calling (non-main) thread, then close it.
pub fn run_session(
    window: &Window,
    webview: &Webview,
    round_trips: u32,
) -> Result<SessionReport> {
    let mut report = SessionReport::default();
    let base_title = window.title()?;

    for i in 1..=round_trips {
        window.set_title(format!("{base_title} ({i}/{round_trips})"))?;
        debug!(title = %window.title()?, "title updated from worker");
        report.round_trips += 1;
    }

    webview.load_html_string(PAGE)?;
    report.navigation_blocked = !webview.navigate("http://insecure.example")?;

    let before = webview.executed_scripts()?.len();
    webview.on_message(r#"{"name":"greet","message":"worker"}"#)?;
    report.replies = webview.executed_scripts()?.len() - before;

    // A drag: the platform reports sizes faster than the throttle period.
    let start = window.size()?;
    for step in 1..=5 {
        let size = ViewSize::new(start.width + step * 10, start.height + step * 10);
        if window.notify_resized(size)? {
            report.resize_events += 1;
        }
    }

    report.closed = window.request_close()?;
    info!(?report, "session finished");
    Ok(report)
}

/// Run [`run_session`] on a named worker thread. If the session fails the
/// app is terminated so the main loop does not wait forever.
pub fn spawn_worker(
    app: Arc<App>,
    window: Arc<Window>,
    webview: Arc<Webview>,
    round_trips: u32,
) -> Result<JoinHandle<Result<SessionReport>>> {
    let handle = thread::Builder::new()
        .name("deskgui-worker".into())
        .spawn(move || {
            let result = run_session(&window, &webview, round_trips);
            if let Err(e) = &result {
                warn!("session failed: {e}");
                if let Err(e) = app.terminate() {
                    debug!("terminate after failed session: {e}");
                }
            }
            result
        })?;
    Ok(handle)
}
