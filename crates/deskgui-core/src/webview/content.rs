//! Navigation, page content and script evaluation.

use std::path::{Path, PathBuf};

use deskgui_common::events::{
    WebviewContentLoaded, WebviewFrameNavigationStarting, WebviewNavigationStarting,
    WebviewSourceChanged,
};
use deskgui_common::{Event, Result};
use tracing::{debug, info};

use super::native::BLANK_URL;
use super::Webview;
use crate::ipc;

impl Webview {
    /// Navigate the top-level frame to `url`.
    ///
    /// Emits [`WebviewNavigationStarting`] first; if a listener cancels it
    /// the current page stays and `false` is returned. Otherwise the source
    /// changes and [`WebviewSourceChanged`] then [`WebviewContentLoaded`]
    /// are emitted.
    pub fn navigate(&self, url: impl Into<String>) -> Result<bool> {
        let url = url.into();
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.navigate(url));
        }
        drop(self.native()?);

        let mut starting = WebviewNavigationStarting::new(url.clone());
        self.events.emit(&mut starting);
        if starting.is_cancelled() {
            info!(webview = %self.name, %url, "navigation cancelled by listener");
            return Ok(false);
        }

        {
            let mut native = self.native()?;
            native.url = url.clone();
            native.html = None;
        }
        debug!(webview = %self.name, %url, "navigated");

        self.events.emit(&mut WebviewSourceChanged::new(url));
        self.events.emit(&mut WebviewContentLoaded::new(true));
        Ok(true)
    }

    /// Native entry point for a sub-frame navigation. Returns whether the
    /// navigation may proceed.
    pub fn navigate_frame(&self, url: impl Into<String>) -> Result<bool> {
        let url = url.into();
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.navigate_frame(url));
        }
        drop(self.native()?);

        let mut starting = WebviewFrameNavigationStarting::new(url);
        self.events.emit(&mut starting);
        Ok(!starting.is_cancelled())
    }

    /// Replace the page with `html`. The source becomes `about:blank`.
    pub fn load_html_string(&self, html: impl Into<String>) -> Result<()> {
        let html = html.into();
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.load_html_string(html));
        }

        {
            let mut native = self.native()?;
            native.url = BLANK_URL.to_string();
            native.html = Some(html);
        }
        self.events.emit(&mut WebviewContentLoaded::new(true));
        Ok(())
    }

    /// Navigate to a local file. Fails with an I/O error when `path` does
    /// not resolve.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path: PathBuf = path.as_ref().canonicalize()?;
        self.navigate(format!("file://{}", path.display()))
    }

    pub fn url(&self) -> Result<String> {
        if !self.handler.is_main_thread() {
            return self.marshal(|webview| webview.url());
        }
        Ok(self.native()?.url.clone())
    }

    /// HTML loaded through [`Webview::load_html_string`], if that is what
    /// is showing.
    pub fn html(&self) -> Result<Option<String>> {
        if !self.handler.is_main_thread() {
            return self.marshal(|webview| webview.html());
        }
        Ok(self.native()?.html.clone())
    }

    /// Register `script` to run at the start of every page load.
    pub fn inject_script(&self, script: impl Into<String>) -> Result<()> {
        let script = script.into();
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.inject_script(script));
        }
        self.native()?.injected_scripts.push(script);
        Ok(())
    }

    /// Evaluate `script` in the current page.
    pub fn execute_script(&self, script: impl Into<String>) -> Result<()> {
        let script = script.into();
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.execute_script(script));
        }
        self.native()?.executed_scripts.push(script);
        Ok(())
    }

    /// Deliver `message` to the page's message listeners.
    pub fn post_message(&self, message: impl AsRef<str>) -> Result<()> {
        self.execute_script(ipc::post_message_script(message.as_ref()))
    }

    pub fn injected_scripts(&self) -> Result<Vec<String>> {
        if !self.handler.is_main_thread() {
            return self.marshal(|webview| webview.injected_scripts());
        }
        Ok(self.native()?.injected_scripts.clone())
    }

    /// Scripts evaluated so far, oldest first.
    pub fn executed_scripts(&self) -> Result<Vec<String>> {
        if !self.handler.is_main_thread() {
            return self.marshal(|webview| webview.executed_scripts());
        }
        Ok(self.native()?.executed_scripts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::test_webview;
    use super::*;
    use deskgui_common::DeskError;
    use parking_lot::Mutex;
    use std::io::Write;
    use std::sync::Arc;

    fn record_events(webview: &Webview) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        webview
            .events()
            .connect(move |event: &mut WebviewSourceChanged| {
                sink.lock().push(format!("source:{}", event.source()));
            });
        let sink = Arc::clone(&log);
        webview
            .events()
            .connect(move |event: &mut WebviewContentLoaded| {
                sink.lock().push(format!("loaded:{}", event.state()));
            });
        log
    }

    #[test]
    fn starts_blank() {
        let (_handler, webview) = test_webview();
        assert_eq!(webview.url().unwrap(), BLANK_URL);
        assert!(webview.html().unwrap().is_none());
    }

    #[test]
    fn navigate_emits_source_then_loaded() {
        let (_handler, webview) = test_webview();
        let log = record_events(&webview);

        assert!(webview.navigate("https://example.com").unwrap());
        assert_eq!(webview.url().unwrap(), "https://example.com");
        assert_eq!(
            *log.lock(),
            vec!["source:https://example.com", "loaded:true"]
        );
    }

    #[test]
    fn cancelled_navigation_keeps_url() {
        let (_handler, webview) = test_webview();
        webview.navigate("https://example.com").unwrap();
        webview
            .events()
            .connect(|event: &mut WebviewNavigationStarting| {
                if event.url().starts_with("http://") {
                    event.prevent_default();
                }
            });
        let log = record_events(&webview);

        assert!(!webview.navigate("http://insecure.test").unwrap());
        assert_eq!(webview.url().unwrap(), "https://example.com");
        assert!(log.lock().is_empty());

        assert!(webview.navigate("https://other.test").unwrap());
        assert_eq!(webview.url().unwrap(), "https://other.test");
    }

    #[test]
    fn frame_navigation_can_be_blocked() {
        let (_handler, webview) = test_webview();
        webview
            .events()
            .connect(|event: &mut WebviewFrameNavigationStarting| {
                if event.url().contains("ads") {
                    event.prevent_default();
                }
            });

        assert!(webview.navigate_frame("https://cdn.test/widget").unwrap());
        assert!(!webview.navigate_frame("https://ads.test/banner").unwrap());
        assert_eq!(webview.url().unwrap(), BLANK_URL);
    }

    #[test]
    fn load_html_string_shows_blank_source() {
        let (_handler, webview) = test_webview();
        webview.navigate("https://example.com").unwrap();
        let log = record_events(&webview);

        webview.load_html_string("<h1>hi</h1>").unwrap();
        assert_eq!(webview.url().unwrap(), BLANK_URL);
        assert_eq!(webview.html().unwrap().as_deref(), Some("<h1>hi</h1>"));
        assert_eq!(*log.lock(), vec!["loaded:true"]);

        webview.navigate("https://example.com").unwrap();
        assert!(webview.html().unwrap().is_none());
    }

    #[test]
    fn load_file_navigates_to_file_url() {
        let (_handler, webview) = test_webview();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "<p>local</p>").unwrap();

        assert!(webview.load_file(file.path()).unwrap());
        let url = webview.url().unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with(&*file.path().file_name().unwrap().to_string_lossy()));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let (_handler, webview) = test_webview();
        let dir = tempfile::tempdir().unwrap();
        let err = webview.load_file(dir.path().join("missing.html")).unwrap_err();
        assert!(matches!(err, DeskError::Io(_)));
        assert_eq!(webview.url().unwrap(), BLANK_URL);
    }

    #[test]
    fn scripts_are_recorded_in_order() {
        let (_handler, webview) = test_webview();
        webview.inject_script("console.log('boot')").unwrap();
        webview.execute_script("one()").unwrap();
        webview.execute_script("two()").unwrap();

        assert_eq!(webview.injected_scripts().unwrap().len(), 2);
        assert_eq!(webview.executed_scripts().unwrap(), vec!["one()", "two()"]);
    }

    #[test]
    fn post_message_evaluates_dispatch() {
        let (_handler, webview) = test_webview();
        webview.post_message("pong").unwrap();
        assert_eq!(
            webview.executed_scripts().unwrap(),
            vec![ipc::post_message_script("pong")]
        );
    }
}
