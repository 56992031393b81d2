//! End-to-end scenarios: a real main loop driven from worker threads.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use deskgui_common::events::{WebviewOnMessage, WindowClose};
use deskgui_common::{DeskError, MarshalError};

use crate::{App, HandlerState, WebviewOptions};

#[test]
fn worker_sets_title_while_main_loop_runs() {
    let app = App::new("scenario");
    let window = app.create_window("main").unwrap();

    let worker_app = Arc::clone(&app);
    let worker_window = Arc::clone(&window);
    let worker = thread::spawn(move || {
        worker_window.set_title("X").unwrap();
        let title = worker_window.title().unwrap();
        worker_app.terminate().unwrap();
        title
    });

    app.run();

    assert_eq!(worker.join().unwrap(), "X");
    assert!(!app.is_running());
    assert_eq!(app.handler().state(), HandlerState::Terminated);
    assert!(window.is_destroyed());
}

#[test]
fn worker_inside_tokio_runtime_uses_blocking_api() {
    let app = App::new("scenario");
    let window = app.create_window("main").unwrap();

    let worker_app = Arc::clone(&app);
    let worker = thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let title = runtime.block_on(async {
            window.set_title("from runtime")?;
            window.title()
        });
        worker_app.terminate().unwrap();
        title
    });

    app.run();
    assert_eq!(worker.join().unwrap().unwrap(), "from runtime");
}

#[test]
fn listener_may_close_its_own_window() {
    let app = App::new("scenario");
    let window = app.create_window("main").unwrap();
    let webview = window
        .create_webview("content", WebviewOptions::new())
        .unwrap();
    let target = Arc::downgrade(&window);
    webview.events().connect(move |event: &mut WebviewOnMessage| {
        if event.message().contains("close") {
            if let Some(window) = target.upgrade() {
                assert!(window.request_close().unwrap());
            }
        }
    });
    let later = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&later);
    webview.events().connect_signal::<WebviewOnMessage, _>(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    webview
        .on_message(r#"{"name":"page","message":"close"}"#)
        .unwrap();

    assert!(window.is_destroyed());
    assert!(app.window_names().is_empty());
    assert_eq!(app.handler().open_windows_count(), 0);
    assert_eq!(app.handler().state(), HandlerState::Terminated);
    assert_eq!(webview.events().connection_count::<WebviewOnMessage>(), 0);
    assert!(webview.url().is_err());
    // At most the listener that ran before the close saw the message.
    assert!(later.load(Ordering::SeqCst) <= 1);
}

#[test]
fn calls_after_terminate_report_terminated() {
    let app = App::new("scenario");
    let window = app.create_window("main").unwrap();

    let worker_app = Arc::clone(&app);
    let terminator = thread::spawn(move || worker_app.terminate().unwrap());
    app.run();
    terminator.join().unwrap();

    let late = thread::spawn(move || window.set_title("late")).join().unwrap();
    assert!(matches!(
        late,
        Err(DeskError::Marshal(MarshalError::Terminated))
    ));
}

#[test]
fn listener_panic_reaches_the_calling_worker() {
    let app = App::new("scenario");
    let window = app.create_window("main").unwrap();
    window
        .events()
        .connect_signal::<WindowClose, _>(|| panic!("close handler failed"));

    let worker_app = Arc::clone(&app);
    let worker_window = Arc::clone(&window);
    let worker = thread::spawn(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| worker_window.request_close()));
        // The loop is still serving requests after the panic.
        let title = worker_window.title().unwrap();
        worker_app.terminate().unwrap();
        (outcome.is_err(), title)
    });

    app.run();

    let (panicked, title) = worker.join().unwrap();
    assert!(panicked);
    assert_eq!(title, "deskgui");
}

#[test]
fn closing_last_window_from_worker_ends_loop() {
    let app = App::new("scenario");
    let window = app.create_window("main").unwrap();

    let worker = thread::spawn(move || window.request_close().unwrap());
    app.run();

    assert!(worker.join().unwrap());
    assert_eq!(app.handler().state(), HandlerState::Terminated);
    assert_eq!(app.handler().open_windows_count(), 0);
}

#[test]
fn many_workers_share_one_window() {
    let app = App::new("scenario");
    let window = app.create_window("main").unwrap();
    let webview = window
        .create_webview("content", WebviewOptions::new())
        .unwrap();
    let messages = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&messages);
    webview.events().connect_signal::<WebviewOnMessage, _>(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let webview = Arc::clone(&webview);
            thread::spawn(move || {
                for j in 0..10 {
                    webview
                        .on_message(format!(r#"{{"name":"w{i}","message":{j}}}"#))
                        .unwrap();
                }
            })
        })
        .collect();

    let worker_app = Arc::clone(&app);
    let supervisor = thread::spawn(move || {
        for worker in workers {
            worker.join().unwrap();
        }
        worker_app.terminate().unwrap();
    });

    app.run();
    supervisor.join().unwrap();
    assert_eq!(messages.load(Ordering::SeqCst), 80);
}

#[tokio::test]
async fn async_caller_awaits_main_loop() {
    let app = App::new("scenario");
    let window = app.create_window("main").unwrap();

    let loop_app = Arc::clone(&app);
    let main_loop = thread::spawn(move || loop_app.run());
    // Running is set only after the loop thread became the main thread.
    while app.handler().state() != HandlerState::Running {
        thread::yield_now();
    }

    let target = Arc::clone(&window);
    let title = app
        .handler()
        .run_on_main_thread_async(move || {
            target.set_title("async")?;
            target.title()
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(title, "async");

    let stopping = Arc::clone(&app);
    app.handler()
        .run_on_main_thread_async(move || stopping.terminate())
        .await
        .unwrap()
        .unwrap();
    main_loop.join().unwrap();
    assert_eq!(app.handler().state(), HandlerState::Terminated);
}
