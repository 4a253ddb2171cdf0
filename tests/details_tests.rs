mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    ScriptedSource, Step, sample_repo_details, sample_repo_details_minimal, wait_until,
};
use ghstars::app::state::{STATUS_CLEARED, STATUS_FAILED, STATUS_LOADED, STATUS_READY};
use ghstars::app::{DetailsController, DetailsSessions, Inline, LoadState, MainLoop};
use ghstars::github::FetchError;

fn controller(source: &Arc<ScriptedSource>, main_loop: &MainLoop) -> DetailsController {
    DetailsController::new(source.clone(), main_loop.dispatcher(), "golang/go", "token123")
}

async fn settle(main_loop: &mut MainLoop, controller: &DetailsController) {
    main_loop.run_pending();
    tokio::time::timeout(
        Duration::from_secs(5),
        main_loop.run_until(|| controller.view().load_state.is_settled()),
    )
    .await
    .expect("load never settled");
}

// --- Controller ---

#[test]
fn test_initial_view_shows_requested_name() {
    let source = Arc::new(ScriptedSource::new());
    let controller = DetailsController::new(source, Arc::new(Inline), "golang/go", "");

    let view = controller.view();
    assert_eq!(controller.full_name(), "golang/go");
    assert_eq!(view.fields.name, "golang/go");
    assert_eq!(view.fields.description, "");
    assert_eq!(view.status, STATUS_READY);
    assert_eq!(view.load_state, LoadState::Idle);
}

#[tokio::test]
async fn test_load_success_formats_fields() {
    let source = Arc::new(ScriptedSource::new());
    source.push_details(Step::ok(sample_repo_details()));
    let mut main_loop = MainLoop::new();
    let controller = controller(&source, &main_loop);

    controller.load();
    settle(&mut main_loop, &controller).await;

    let view = controller.view();
    assert_eq!(view.status, STATUS_LOADED);
    assert!(!view.loading);

    let fields = &view.fields;
    assert_eq!(fields.name, "golang/go");
    assert_eq!(fields.description, "The Go programming language");
    assert_eq!(fields.language, "Go");
    assert_eq!(fields.homepage, "https://go.dev");
    assert_eq!(fields.default_branch, "main");
    assert_eq!(fields.license, "BSD 3-Clause");
    assert_eq!(fields.topics, "go, golang, programming-language, compiler");
    assert_eq!(fields.stars, "123456");
    assert_eq!(fields.forks, "12345");
    assert_eq!(fields.watchers, "5000");
    assert_eq!(fields.open_issues, "3500");
    assert_eq!(fields.size, "250000");
    assert_eq!(fields.updated_at, "2024-01-01 12:00");
    assert_eq!(fields.created_at, "2009-11-10 23:00");
    assert_eq!(fields.pushed_at, "2024-01-01 11:30");
    assert_eq!(fields.private, "false");
    assert_eq!(fields.html_url, "https://github.com/golang/go");
    assert_eq!(source.details_calls(), 1);
}

#[tokio::test]
async fn test_missing_values_show_placeholder() {
    let source = Arc::new(ScriptedSource::new());
    source.push_details(Step::ok(sample_repo_details_minimal()));
    let mut main_loop = MainLoop::new();
    let controller = controller(&source, &main_loop);

    controller.load();
    settle(&mut main_loop, &controller).await;

    let fields = controller.view().fields;
    assert_eq!(fields.name, "user/minimal-repo");
    assert_eq!(fields.description, "-");
    assert_eq!(fields.language, "-");
    assert_eq!(fields.homepage, "-");
    assert_eq!(fields.license, "-");
    assert_eq!(fields.topics, "-");
    assert_eq!(fields.stars, "0");
    assert_eq!(fields.default_branch, "master");
}

#[tokio::test]
async fn test_load_failure() {
    let source = Arc::new(ScriptedSource::new());
    source.push_details(Step::err(FetchError::Api {
        status: "404 Not Found".into(),
        message: "Not Found".into(),
    }));
    let mut main_loop = MainLoop::new();
    let controller = controller(&source, &main_loop);

    controller.load();
    settle(&mut main_loop, &controller).await;

    let view = controller.view();
    assert_eq!(view.status, STATUS_FAILED);
    assert_eq!(view.load_state, LoadState::Failed);
    assert_eq!(view.error, "github api error: 404 Not Found: Not Found");
    assert_eq!(view.fields.name, "golang/go");
}

#[tokio::test]
async fn test_cancel_publishes_cancellation() {
    let source = Arc::new(ScriptedSource::new());
    source.push_details(Step::ok(sample_repo_details()).after(Duration::from_secs(10)));
    let mut main_loop = MainLoop::new();
    let controller = controller(&source, &main_loop);

    controller.load();
    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.cancel();
    settle(&mut main_loop, &controller).await;

    let view = controller.view();
    assert_eq!(view.error, "request canceled");
    assert_eq!(view.fields.description, "");
    assert_eq!(source.finished(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_lookup_times_out() {
    let source = Arc::new(ScriptedSource::new());
    source.push_details(Step::ok(sample_repo_details()).after(Duration::from_secs(31)));
    let mut main_loop = MainLoop::new();
    let controller = controller(&source, &main_loop);

    controller.load();
    main_loop
        .run_until(|| controller.view().load_state.is_settled())
        .await;

    assert_eq!(controller.view().error, "request timeout");
}

#[tokio::test]
async fn test_clear_resets_fields() {
    let source = Arc::new(ScriptedSource::new());
    source.push_details(Step::ok(sample_repo_details()));
    let mut main_loop = MainLoop::new();
    let controller = controller(&source, &main_loop);

    controller.load();
    settle(&mut main_loop, &controller).await;
    controller.clear();
    main_loop.run_pending();

    let view = controller.view();
    assert_eq!(view.status, STATUS_CLEARED);
    assert_eq!(view.load_state, LoadState::Idle);
    assert_eq!(view.fields.name, "golang/go");
    assert_eq!(view.fields.stars, "");
}

#[tokio::test]
async fn test_reload_supersedes_running_lookup() {
    let source = Arc::new(ScriptedSource::new());
    source
        .push_details(Step::ok(sample_repo_details_minimal()).after(Duration::from_millis(200)))
        .push_details(Step::ok(sample_repo_details()));
    let mut main_loop = MainLoop::new();
    let controller = controller(&source, &main_loop);

    controller.load();
    tokio::time::sleep(Duration::from_millis(10)).await;
    controller.load();
    settle(&mut main_loop, &controller).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    main_loop.run_pending();

    assert_eq!(controller.view().fields.name, "golang/go");
    assert_eq!(source.details_calls(), 2);
}

// --- Sessions ---

#[tokio::test]
async fn test_open_reuses_existing_session() {
    let source = Arc::new(ScriptedSource::new());
    source.push_details(Step::ok(sample_repo_details()).after(Duration::from_millis(20)));
    let main_loop = MainLoop::new();
    let sessions = DetailsSessions::new(source.clone(), main_loop.dispatcher());

    let first = sessions.open("golang/go", "");
    let second = sessions.open("golang/go", "");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(sessions.len(), 1);
    wait_until(|| source.finished() == 1).await;
    assert_eq!(source.details_calls(), 1);
}

#[tokio::test]
async fn test_distinct_names_get_distinct_sessions() {
    let source = Arc::new(ScriptedSource::new());
    source
        .push_details(Step::ok(sample_repo_details()))
        .push_details(Step::ok(sample_repo_details_minimal()));
    let sessions = DetailsSessions::new(source.clone(), Arc::new(Inline));

    let a = sessions.open("golang/go", "");
    let b = sessions.open("user/minimal-repo", "");

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(sessions.len(), 2);
    assert!(sessions.contains("golang/go"));
    assert!(sessions.contains("user/minimal-repo"));
    wait_until(|| source.details_calls() == 2).await;
}

#[tokio::test]
async fn test_close_then_reopen_starts_new_lookup() {
    let source = Arc::new(ScriptedSource::new());
    source
        .push_details(Step::ok(sample_repo_details()))
        .push_details(Step::ok(sample_repo_details()));
    let sessions = DetailsSessions::new(source.clone(), Arc::new(Inline));

    let first = sessions.open("golang/go", "");
    wait_until(|| first.view().load_state == LoadState::Loaded).await;

    assert!(sessions.close("golang/go"));
    assert!(!sessions.close("golang/go"));
    assert!(sessions.is_empty());

    let second = sessions.open("golang/go", "");
    assert!(!Arc::ptr_eq(&first, &second));
    wait_until(|| second.view().load_state == LoadState::Loaded).await;
    assert_eq!(source.details_calls(), 2);
}

#[tokio::test]
async fn test_close_stops_publication() {
    let source = Arc::new(ScriptedSource::new());
    source.push_details(Step::ok(sample_repo_details()).after(Duration::from_millis(50)));
    let sessions = DetailsSessions::new(source.clone(), Arc::new(Inline));

    let controller = sessions.open("golang/go", "");
    assert!(controller.view().loading);
    sessions.close("golang/go");
    tokio::time::sleep(Duration::from_millis(150)).await;

    let view = controller.view();
    assert_eq!(view.load_state, LoadState::Loading);
    assert_eq!(view.fields.description, "");
    assert_eq!(source.finished(), 0);
}
