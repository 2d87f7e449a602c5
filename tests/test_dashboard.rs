//! Dashboard actions against a scripted backend: state transitions and the
//! notification each action queues.

mod common;

use common::{container, container_with_update, dashboard, network_failure, MockBackend};
use guardian::backend::RunNowRequest;
use guardian::dashboard::{Notification, NotificationLevel, MAX_PENDING_NOTIFICATIONS};
use guardian::error::DashboardError;
use guardian::schedule::ScheduleDescriptor;
use guardian::selection::ContainerFlag;
use guardian::status::LogLevel;
use guardian::assembler::GlobalOptions;
use tokio_test::{assert_err, assert_ok};

fn messages(notifications: &[Notification]) -> Vec<&str> {
    notifications.iter().map(|n| n.message.as_str()).collect()
}

#[tokio::test]
async fn test_add_duplicate_and_remove() {
    let mock = MockBackend::new();
    let mut dash = dashboard(&mock);

    assert_ok!(dash.add_container("web", "nginx:1.25"));
    let err = assert_err!(dash.add_container("web", "nginx:latest"));
    assert_eq!(err, DashboardError::AlreadyMonitored("web".to_string()));
    assert_eq!(dash.selection().len(), 1);
    assert_eq!(dash.selection().get("web").unwrap().image, "nginx:1.25");

    dash.remove_container("web");
    // Removing an unknown name is not an error.
    dash.remove_container("ghost");
    assert!(dash.selection().is_empty());

    let notes = dash.take_notifications();
    assert_eq!(
        messages(&notes),
        vec![
            "Added web to monitoring",
            "Container already monitored",
            "Removed web from monitoring",
            "Removed ghost from monitoring",
        ]
    );
    assert_eq!(notes[0].level, NotificationLevel::Success);
    assert_eq!(notes[1].level, NotificationLevel::Warning);
    assert!(dash.take_notifications().is_empty());
}

#[tokio::test]
async fn test_add_from_catalog_uses_catalog_image() {
    let mock = MockBackend::with_containers(vec![
        container("web", "nginx:1.25"),
        container("db", "postgres:16"),
    ]);
    let mut dash = dashboard(&mock);
    assert_ok!(dash.refresh().await);

    assert_ok!(dash.add_from_catalog("db").await);
    assert_eq!(dash.selection().get("db").unwrap().image, "postgres:16");

    let err = assert_err!(dash.add_from_catalog("cache").await);
    assert_eq!(err, DashboardError::NotFound("cache".to_string()));
    assert_eq!(dash.selection().len(), 1);

    let notes = dash.take_notifications();
    assert_eq!(notes.last().unwrap().level, NotificationLevel::Error);
}

#[tokio::test]
async fn test_flags_and_stats() {
    let mock = MockBackend::with_containers(vec![
        container("web", "nginx"),
        container("db", "postgres"),
        container("cache", "redis"),
    ]);
    let mut dash = dashboard(&mock);
    assert_ok!(dash.refresh().await);

    for name in ["web", "db", "cache"] {
        assert_ok!(dash.add_from_catalog(name).await);
    }
    assert_ok!(dash.set_flag("db", ContainerFlag::AutoUpdate, false));
    assert_ok!(dash.set_flag("cache", ContainerFlag::Enabled, false));
    assert_ok!(dash.set_health_check_url("web", " http://web/health "));
    assert_err!(dash.set_flag("ghost", ContainerFlag::Enabled, false));

    let stats = dash.stats().await;
    assert_eq!(stats.total_containers, 3);
    assert_eq!(stats.monitored, 3);
    assert_eq!(stats.auto_updates, 1);
    assert!(stats.last_update.is_some());

    let web = dash.selection().get("web").unwrap();
    assert_eq!(web.health_check_url, "http://web/health");
    assert!(web.rollback_on_failure);
}

#[tokio::test]
async fn test_save_submits_assembled_document() {
    let mock = MockBackend::new();
    let mut dash = dashboard(&mock);
    assert_ok!(dash.add_container("web", "nginx"));
    assert_ok!(dash.add_container("db", "postgres"));
    assert_ok!(dash.set_flag("db", ContainerFlag::RollbackOnFailure, false));
    dash.set_schedule(ScheduleDescriptor::weekly(3, 1));
    dash.set_options(GlobalOptions {
        cleanup_unused_images: true,
        cleanup_keep_last_n: Some("abc".to_string()),
        check_interval_minutes: Some(" 30 ".to_string()),
        cron_enabled: true,
        ..GlobalOptions::default()
    });
    dash.take_notifications();

    let document = assert_ok!(dash.save().await);
    assert_eq!(document.cron.schedule, "0 3 * * 1");
    assert!(document.cron.enabled);
    assert_eq!(document.global.cleanup_keep_last_n, 3);
    assert_eq!(document.global.check_interval_minutes, 30);
    assert_eq!(document.telegram_bot_token, "");

    let names: Vec<&str> = document.containers.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["web", "db"]);
    assert!(!document.containers[1].rollback_on_failure);

    assert_eq!(mock.saved(), vec![document]);
    assert_eq!(
        messages(&dash.take_notifications()),
        vec!["Configuration saved successfully"]
    );
}

#[tokio::test]
async fn test_failed_save_keeps_state() {
    let mock = MockBackend::new();
    mock.set_save_result(Err(network_failure("connection refused")));
    let mut dash = dashboard(&mock);
    assert_ok!(dash.add_container("web", "nginx"));
    dash.take_notifications();

    let before = dash.build_document();
    assert_err!(dash.save().await);
    assert_eq!(dash.build_document(), before);
    assert!(mock.saved().is_empty());

    let notes = dash.take_notifications();
    assert_eq!(messages(&notes), vec!["Failed to save configuration"]);
    assert_eq!(notes[0].level, NotificationLevel::Error);
}

#[tokio::test]
async fn test_run_now_refreshes_logs() {
    let mock = MockBackend::new();
    mock.set_logs(Ok(vec![
        "2026-03-04 12:00:00 - INFO - Starting update cycle".to_string(),
        "2026-03-04 12:00:05 - SUCCESS - web updated".to_string(),
    ]));
    let mut dash = dashboard(&mock);

    assert_ok!(dash.run_now().await);
    assert_eq!(mock.run_now_calls(), vec![None]);
    assert_eq!(messages(&dash.take_notifications()), vec!["Update started"]);

    let lines = dash.log_lines().await;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].level, LogLevel::Success);

    mock.set_run_now_result(Err(network_failure("busy")));
    assert_err!(dash.run_now().await);
    assert_eq!(messages(&dash.take_notifications()), vec!["Failed to start update"]);
}

#[tokio::test]
async fn test_update_container_to_tag() {
    let mock = MockBackend::with_containers(vec![container_with_update(
        "web", "nginx", "1.25", "1.27",
    )]);
    let mut dash = dashboard(&mock);

    assert_ok!(dash.update_container("web", "1.27").await);
    assert_eq!(
        mock.run_now_calls(),
        vec![Some(RunNowRequest {
            name: "web".to_string(),
            target_tag: "1.27".to_string(),
        })]
    );
    assert_eq!(
        messages(&dash.take_notifications()),
        vec!["Updating web to 1.27...", "Successfully updated web to 1.27"]
    );
    // The catalog is reloaded after a successful update.
    assert_eq!(mock.container_fetches(), 1);

    mock.set_run_now_result(Err(network_failure("image not found")));
    assert_err!(dash.update_container("web", "9.9").await);
    assert_eq!(
        messages(&dash.take_notifications()),
        vec!["Updating web to 9.9...", "Failed to update web: image not found"]
    );
    assert_eq!(mock.container_fetches(), 1);
}

#[tokio::test]
async fn test_undrained_notifications_keep_the_newest() {
    let mock = MockBackend::new();
    let mut dash = dashboard(&mock);
    for i in 0..150 {
        dash.remove_container(&format!("c{}", i));
    }

    let pending = dash.take_notifications();
    assert_eq!(pending.len(), MAX_PENDING_NOTIFICATIONS);
    assert_eq!(pending[0].message, "Removed c50 from monitoring");
    assert_eq!(
        pending.last().unwrap().message,
        "Removed c149 from monitoring"
    );
    assert!(dash.take_notifications().is_empty());
}

#[tokio::test]
async fn test_clear_logs() {
    let mock = MockBackend::new();
    mock.set_logs(Ok(vec!["ERROR - pull failed".to_string()]));
    let mut dash = dashboard(&mock);
    assert_ok!(dash.refresher().refresh_logs().await);

    mock.set_clear_result(Err(network_failure("timeout")));
    assert_err!(dash.clear_logs().await);
    assert_eq!(dash.log_lines().await[0].level, LogLevel::Error);

    mock.set_clear_result(Ok(()));
    assert_ok!(dash.clear_logs().await);
    let lines = dash.log_lines().await;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "Logs cleared successfully");
    assert_eq!(mock.clear_calls(), 2);

    assert_eq!(
        messages(&dash.take_notifications()),
        vec!["Failed to clear logs", "Logs cleared successfully"]
    );
}

#[tokio::test]
async fn test_failed_refresh_keeps_catalog() {
    let mock = MockBackend::with_containers(vec![container("web", "nginx")]);
    let mut dash = dashboard(&mock);
    assert_ok!(dash.refresh().await);
    dash.take_notifications();

    mock.set_containers(Err(DashboardError::MalformedResponse("missing containers".into())));
    assert_err!(dash.refresh().await);
    assert_eq!(dash.page_items().await.len(), 1);
    assert_eq!(
        messages(&dash.take_notifications()),
        vec!["Refreshing containers...", "Failed to load containers"]
    );
}

#[tokio::test]
async fn test_search_and_pages() {
    let containers = (0..14)
        .map(|i| {
            let image = if i % 2 == 0 { "nginx" } else { "redis" };
            container(&format!("svc-{:02}", i), image)
        })
        .collect();
    let mock = MockBackend::with_containers(containers);
    let dash = dashboard(&mock);
    dash.refresher().refresh_catalog().await.unwrap();

    let info = dash.pagination().await.unwrap();
    assert_eq!((info.page, info.total_pages), (1, 3));
    dash.next_page().await;
    dash.next_page().await;
    dash.next_page().await;
    assert_eq!(dash.page_items().await.len(), 2);
    assert_eq!(dash.pagination().await.unwrap().page, 3);

    dash.search("REDIS").await;
    let info = dash.pagination().await.unwrap();
    assert_eq!((info.page, info.total_pages), (1, 2));
    assert!(dash.page_items().await.iter().all(|c| c.image == "redis"));

    dash.search("nothing-matches").await;
    assert!(dash.page_items().await.is_empty());
    assert!(dash.pagination().await.is_none());
}

#[tokio::test]
async fn test_load_document_reseeds_form() {
    let mock = MockBackend::new();
    let mut source = dashboard(&mock);
    assert_ok!(source.add_container("web", "nginx"));
    source.set_schedule(ScheduleDescriptor::custom(20));
    let document = source.build_document();

    let mut dash = dashboard(&mock);
    dash.load_document(&document);
    assert_eq!(dash.schedule(), &ScheduleDescriptor::custom(20));
    assert_eq!(dash.schedule_description(), "Every 20 minutes");
    assert!(dash.selection().contains("web"));
    assert_eq!(dash.build_document(), document);
}
