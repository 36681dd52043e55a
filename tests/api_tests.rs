//! API client and session tests against a mocked task server.

use std::time::Duration;

use serde_json::json;
use taskdesk::api::{self, ApiClient, ApiError};
use taskdesk::models::{LoginRequest, Role, TaskPayload, TaskStatus};
use taskdesk::services::{
    refresh_active, reload_tasks, start_session, LoginError, LoginForm, RefreshReport, ReloadOutcome, SessionStore,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    api::set_silent(true);
    ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

fn tasks_json() -> serde_json::Value {
    json!([
        {"id": 1, "title": "Write docs", "description": "User guide", "deadline": "2024-05-01",
         "assigned_user_id": 2, "assigned_user_name": "alice", "status": "Pending"},
        {"id": 2, "title": "Fix login", "description": null, "deadline": null,
         "assigned_user_id": null, "assigned_user_name": null, "status": "In Progress"}
    ])
}

// =============================================================================
// HTTP helper
// =============================================================================

mod http_helper {
    use super::*;

    #[tokio::test]
    async fn test_load_tasks_parses_nulls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tasks_json()))
            .mount(&server)
            .await;

        let tasks = api::load_tasks(&client(&server)).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].status, TaskStatus::InProgress);
        assert!(tasks[1].assigned_user_name.is_none());
    }

    #[tokio::test]
    async fn test_unknown_status_row_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "ok", "status": "Done"},
                {"id": 2, "title": "odd", "status": "Blocked"}
            ])))
            .mount(&server)
            .await;

        let tasks = api::load_tasks(&client(&server)).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 1);
        assert_eq!(tasks[0].status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn test_non_success_status_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        match api::load_tasks(&client(&server)).await {
            Err(ApiError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let err = api::load_users(&client(&server)).await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        api::set_silent(true);
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = api::load_tasks(&api).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert!(err.notice().starts_with("Network error"));
    }

    #[tokio::test]
    async fn test_create_update_and_delete_paths() {
        let server = MockServer::start().await;
        let payload = TaskPayload {
            title: "T".into(),
            description: "D".into(),
            deadline: "2024-01-01".into(),
            assigned_user_id: 3,
            status: TaskStatus::Done,
        };
        let expected = json!({
            "title": "T", "description": "D", "deadline": "2024-01-01",
            "assigned_user_id": 3, "status": "Done"
        });
        Mock::given(method("POST"))
            .and(path("/api/tasks"))
            .and(body_json(&expected))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/tasks/9"))
            .and(body_json(&expected))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/tasks/9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server);
        api::create_task(&api, &payload).await.unwrap();
        api::update_task(&api, 9, &payload).await.unwrap();
        api::delete_task(&api, 9).await.unwrap();
    }

    #[tokio::test]
    async fn test_status_update_sends_only_status() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/tasks/4"))
            .and(body_json(json!({"status": "In Progress"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        api::update_task_status(&client(&server), 4, TaskStatus::InProgress)
            .await
            .unwrap();
    }
}

// =============================================================================
// Login
// =============================================================================

mod login {
    use super::*;

    #[tokio::test]
    async fn test_login_sends_username_and_role() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .and(body_json(json!({"username": "alice", "role": "user"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "user": {"id": 2, "name": "alice", "role": "user"},
                "users": [{"id": 1, "name": "pm"}, {"id": 2, "name": "alice"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = api::login(
            &client(&server),
            &LoginRequest {
                username: "alice".into(),
                role: Role::User,
            },
        )
        .await
        .unwrap();
        assert!(response.ok);
        assert_eq!(response.users.len(), 2);
    }

    #[tokio::test]
    async fn test_submit_trims_username_and_keeps_roster() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .and(body_json(json!({"username": "alice", "role": "user"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "user": {"name": "alice", "role": "user"},
                "users": [{"id": 2, "name": "alice"}]
            })))
            .mount(&server)
            .await;

        let mut form = LoginForm::new(Role::User, "  alice ");
        let user = form.submit(&client(&server)).await.unwrap();
        assert_eq!(user.name, "alice");
        assert_eq!(user.id, None);
        assert_eq!(user.roster.name_of(2), Some("alice"));
    }

    #[tokio::test]
    async fn test_rejected_login_shows_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": false})))
            .expect(1)
            .mount(&server)
            .await;

        let mut form = LoginForm::new(Role::Pm, "");
        let err = form.submit(&client(&server)).await.unwrap_err();
        assert!(matches!(err, LoginError::Rejected));
        assert_eq!(form.error(), Some("Login failed. Try again."));
    }

    #[tokio::test]
    async fn test_empty_user_name_never_reaches_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(0)
            .mount(&server)
            .await;

        let mut form = LoginForm::new(Role::User, "   ");
        let err = form.submit(&client(&server)).await.unwrap_err();
        assert!(matches!(err, LoginError::UsernameRequired));
    }
}

// =============================================================================
// Session loads
// =============================================================================

mod session_loads {
    use super::*;
    use taskdesk::models::{RosterEntry, Roster, SessionUser};

    fn pm() -> SessionUser {
        SessionUser {
            id: Some(1),
            name: "pm".into(),
            role: Role::Pm,
            roster: Roster::new(vec![RosterEntry { id: 99, name: "stale".into() }]),
        }
    }

    #[tokio::test]
    async fn test_initial_loads_survive_one_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 2, "name": "alice"}])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tasks_json()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/overdue"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let handle = start_session(&client(&server), pm()).await;
        let mut session = handle.snapshot();
        assert_eq!(session.tasks.len(), 2);
        // Replaced, not merged.
        assert_eq!(session.roster().entries(), &[RosterEntry { id: 2, name: "alice".into() }]);
        let notices = session.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("503"));
    }

    #[tokio::test]
    async fn test_user_session_skips_overdue_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tasks_json()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/overdue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let user = SessionUser {
            id: Some(2),
            name: "alice".into(),
            role: Role::User,
            roster: Roster::default(),
        };
        let handle = start_session(&client(&server), user).await;
        let session = handle.snapshot();
        assert!(!session.overdue.visible);
        let list = session.task_list();
        assert_eq!(list.rows.len(), 1);
        assert_eq!(list.rows[0].title, "Write docs");
    }

    #[tokio::test]
    async fn test_superseded_reload_is_discarded() {
        let server = MockServer::start().await;
        // The first request answers slowly with stale data.
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"id": 1, "title": "stale", "status": "Pending"}]))
                    .set_delay(Duration::from_millis(500)),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": 2, "title": "fresh", "status": "Done"}])),
            )
            .mount(&server)
            .await;

        let api = client(&server);
        let handle = taskdesk::SessionHandle::new(taskdesk::Session::new(pm()));
        let (older, newer) = tokio::join!(reload_tasks(&api, &handle), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            reload_tasks(&api, &handle).await
        });

        assert_eq!(older.unwrap(), ReloadOutcome::Superseded);
        assert_eq!(newer.unwrap(), ReloadOutcome::Applied);
        let titles: Vec<String> = handle.snapshot().tasks.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["fresh".to_string()]);
    }

    #[tokio::test]
    async fn test_refresh_reloads_tasks_of_active_sessions_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 2, "name": "alice"}])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/overdue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        // Initial load of the active session, then its refresh.
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "title": "old", "status": "Pending"}])))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tasks_json()))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server);
        let sessions = SessionStore::new();
        let idle_sid = sessions.insert(taskdesk::SessionHandle::new(taskdesk::Session::new(pm())));
        tokio::time::sleep(Duration::from_millis(150)).await;
        let active_sid = sessions.insert(start_session(&api, pm()).await);
        let active = sessions.get(&active_sid).unwrap();

        let report = refresh_active(&api, &sessions, Duration::from_millis(100)).await;
        assert_eq!(
            report,
            RefreshReport {
                refreshed: 1,
                superseded: 0,
                failed: 0,
                pruned: 1,
            }
        );
        assert!(sessions.get(&idle_sid).is_none());
        assert_eq!(active.snapshot().tasks.len(), 2);
        server.verify().await;
    }
}
