//! Integration tests for nestor-client API operations.
//!
//! These tests use wiremock to simulate Jenkins responses and verify that the
//! client correctly handles various API scenarios.

use futures::StreamExt;
use nestor_client::{
    BuildCriteria, Client, ClientError, ConsoleEvent, FeedScope, JobStatus, Monitor,
    MonitorOptions,
};
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Client {
    Client::new(server.uri())
        .unwrap()
        .with_poll_interval(Duration::from_millis(10))
}

async fn mount_dashboard(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [
                { "name": "app", "color": "red" },
                { "name": "lib", "color": "blue" },
                { "name": "docs", "color": "red_anime" },
                { "name": "site", "color": "yellow" }
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_build_with_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/job/job1/build"))
        .and(query_param("token", "nestor"))
        .and(body_json(json!({
            "parameter": [
                { "name": "k1", "value": "v1" },
                { "name": "k2", "value": "v2" }
            ]
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).build("job1", Some("k1=v1&k2=v2")).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_build_without_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/job/job1/build"))
        .and(body_json(json!({ "parameter": [] })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert!(client(&mock_server).build("job1", None).await.is_ok());
}

#[tokio::test]
async fn test_build_job_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/job/job1/build"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    match client(&mock_server).build("job1", None).await {
        Err(ClientError::JobNotFound(name)) => assert_eq!(name, "job1"),
        other => panic!("Expected JobNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_build_parameters_required() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/job/job1/build"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&mock_server)
        .await;

    match client(&mock_server).build("job1", None).await {
        Err(ClientError::ParametersRequired(name)) => assert_eq!(name, "job1"),
        other => panic!("Expected ParametersRequired, got {:?}", other),
    }
}

#[tokio::test]
async fn test_build_by_status_triggers_matching_jobs() {
    let mock_server = MockServer::start().await;
    mount_dashboard(&mock_server).await;

    for (job, expected) in [("app", 1), ("docs", 1), ("lib", 0), ("site", 0)] {
        Mock::given(method("POST"))
            .and(path(format!("/job/{}/build", job)))
            .respond_with(ResponseTemplate::new(201))
            .expect(expected)
            .mount(&mock_server)
            .await;
    }

    let criteria = BuildCriteria {
        status: Some(JobStatus::Fail),
    };
    let built = client(&mock_server).build_by(&criteria).await.unwrap();

    assert_eq!(built, vec!["app".to_string(), "docs".to_string()]);
}

#[tokio::test]
async fn test_build_by_without_criteria_builds_everything() {
    let mock_server = MockServer::start().await;
    mount_dashboard(&mock_server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(4)
        .mount(&mock_server)
        .await;

    let built = client(&mock_server)
        .build_by(&BuildCriteria::default())
        .await
        .unwrap();
    assert_eq!(built.len(), 4);
}

#[tokio::test]
async fn test_build_by_reports_error_after_all_triggers() {
    let mock_server = MockServer::start().await;
    mount_dashboard(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/job/app/build"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/job/docs/build"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let criteria = BuildCriteria {
        status: Some(JobStatus::Fail),
    };
    match client(&mock_server).build_by(&criteria).await {
        Err(ClientError::ParametersRequired(name)) => assert_eq!(name, "app"),
        other => panic!("Expected ParametersRequired, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stop_build() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/job/app/lastBuild/stop"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert!(client(&mock_server).stop("app").await.is_ok());
}

#[tokio::test]
async fn test_stop_job_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/job/missing/lastBuild/stop"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    match client(&mock_server).stop("missing").await {
        Err(ClientError::JobNotFound(name)) => assert_eq!(name, "missing"),
        other => panic!("Expected JobNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_console_server_error_mid_stream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/job/app/lastBuild/logText/progressiveText"))
        .and(query_param("start", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-more-data", "true")
                .insert_header("x-text-size", "5")
                .set_body_string("hello"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/job/app/lastBuild/logText/progressiveText"))
        .and(query_param("start", "5"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut console = client(&mock_server).console("app");

    assert_eq!(
        console.next().await.unwrap().unwrap(),
        ConsoleEvent::Data("hello".into())
    );
    match console.next().await {
        Some(Err(ClientError::Api { status, .. })) => assert_eq!(status, 500),
        other => panic!("Expected server error, got {:?}", other),
    }
    assert!(console.next().await.is_none());
}

#[tokio::test]
async fn test_console_streams_until_no_more_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/job/app/lastBuild/logText/progressiveText"))
        .and(query_param("start", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-more-data", "true")
                .insert_header("x-text-size", "10")
                .set_body_string("a"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/job/app/lastBuild/logText/progressiveText"))
        .and(query_param("start", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-text-size", "11")
                .set_body_string("b"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let events: Vec<ConsoleEvent> = client(&mock_server)
        .console("app")
        .map(|event| event.unwrap())
        .collect()
        .await;

    assert_eq!(
        events,
        vec![
            ConsoleEvent::Data("a".into()),
            ConsoleEvent::Data("b".into()),
            ConsoleEvent::End,
        ]
    );

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_console_job_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/job/missing/lastBuild/logText/progressiveText"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut console = client(&mock_server).console("missing");
    match console.next().await {
        Some(Err(ClientError::JobNotFound(name))) => assert_eq!(name, "missing"),
        other => panic!("Expected JobNotFound, got {:?}", other),
    }
    assert!(console.next().await.is_none());
}

#[tokio::test]
async fn test_dashboard() {
    let mock_server = MockServer::start().await;
    mount_dashboard(&mock_server).await;

    let jobs = client(&mock_server).dashboard().await.unwrap();

    assert_eq!(jobs.len(), 4);
    assert_eq!(jobs[0].name, "app");
    assert_eq!(jobs[0].status, JobStatus::Fail);
    assert_eq!(jobs[1].status, JobStatus::Ok);
    assert_eq!(jobs[3].status, JobStatus::Warn);
}

#[tokio::test]
async fn test_view_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/view/nightly/api/json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    match client(&mock_server).view_dashboard("nightly").await {
        Err(ClientError::ViewNotFound(name)) => assert_eq!(name, "nightly"),
        other => panic!("Expected ViewNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_job_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/job/app/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "app",
            "color": "blue_anime",
            "healthReport": [
                { "description": "Build stability: No recent builds failed.", "score": 100 },
                { "description": "Test Result: 0 tests failing out of a total of 12 tests.", "score": 100 }
            ]
        })))
        .mount(&mock_server)
        .await;

    let job = client(&mock_server).job("app").await.unwrap();

    assert_eq!(job.name, "app");
    assert_eq!(job.status, JobStatus::Ok);
    assert_eq!(job.reports.len(), 2);
    assert!(job.reports[0].starts_with("Build stability"));
}

#[tokio::test]
async fn test_job_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/job/ghost/api/json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    assert!(matches!(
        client(&mock_server).job("ghost").await,
        Err(ClientError::JobNotFound(_))
    ));
}

#[tokio::test]
async fn test_queue() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/queue/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": 7, "task": { "name": "app" } },
                { "id": 8, "task": { "name": "lib" } }
            ]
        })))
        .mount(&mock_server)
        .await;

    let queue = client(&mock_server).queue().await.unwrap();
    assert_eq!(queue, vec!["app".to_string(), "lib".to_string()]);
}

#[tokio::test]
async fn test_executors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/computer/api/json"))
        .and(query_param("depth", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "computer": [
                {
                    "displayName": "master",
                    "executors": [
                        {
                            "idle": false,
                            "likelyStuck": false,
                            "progress": 30,
                            "currentExecutable": { "url": "http://ci/job/app/3/" }
                        },
                        { "idle": true, "likelyStuck": false, "progress": -1, "currentExecutable": null }
                    ]
                }
            ]
        })))
        .mount(&mock_server)
        .await;

    let nodes = client(&mock_server).executors().await.unwrap();

    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].node_name, "master");
    assert_eq!(nodes[0].executors[0].running_job.as_deref(), Some("app"));
    assert_eq!(nodes[0].executors[0].progress, Some(30));
    assert!(nodes[0].executors[1].idle);
}

#[tokio::test]
async fn test_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-jenkins", "2.440.3"))
        .mount(&mock_server)
        .await;

    let version = client(&mock_server).version().await.unwrap();
    assert_eq!(version, "2.440.3");
}

#[tokio::test]
async fn test_version_not_jenkins() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    assert!(matches!(
        client(&mock_server).version().await,
        Err(ClientError::NotAJenkinsServer)
    ));
}

#[tokio::test]
async fn test_feed_by_scope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/job/app/rssAll"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<feed><title>app</title></feed>"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/view/nightly/rssAll"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let feed = client.feed(&FeedScope::Job("app".to_string())).await.unwrap();
    assert!(feed.contains("<title>app</title>"));

    assert!(matches!(
        client.feed(&FeedScope::View("nightly".to_string())).await,
        Err(ClientError::ViewNotFound(_))
    ));
}

#[tokio::test]
async fn test_monitor_check_filters_by_job() {
    let mock_server = MockServer::start().await;
    mount_dashboard(&mock_server).await;

    let all = Monitor::new(client(&mock_server), MonitorOptions::default()).unwrap();
    assert_eq!(all.check().await.unwrap(), Some(JobStatus::Fail));

    let options = MonitorOptions {
        job_name: Some("site".to_string()),
        ..Default::default()
    };
    let site = Monitor::new(client(&mock_server), options).unwrap();
    assert_eq!(site.check().await.unwrap(), Some(JobStatus::Warn));

    let options = MonitorOptions {
        job_name: Some("missing".to_string()),
        ..Default::default()
    };
    let missing = Monitor::new(client(&mock_server), options).unwrap();
    assert_eq!(missing.check().await.unwrap(), None);
}

#[tokio::test]
async fn test_monitor_runs_immediately() {
    let mock_server = MockServer::start().await;
    mount_dashboard(&mock_server).await;

    let monitor = Monitor::new(client(&mock_server), MonitorOptions::default()).unwrap();
    let handle = monitor.handle();

    let mut statuses = Vec::new();
    monitor
        .run(|status| {
            statuses.push(status.unwrap());
            handle.stop();
        })
        .await
        .unwrap();

    assert_eq!(statuses, vec![Some(JobStatus::Fail)]);
}

#[tokio::test]
async fn test_monitor_skips_fire_times_missed_by_slow_tick() {
    let mock_server = MockServer::start().await;

    // The first read outlasts two fire times of an every-second schedule.
    Mock::given(method("GET"))
        .and(path("/api/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "jobs": [{ "name": "app", "color": "blue" }] }))
                .set_delay(Duration::from_millis(2500)),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_dashboard(&mock_server).await;

    let options = MonitorOptions {
        schedule: Some("* * * * * *".to_string()),
        ..Default::default()
    };
    let monitor = Monitor::new(client(&mock_server), options).unwrap();
    let handle = monitor.handle();

    let mut ticks = Vec::new();
    monitor
        .run(|status| {
            ticks.push((Instant::now(), status.unwrap()));
            if ticks.len() == 3 {
                handle.stop();
            }
        })
        .await
        .unwrap();

    assert_eq!(ticks[0].1, Some(JobStatus::Ok));
    assert_eq!(ticks[1].1, Some(JobStatus::Fail));

    // Missed fire times are not replayed back to back once the slow tick ends.
    let gap = ticks[2].0.duration_since(ticks[1].0);
    assert!(gap >= Duration::from_millis(500), "ticks {:?} apart", gap);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_authentication_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    assert!(matches!(
        client(&mock_server).dashboard().await,
        Err(ClientError::AuthenticationFailed)
    ));
}

#[tokio::test]
async fn test_authentication_required() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/queue/api/json"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    assert!(matches!(
        client(&mock_server).queue().await,
        Err(ClientError::AuthenticationRequired)
    ));
}

#[tokio::test]
async fn test_credentials_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/queue/api/json"))
        .and(basic_auth("admin", "api-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server).with_credentials("admin", "api-token");
    assert!(client.queue().await.unwrap().is_empty());
}
