//! Adapter tests against `wiremock` stand-ins for the four upstream APIs.
//! No real network traffic is made; every test owns its own server.

use chrono::{NaiveDate, Utc};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use profilecheck::models::{Direction, ShowcaseKind, StatValue, NO_BIO, NO_NAME};
use profilecheck::normalize::{CalendarZone, HEATMAP_DAYS};
use profilecheck::{
    adapter_for, Config, Endpoints, FailureKind, FetchOutcome, Platform, PlatformAdapter,
    UpstreamClient,
};

fn adapter(server: &MockServer, platform: Platform) -> Box<dyn PlatformAdapter> {
    let config = Config {
        endpoints: Endpoints::all_at(&server.uri()),
        request_timeout_secs: 5,
        zone: CalendarZone::utc(),
    };
    let http = UpstreamClient::new(config.request_timeout_secs).expect("failed to build client");
    adapter_for(platform, &config, http)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn today_epoch() -> i64 {
    today().and_hms_opt(12, 0, 0).unwrap().and_utc().timestamp()
}

async fn mount_json(server: &MockServer, route: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// LeetCode
// ---------------------------------------------------------------------------

async fn mount_leetcode_user(server: &MockServer) {
    mount_json(
        server,
        "/neal",
        200,
        json!({
            "username": "neal",
            "name": "Neal Wu",
            "avatar": "https://assets.leetcode.com/neal.png",
            "ranking": 1234,
            "about": "",
            "country": "United States"
        }),
    )
    .await;
    mount_json(
        server,
        "/neal/solved",
        200,
        json!({"solvedProblem": 700, "easySolved": 200, "mediumSolved": 400, "hardSolved": 100}),
    )
    .await;
    mount_json(
        server,
        "/neal/contest",
        200,
        json!({
            "contestAttend": 3,
            "contestRating": 2875.61,
            "contestGlobalRanking": 12,
            "totalParticipants": 600000,
            "contestTopPercentage": 0.01,
            "contestParticipation": [
                {"attended": true, "rating": 1500.0, "ranking": 900, "trendDirection": "UP",
                 "problemsSolved": 3, "totalProblems": 4,
                 "contest": {"title": "Weekly Contest 1", "startTime": 1590969600}},
                {"attended": false, "rating": 1500.0, "ranking": 0, "trendDirection": "NONE",
                 "problemsSolved": 0, "totalProblems": 4,
                 "contest": {"title": "Weekly Contest 2", "startTime": 1591574400}},
                {"attended": true, "rating": 1400.0, "ranking": 5000, "trendDirection": "DOWN",
                 "problemsSolved": 1, "totalProblems": 4,
                 "contest": {"title": "Weekly Contest 3", "startTime": 1622505600}},
                {"attended": true, "rating": 1400.0, "ranking": 4000, "trendDirection": "DOWN",
                 "problemsSolved": 2, "totalProblems": 4,
                 "contest": {"title": "Weekly Contest 4", "startTime": 1654041600}}
            ]
        }),
    )
    .await;
}

#[tokio::test]
async fn leetcode_maps_all_six_calls_into_profile() {
    let server = MockServer::start().await;
    mount_leetcode_user(&server).await;
    mount_json(&server, "/problems", 200, json!({"totalQuestions": 3511})).await;
    mount_json(
        &server,
        "/neal/badges",
        200,
        json!({"badges": [
            {"displayName": "Guardian", "icon": "/static/images/badges/guardian.png"},
            {"displayName": "Knight", "icon": "https://cdn.example/knight.png"}
        ]}),
    )
    .await;
    let calendar = format!("{{\"{}\": 5}}", today_epoch());
    mount_json(&server, "/neal/calendar", 200, json!({"submissionCalendar": calendar})).await;

    let profile = adapter(&server, Platform::LeetCode)
        .fetch_and_normalize("neal")
        .await
        .expect("profile should load");

    assert_eq!(profile.display_name, "Neal Wu");
    assert_eq!(profile.bio, NO_BIO);
    assert_eq!(profile.joined, None);
    assert_eq!(profile.stat("Solved"), Some(&StatValue::Text("700/3511".into())));
    assert_eq!(profile.stat("Easy"), Some(&StatValue::Text("200/871".into())));
    assert_eq!(profile.stat("Hard"), Some(&StatValue::Text("100/819".into())));
    assert_eq!(profile.stat("Contest Rating"), Some(&StatValue::Number(2876.0)));
    assert_eq!(profile.stat("Badges"), Some(&StatValue::Number(2.0)));

    let titles: Vec<_> = profile.series.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Weekly Contest 1", "Weekly Contest 3", "Weekly Contest 4"]);
    let directions: Vec<_> = profile.series.iter().map(|p| p.direction).collect();
    assert_eq!(directions, vec![Direction::Up, Direction::Down, Direction::Up]);
    assert_eq!(profile.series[0].problems_solved, Some(3));

    assert_eq!(profile.heatmap.len(), HEATMAP_DAYS);
    let last = profile.heatmap.last().unwrap();
    assert_eq!((last.date, last.count), (today(), 5));

    assert_eq!(profile.showcase.len(), 2);
    assert_eq!(profile.showcase[0].kind, ShowcaseKind::Badge);
    assert_eq!(
        profile.showcase[0].image_url.as_deref(),
        Some("https://leetcode.com/static/images/badges/guardian.png")
    );
    assert_eq!(
        profile.showcase[1].image_url.as_deref(),
        Some("https://cdn.example/knight.png")
    );
}

#[tokio::test]
async fn leetcode_optional_calls_degrade_to_defaults() {
    let server = MockServer::start().await;
    mount_leetcode_user(&server).await;
    mount_json(&server, "/neal/badges", 500, json!({"error": "boom"})).await;
    // /problems and /neal/calendar are not mounted and answer 404.

    let profile = adapter(&server, Platform::LeetCode)
        .fetch_and_normalize("neal")
        .await
        .expect("optional failures must not fail the profile");

    assert_eq!(profile.stat("Solved"), Some(&StatValue::Text("700".into())));
    assert_eq!(profile.stat("Badges"), Some(&StatValue::Number(0.0)));
    assert!(profile.showcase.is_empty());
    assert_eq!(profile.heatmap.len(), HEATMAP_DAYS);
    assert!(profile.heatmap.iter().all(|c| c.count == 0));
}

#[tokio::test]
async fn leetcode_unknown_user_is_not_found() {
    let server = MockServer::start().await;
    let missing = json!({
        "errors": [{"message": "That user does not exist.", "path": ["matchedUser"]}],
        "data": {"matchedUser": null}
    });
    for route in ["/doesnotexist123", "/doesnotexist123/solved", "/doesnotexist123/contest"] {
        mount_json(&server, route, 200, missing.clone()).await;
    }

    let err = adapter(&server, Platform::LeetCode)
        .fetch_and_normalize("doesnotexist123")
        .await
        .expect_err("unknown user must fail");

    assert_eq!(err.kind(), FailureKind::NotFound);
}

#[tokio::test]
async fn leetcode_required_call_failure_is_upstream_error() {
    let server = MockServer::start().await;
    mount_json(&server, "/neal", 200, json!({"name": "Neal"})).await;
    mount_json(&server, "/neal/solved", 200, json!({"solvedProblem": 1})).await;
    mount_json(&server, "/neal/contest", 503, json!({"message": "unavailable"})).await;

    let err = adapter(&server, Platform::LeetCode)
        .fetch_and_normalize("neal")
        .await
        .expect_err("contest history is required");

    assert_eq!(err.kind(), FailureKind::Upstream);
}

#[tokio::test]
async fn leetcode_missing_detail_route_is_not_a_missing_user() {
    let server = MockServer::start().await;
    mount_json(&server, "/neal", 200, json!({"name": "Neal"})).await;
    mount_json(&server, "/neal/solved", 200, json!({"solvedProblem": 1})).await;
    // /neal/contest is not mounted and answers a bare 404.

    let err = adapter(&server, Platform::LeetCode)
        .fetch_and_normalize("neal")
        .await
        .expect_err("contest history is required");

    assert_eq!(err.kind(), FailureKind::Upstream);
}

#[tokio::test]
async fn leetcode_profile_route_404_is_not_found() {
    let server = MockServer::start().await;
    mount_json(&server, "/doesnotexist123/solved", 200, json!({"solvedProblem": 0})).await;
    mount_json(&server, "/doesnotexist123/contest", 200, json!({})).await;

    let err = adapter(&server, Platform::LeetCode)
        .fetch_and_normalize("doesnotexist123")
        .await
        .expect_err("unknown user must fail");

    assert!(err.is_not_found());
}

// ---------------------------------------------------------------------------
// GitHub
// ---------------------------------------------------------------------------

#[tokio::test]
async fn github_fetches_follow_up_urls_from_profile() {
    let server = MockServer::start().await;
    let created_today = format!("{}T12:00:00Z", today());
    mount_json(
        &server,
        "/users/octocat",
        200,
        json!({
            "login": "octocat",
            "name": "The Octocat",
            "avatar_url": "https://avatars.example/octocat",
            "bio": null,
            "created_at": "2011-01-25T18:44:36Z",
            "followers": 9000,
            "following": 9,
            "public_repos": 8,
            "organizations_url": format!("{}/users/octocat/orgs", server.uri()),
            "repos_url": format!("{}/users/octocat/repos", server.uri())
        }),
    )
    .await;
    mount_json(
        &server,
        "/users/octocat/orgs",
        200,
        json!([{"login": "github", "avatar_url": "https://avatars.example/github"}]),
    )
    .await;
    mount_json(
        &server,
        "/users/octocat/repos",
        200,
        json!([
            {"name": "hello-world", "created_at": "2011-01-26T19:01:12Z",
             "html_url": "https://github.com/octocat/hello-world"},
            {"name": "fresh", "created_at": created_today,
             "html_url": "https://github.com/octocat/fresh"}
        ]),
    )
    .await;

    let profile = adapter(&server, Platform::GitHub)
        .fetch_and_normalize("octocat")
        .await
        .expect("profile should load");

    assert_eq!(profile.display_name, "The Octocat");
    assert_eq!(profile.bio, NO_BIO);
    assert_eq!(profile.joined, NaiveDate::from_ymd_opt(2011, 1, 25));
    assert_eq!(profile.joined_label(), "January 2011");
    assert_eq!(profile.stat("Followers"), Some(&StatValue::Number(9000.0)));
    assert_eq!(profile.stat("Organizations"), Some(&StatValue::Number(1.0)));
    assert!(profile.series.is_empty());

    let kinds: Vec<_> = profile.showcase.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![ShowcaseKind::Organization, ShowcaseKind::Repository, ShowcaseKind::Repository]
    );
    assert_eq!(profile.showcase[1].date, NaiveDate::from_ymd_opt(2011, 1, 26));

    assert_eq!(profile.heatmap.len(), HEATMAP_DAYS);
    assert_eq!(profile.heatmap.last().map(|c| c.count), Some(1));
    assert_eq!(profile.heatmap.iter().map(|c| c.count).sum::<u32>(), 1);
}

#[tokio::test]
async fn github_unknown_user_is_not_found() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/users/doesnotexist123",
        404,
        json!({"message": "Not Found", "documentation_url": "https://docs.github.com"}),
    )
    .await;

    let result = adapter(&server, Platform::GitHub)
        .fetch_and_normalize("doesnotexist123")
        .await;

    assert!(matches!(FetchOutcome::from(result), FetchOutcome::NotFound(_)));
}

#[tokio::test]
async fn github_failed_second_stage_is_upstream_error() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/users/octocat",
        200,
        json!({
            "login": "octocat",
            "organizations_url": format!("{}/users/octocat/orgs", server.uri()),
            "repos_url": format!("{}/users/octocat/repos", server.uri())
        }),
    )
    .await;
    mount_json(&server, "/users/octocat/orgs", 200, json!([])).await;
    mount_json(&server, "/users/octocat/repos", 500, json!({"message": "Server Error"})).await;

    let err = adapter(&server, Platform::GitHub)
        .fetch_and_normalize("octocat")
        .await
        .expect_err("repos are required");

    assert_eq!(err.kind(), FailureKind::Upstream);
}

#[tokio::test]
async fn github_missing_optional_fields_use_fallbacks() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/users/ghost",
        200,
        json!({
            "login": "ghost",
            "organizations_url": format!("{}/users/ghost/orgs", server.uri()),
            "repos_url": format!("{}/users/ghost/repos", server.uri())
        }),
    )
    .await;
    mount_json(&server, "/users/ghost/orgs", 200, json!([])).await;
    mount_json(&server, "/users/ghost/repos", 200, json!([])).await;

    let profile = adapter(&server, Platform::GitHub)
        .fetch_and_normalize("ghost")
        .await
        .expect("profile should load");

    assert_eq!(profile.display_name, NO_NAME);
    assert_eq!(profile.avatar_url, None);
    assert_eq!(profile.joined_label(), "Not Available");
    assert!(matches!(FetchOutcome::from(Ok(profile)), FetchOutcome::Empty(_)));
}

// ---------------------------------------------------------------------------
// Codeforces
// ---------------------------------------------------------------------------

#[tokio::test]
async fn codeforces_maps_rating_history_and_submissions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user.info"))
        .and(query_param("handles", "tourist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": [{
                "handle": "tourist",
                "firstName": "Gennady",
                "lastName": "Korotkevich",
                "country": "Belarus",
                "organization": "ITMO University",
                "rank": "legendary grandmaster",
                "rating": 3700,
                "maxRank": "legendary grandmaster",
                "maxRating": 4009,
                "registrationTimeSeconds": 1265987288,
                "titlePhoto": "https://userpic.codeforces.org/422/title/50a270ed4a722867.jpg"
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user.rating"))
        .and(query_param("handle", "tourist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": [
                {"contestId": 1, "contestName": "Round 1", "handle": "tourist", "rank": 1,
                 "ratingUpdateTimeSeconds": 1590969600, "oldRating": 0, "newRating": 1500},
                {"contestId": 2, "contestName": "Round 2", "handle": "tourist", "rank": 40,
                 "ratingUpdateTimeSeconds": 1622505600, "oldRating": 1500, "newRating": 1400},
                {"contestId": 3, "contestName": "Round 3", "handle": "tourist", "rank": 12,
                 "ratingUpdateTimeSeconds": 1654041600, "oldRating": 1400, "newRating": 1400}
            ]
        })))
        .mount(&server)
        .await;
    let now = today_epoch();
    Mock::given(method("GET"))
        .and(path("/user.status"))
        .and(query_param("handle", "tourist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": [
                {"id": 3, "creationTimeSeconds": now},
                {"id": 2, "creationTimeSeconds": now - 60},
                {"id": 1, "creationTimeSeconds": 1590969600}
            ]
        })))
        .mount(&server)
        .await;

    let profile = adapter(&server, Platform::Codeforces)
        .fetch_and_normalize("tourist")
        .await
        .expect("profile should load");

    assert_eq!(profile.display_name, "Gennady Korotkevich");
    assert_eq!(
        profile.bio,
        "Legendary grandmaster coder from Belarus || Studying at ITMO University"
    );
    assert_eq!(profile.joined, NaiveDate::from_ymd_opt(2010, 2, 12));
    assert_eq!(profile.stat("Max Rating"), Some(&StatValue::Number(4009.0)));
    assert_eq!(profile.stat("Attended"), Some(&StatValue::Number(3.0)));

    let directions: Vec<_> = profile.series.iter().map(|p| p.direction).collect();
    assert_eq!(directions, vec![Direction::Up, Direction::Down, Direction::Up]);
    let years: Vec<_> = profile.series.iter().map(|p| p.year_label.as_str()).collect();
    assert_eq!(years, vec!["2020", "2021", "2022"]);
    assert_eq!(profile.series[1].rank, Some(40));

    assert_eq!(profile.heatmap.len(), HEATMAP_DAYS);
    assert_eq!(profile.heatmap.last().map(|c| c.count), Some(2));
}

#[tokio::test]
async fn codeforces_unknown_handle_is_not_found() {
    let server = MockServer::start().await;
    let failed = json!({
        "status": "FAILED",
        "comment": "handles: User with handle doesnotexist123 not found"
    });
    for route in ["/user.info", "/user.rating", "/user.status"] {
        mount_json(&server, route, 400, failed.clone()).await;
    }

    let err = adapter(&server, Platform::Codeforces)
        .fetch_and_normalize("doesnotexist123")
        .await
        .expect_err("unknown handle must fail");

    assert!(err.is_not_found());
}

#[tokio::test]
async fn codeforces_malformed_payload_is_upstream_error() {
    let server = MockServer::start().await;
    mount_json(&server, "/user.info", 200, json!({"status": "OK", "result": [{}]})).await;
    mount_json(&server, "/user.rating", 200, json!({"status": "OK", "result": []})).await;
    Mock::given(method("GET"))
        .and(path("/user.status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = adapter(&server, Platform::Codeforces)
        .fetch_and_normalize("tourist")
        .await
        .expect_err("malformed submissions must fail");

    assert_eq!(err.kind(), FailureKind::Upstream);
}

// ---------------------------------------------------------------------------
// CodeChef
// ---------------------------------------------------------------------------

#[tokio::test]
async fn codechef_maps_rating_data_and_heatmap() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/chef",
        200,
        json!({
            "success": true,
            "profile": "https://cdn.codechef.com/chef.jpg",
            "name": "Chef",
            "currentRating": 1812,
            "highestRating": "1900",
            "countryName": "India",
            "globalRank": "1520",
            "countryRank": 800,
            "stars": "4★",
            "heatMap": [
                {"date": "2021-7-5", "value": 2},
                {"date": today().to_string(), "value": 7}
            ],
            "ratingData": [
                {"code": "START1", "rating": "1600", "rank": "2000", "name": "Starters 1",
                 "end_date": "2021-07-05 22:00:00"},
                {"code": "LTIME", "rating": "1700", "rank": "900", "name": "Lunchtime"},
                {"code": "COOK", "rating": "1812", "rank": "300", "name": "Cook-Off",
                 "end_date": "2022-01-10 23:30:00"}
            ]
        }),
    )
    .await;

    let profile = adapter(&server, Platform::Codechef)
        .fetch_and_normalize("chef")
        .await
        .expect("profile should load");

    assert_eq!(profile.display_name, "Chef");
    assert_eq!(profile.bio, "4★ Coder from India");
    assert_eq!(profile.joined, NaiveDate::from_ymd_opt(2021, 7, 5));
    assert_eq!(profile.stat("Highest Rating"), Some(&StatValue::Number(1900.0)));
    assert_eq!(profile.stat("Global Rank"), Some(&StatValue::Number(1520.0)));

    let titles: Vec<_> = profile.series.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Starters 1", "Cook-Off"]);
    assert_eq!(profile.series[1].direction, Direction::Up);
    assert_eq!(profile.series[1].rank, Some(300));

    assert_eq!(profile.heatmap.len(), HEATMAP_DAYS);
    assert_eq!(profile.heatmap.last().map(|c| c.count), Some(7));
}

#[tokio::test]
async fn codechef_unsuccessful_lookup_is_not_found() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/doesnotexist123",
        200,
        json!({"success": false, "status": 404}),
    )
    .await;

    let result = adapter(&server, Platform::Codechef)
        .fetch_and_normalize("doesnotexist123")
        .await;

    assert!(matches!(FetchOutcome::from(result), FetchOutcome::NotFound(_)));
}

#[tokio::test]
async fn codechef_without_activity_gets_flat_zero_calendar() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/newchef",
        200,
        json!({"success": true, "name": "New Chef", "heatMap": [], "ratingData": []}),
    )
    .await;

    let profile = adapter(&server, Platform::Codechef)
        .fetch_and_normalize("newchef")
        .await
        .expect("profile should load");

    assert_eq!(profile.joined, None);
    assert_eq!(profile.bio, NO_BIO);
    assert_eq!(profile.heatmap.len(), HEATMAP_DAYS);
    assert!(profile.heatmap.iter().all(|c| c.count == 0));
    assert!(profile.is_empty());
}

#[tokio::test]
async fn codechef_upstream_failure_is_upstream_error() {
    let server = MockServer::start().await;
    mount_json(&server, "/chef", 503, json!({"message": "Service Unavailable"})).await;

    let result = adapter(&server, Platform::Codechef)
        .fetch_and_normalize("chef")
        .await;

    let err = result.as_ref().expect_err("5xx must fail");
    assert_eq!(err.kind(), FailureKind::Upstream);
    assert!(matches!(FetchOutcome::from(result), FetchOutcome::Unavailable(_)));
}

#[tokio::test]
async fn codechef_malformed_body_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chef"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let err = adapter(&server, Platform::Codechef)
        .fetch_and_normalize("chef")
        .await
        .expect_err("malformed body must fail");

    assert_eq!(err.kind(), FailureKind::Upstream);
    assert!(!err.is_not_found());
}
