use metric_advisor::input::{load_contacts, load_revenue_streams, ImportError};
use metric_advisor::profiles::revenue::StreamType;
use std::path::PathBuf;

fn demo_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

#[test]
fn demo_portfolio_loads_from_disk() {
    let portfolio = load_revenue_streams(demo_path("portfolio.csv")).expect("portfolio loads");

    assert_eq!(portfolio.len(), 5);
    assert_eq!(portfolio[0].id, "core-saas");
    assert_eq!(portfolio[0].stream_type, StreamType::Subscription);

    let usage = &portfolio[4];
    assert_eq!(usage.stream_type, StreamType::UsageBased);
    assert_eq!(usage.growth, None);
    assert_eq!(usage.forecast_revenue, usage.current_revenue);
}

#[test]
fn demo_team_loads_from_disk() {
    let team = load_contacts(demo_path("team.csv")).expect("team loads");

    assert_eq!(team.len(), 5);
    assert_eq!(team[2].name, "Sam Rivera");
    assert_eq!(team[3].times_contacted, 0);
}

#[test]
fn header_only_file_is_empty() {
    let csv = "contact_id,name,times_contacted,times_responded,times_followed_up,avg_response_time_minutes\n";

    match metric_advisor::input::read_contacts(csv.as_bytes()) {
        Err(ImportError::Empty) => {}
        other => panic!("expected empty import, got {other:?}"),
    }
}

#[test]
fn missing_portfolio_is_an_io_error() {
    match load_revenue_streams(demo_path("missing.csv")) {
        Err(ImportError::Io { path, .. }) => assert!(path.ends_with("missing.csv")),
        other => panic!("expected io error, got {other:?}"),
    }
}
