use chrono::{DateTime, TimeZone, Utc};
use httpmock::{Method::GET, Mock, MockServer};

use crate::common;
use tiingo_rs::{Format, TiingoError};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 1, d, 0, 0, 0).unwrap()
}

fn mock_body<'a>(server: &'a MockServer, symbol: &str, format: &str, body: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/tiingo/daily/{symbol}/prices"))
            .query_param("format", format);
        then.status(200).body(body);
    })
}

#[tokio::test]
async fn misaligned_dates_produce_holes_not_dropped_rows() {
    let server = common::setup_server();
    let _a = mock_body(
        &server,
        "AAA",
        "json",
        r#"[{"date":"2018-01-05T00:00:00.000Z","close":10.0},
            {"date":"2018-01-12T00:00:00.000Z","close":11.0}]"#,
    );
    let _b = mock_body(
        &server,
        "BBB",
        "json",
        r#"[{"date":"2018-01-12T00:00:00.000Z","close":20.0},
            {"date":"2018-01-19T00:00:00.000Z","close":21.0}]"#,
    );
    let client = common::client(&server);

    let frame = client
        .frame(["AAA", "BBB"])
        .metric("close")
        .fetch()
        .await
        .unwrap();

    assert_eq!(frame.index(), [day(5), day(12), day(19)]);
    assert_eq!(frame.column("AAA").unwrap(), [Some(10.0), Some(11.0), None]);
    assert_eq!(frame.column("BBB").unwrap(), [None, Some(20.0), Some(21.0)]);
}

#[tokio::test]
async fn csv_blank_cells_and_json_nulls_are_both_holes() {
    let server = common::setup_server();
    let _json = mock_body(
        &server,
        "AAA",
        "json",
        r#"[{"date":"2018-01-05T00:00:00.000Z","divCash":null,"close":10.0},
            {"date":"2018-01-12T00:00:00.000Z","divCash":0.5,"close":11.0}]"#,
    );
    let _csv = mock_body(
        &server,
        "AAA",
        "csv",
        "date,divCash,close\n2018-01-05,,10.0\n2018-01-12,0.5,11.0\n",
    );
    let client = common::client(&server);

    let from_json = client.frame("AAA").fetch().await.unwrap();
    let from_csv = client.frame("AAA").format(Format::Csv).fetch().await.unwrap();

    assert_eq!(from_json, from_csv);
    assert_eq!(from_json.value(day(5), "divCash"), None);
    assert_eq!(from_json.value(day(12), "divCash"), Some(0.5));
}

#[tokio::test]
async fn empty_response_gives_an_empty_column() {
    let server = common::setup_server();
    let _a = mock_body(&server, "AAA", "json", r#"[{"date":"2018-01-05T00:00:00.000Z","close":10.0}]"#);
    let _b = mock_body(&server, "BBB", "json", "[]");
    let client = common::client(&server);

    let frame = client
        .frame(["AAA", "BBB"])
        .metric("close")
        .fetch()
        .await
        .unwrap();

    assert_eq!(frame.columns(), ["AAA", "BBB"]);
    assert_eq!(frame.len(), 1);
    assert_eq!(frame.value(day(5), "BBB"), None);
}

#[tokio::test]
async fn metric_absent_from_response_names_ticker_and_column() {
    let server = common::setup_server();
    let _a = mock_body(&server, "AAA", "json", r#"[{"date":"2018-01-05T00:00:00.000Z","close":10.0}]"#);
    let client = common::client(&server);

    let err = client.frame("AAA").metric("adjClose").fetch().await.unwrap_err();
    match err {
        TiingoError::Data(msg) => {
            assert!(msg.contains("AAA") && msg.contains("adjClose"), "{msg}");
        }
        other => panic!("unexpected error: {other}"),
    }
}
