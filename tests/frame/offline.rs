use chrono::{DateTime, TimeZone, Utc};
use httpmock::Method::GET;

use crate::common;
use tiingo_rs::{Format, TiingoError, VALID_METRICS};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 1, d, 0, 0, 0).unwrap()
}

#[tokio::test]
async fn several_tickers_are_merged_on_one_metric() {
    let server = common::setup_server();
    let googl = common::mock_weekly_prices(&server, "GOOGL", "json");
    let aapl = common::mock_weekly_prices(&server, "AAPL", "json");
    let client = common::client(&server);

    let frame = client
        .frame(["GOOGL", "AAPL"])
        .metric("adjClose")
        .start("2018-01-05")
        .end("2018-01-19")
        .frequency("weekly")
        .fetch()
        .await
        .unwrap();

    googl.assert();
    aapl.assert();
    assert_eq!(frame.len(), 3);
    assert_eq!(frame.columns(), ["GOOGL", "AAPL"]);
    assert_eq!(frame.index(), [day(5), day(12), day(19)]);
    assert_eq!(frame.value(day(5), "GOOGL"), Some(1110.29));
    assert_eq!(frame.value(day(19), "AAPL"), Some(178.54));
}

#[tokio::test]
async fn csv_and_json_sources_build_identical_frames() {
    let server = common::setup_server();
    let _mocks: Vec<_> = ["GOOGL", "AAPL"]
        .into_iter()
        .flat_map(|s| ["json", "csv"].map(|ext| common::mock_weekly_prices(&server, s, ext)))
        .collect();
    let client = common::client(&server);

    let build = |format| {
        client
            .frame(["GOOGL", "AAPL"])
            .metric("volume")
            .start("2018-01-05")
            .end("2018-01-19")
            .frequency("weekly")
            .format(format)
            .fetch()
    };
    let from_json = build(Format::Json).await.unwrap();
    let from_csv = build(Format::Csv).await.unwrap();
    assert_eq!(from_json, from_csv);

    let single = |format| {
        client
            .frame("GOOGL")
            .start("2018-01-05")
            .end("2018-01-19")
            .frequency("weekly")
            .format(format)
            .fetch()
    };
    assert_eq!(single(Format::Json).await.unwrap(), single(Format::Csv).await.unwrap());
}

#[tokio::test]
async fn single_ticker_without_metric_keeps_every_column() {
    let server = common::setup_server();
    let mock = common::mock_weekly_prices(&server, "GOOGL", "json");
    let client = common::client(&server);

    let frame = client
        .frame("GOOGL")
        .start("2018-01-05")
        .end("2018-01-19")
        .frequency("weekly")
        .fetch()
        .await
        .unwrap();

    mock.assert();
    assert_eq!(frame.len(), 3);
    assert_eq!(frame.width(), VALID_METRICS.len());
    for metric in VALID_METRICS {
        assert!(frame.column(metric).is_some(), "{metric}");
    }
    assert_eq!(frame.columns()[0], "close");
    assert_eq!(
        frame.column("close").unwrap(),
        [Some(1110.29), Some(1130.65), Some(1143.43)]
    );
}

#[tokio::test]
async fn single_ticker_with_metric_names_the_column_after_the_metric() {
    let server = common::setup_server();
    let _mock = common::mock_weekly_prices(&server, "AAPL", "json");
    let client = common::client(&server);

    let frame = client
        .frame("AAPL")
        .metric("close")
        .start("2018-01-05")
        .end("2018-01-19")
        .frequency("weekly")
        .fetch()
        .await
        .unwrap();

    assert_eq!(frame.columns(), ["close"]);
    assert_eq!(frame.value(day(12), "close"), Some(177.09));
}

#[tokio::test]
async fn one_element_list_uses_the_ticker_as_column_name() {
    let server = common::setup_server();
    let _mock = common::mock_weekly_prices(&server, "AAPL", "json");
    let client = common::client(&server);

    let frame = client
        .frame(vec!["AAPL"])
        .metric("adjClose")
        .start("2018-01-05")
        .end("2018-01-19")
        .frequency("weekly")
        .fetch()
        .await
        .unwrap();

    assert_eq!(frame.columns(), ["AAPL"]);
}

#[tokio::test]
async fn intraday_frequency_queries_iex() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/iex/GOOGL/prices")
            .query_param("resampleFreq", "1hour");
        then.status(200).body(
            r#"[{"date":"2018-01-19T14:30:00.000Z","close":1131.0},
                {"date":"2018-01-19T15:30:00.000Z","close":1135.5}]"#,
        );
    });
    let client = common::client(&server);

    let frame = client
        .frame("GOOGL")
        .metric("close")
        .frequency("1Hour")
        .fetch()
        .await
        .unwrap();

    mock.assert();
    assert_eq!(frame.len(), 2);
    assert_eq!(
        frame.value(Utc.with_ymd_and_hms(2018, 1, 19, 15, 30, 0).unwrap(), "close"),
        Some(1135.5)
    );
}

#[tokio::test]
async fn invalid_input_is_rejected_before_any_request() {
    let server = common::setup_server();
    let any = server.mock(|when, then| {
        when.method(GET);
        then.status(200).body("[]");
    });
    let client = common::client(&server);

    let err = client
        .frame(["GOOGL", "AAPL"])
        .metric("xopen")
        .fetch()
        .await
        .unwrap_err();
    match &err {
        TiingoError::InvalidColumn { column, valid } => {
            assert_eq!(column, "xopen");
            assert_eq!(valid.as_slice(), VALID_METRICS);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("adjClose"));

    let err = client.frame("GOOGL").metric("xopen").fetch().await.unwrap_err();
    assert!(matches!(err, TiingoError::InvalidColumn { .. }));

    let err = client.frame(["GOOGL", "AAPL"]).fetch().await.unwrap_err();
    assert!(matches!(err, TiingoError::MissingParameter(_)));

    let err = client
        .frame(Vec::<String>::new())
        .metric("close")
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(err, TiingoError::MissingParameter(_)));

    let err = client
        .frame(["GOOGL", "AAPL"])
        .metric("close")
        .frequency("5 minutes")
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(err, TiingoError::InvalidFrequency(ref f) if f == "5 minutes"));

    assert_eq!(any.hits(), 0);
}

#[tokio::test]
async fn upstream_failure_for_one_ticker_fails_the_frame() {
    let server = common::setup_server();
    let _googl = common::mock_weekly_prices(&server, "GOOGL", "json");
    let _missing = server.mock(|when, then| {
        when.method(GET).path("/tiingo/daily/NOPE/prices");
        then.status(404).body(r#"{"detail":"not found"}"#);
    });
    let client = common::client(&server);

    let err = client
        .frame(["GOOGL", "NOPE"])
        .metric("close")
        .start("2018-01-05")
        .end("2018-01-19")
        .frequency("weekly")
        .fetch()
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
}
