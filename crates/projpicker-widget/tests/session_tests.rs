//! End-to-end widget sessions against a mocked search endpoint.

use projpicker_common::{CrsId, Extent, PickerError, Ring};
use projpicker_protocol::{FeatureCollection, LogicalOperator, ResponseShape, SerializationMode};
use projpicker_widget::{
    FeatureChange, HttpTransport, MemoryMap, PickerSession, RecordingView, WidgetConfig,
};
use test_utils::{
    atlanta_features, feature_collection, fiji_1986, map_response, nad83_georgia_east,
    ordered_map_response_text, point_feature, sample_records, wgs84,
};
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type TestSession = PickerSession<HttpTransport, MemoryMap, RecordingView>;

fn test_session(server: &MockServer, mode: SerializationMode) -> TestSession {
    let config = WidgetConfig {
        mode,
        ..WidgetConfig::new(server.uri())
    };
    config.validate().expect("config should be valid");
    PickerSession::new(
        config.build_widget(),
        config.build_dispatcher().expect("dispatcher construction should not fail"),
        MemoryMap::default(),
        RecordingView::default(),
    )
}

async fn mount_ordered(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(ordered_map_response_text(&sample_records())),
        )
        .mount(server)
        .await;
}

fn atlanta() -> FeatureCollection {
    serde_json::from_value(feature_collection(atlanta_features()))
        .expect("fixture should be a valid collection")
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_drawing_lists_results_in_response_order() {
    let server = MockServer::start().await;
    mount_ordered(&server).await;

    let mut session = test_session(&server, SerializationMode::Structured);
    session
        .feature_changed(FeatureChange::Replaced(atlanta()))
        .await
        .unwrap();

    let labels: Vec<String> = session.view().list.iter().map(|e| e.label()).collect();
    assert_eq!(
        labels,
        vec![
            "NAD83 / Georgia East (ftUS) (EPSG:2239)",
            "NAD83 / Conus Albers (EPSG:5070)",
            "WGS 84 (EPSG:4326)",
            "Fiji 1986 / Fiji Map Grid (EPSG:3460)",
        ]
    );
    assert_eq!(session.view().list_refreshes, 1);
    assert!(session.view().failures.is_empty());
    assert_eq!(session.widget().store().shape(), Some(ResponseShape::Map));
}

#[tokio::test]
async fn test_line_protocol_session_sends_lat_lon() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string("and\npoint 33.749,-84.388\n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(map_response(&[wgs84()])))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = test_session(&server, SerializationMode::LineProtocol);
    let feature = serde_json::from_value(point_feature(-84.388, 33.749)).unwrap();
    session
        .feature_changed(FeatureChange::Added(feature))
        .await
        .unwrap();

    assert_eq!(session.view().list.len(), 1);
}

#[tokio::test]
async fn test_failure_keeps_previous_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string("and\n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(map_response(&[wgs84()])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string("xor\n"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string("or\n"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let mut session = test_session(&server, SerializationMode::LineProtocol);
    session.refresh().await;
    assert_eq!(session.widget().store().generation(), 1);

    session.operator_changed(LogicalOperator::Xor).await;
    session.operator_changed(LogicalOperator::Or).await;

    let kinds: Vec<&str> = session
        .view()
        .failures
        .iter()
        .map(|(kind, _)| kind.as_str())
        .collect();
    assert_eq!(kinds, vec!["TransportFailure", "MalformedResponse"]);
    assert_eq!(session.widget().store().generation(), 1);
    assert_eq!(session.view().list.len(), 1);
    assert_eq!(session.view().list_refreshes, 1);
}

#[tokio::test]
async fn test_clearing_drawing_still_queries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string("and\n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(map_response(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = test_session(&server, SerializationMode::LineProtocol);
    session.feature_changed(FeatureChange::Cleared).await.unwrap();

    assert!(session.view().list.is_empty());
    assert_eq!(session.view().list_refreshes, 1);
}

// ============================================================================
// Selection
// ============================================================================

#[tokio::test]
async fn test_select_renders_single_ring() {
    let server = MockServer::start().await;
    mount_ordered(&server).await;

    let mut session = test_session(&server, SerializationMode::Structured);
    session.refresh().await;
    session
        .select(&CrsId::parse("EPSG:2239").unwrap())
        .await
        .unwrap();

    let details = session.view().details.as_ref().expect("details shown");
    assert_eq!(details.crs_type, "Projected");
    assert_eq!(details.name, nad83_georgia_east().crs_name);

    let map = session.renderer().surface();
    assert_eq!(
        map.highlight,
        vec![Ring([
            [-83.47, 34.68],
            [-80.77, 34.68],
            [-80.77, 30.36],
            [-83.47, 30.36],
        ])]
    );
    assert_eq!(map.viewport, Some(Extent::new(-83.47, 30.36, -80.77, 34.68)));
}

#[tokio::test]
async fn test_select_antimeridian_crs_renders_two_rings() {
    let server = MockServer::start().await;
    mount_ordered(&server).await;

    let mut session = test_session(&server, SerializationMode::Structured);
    session.refresh().await;
    session
        .select(&CrsId::parse("EPSG:3460").unwrap())
        .await
        .unwrap();

    let fiji = fiji_1986();
    let map = session.renderer().surface();
    assert_eq!(map.highlight.len(), 2);
    assert_eq!(map.highlight[0].vertices()[1], [180.0, fiji.north_lat]);
    assert_eq!(map.highlight[1].vertices()[0], [-180.0, fiji.north_lat]);
    assert_eq!(map.highlight[1].vertices()[1], [fiji.east_lon, fiji.north_lat]);

    let geojson = session.renderer().layer().to_geojson().unwrap();
    assert_eq!(geojson["type"], "MultiPolygon");
}

#[tokio::test]
async fn test_select_world_crs_is_not_split() {
    let server = MockServer::start().await;
    mount_ordered(&server).await;

    let mut session = test_session(&server, SerializationMode::Structured);
    session.refresh().await;
    session
        .select(&CrsId::parse("EPSG:4326").unwrap())
        .await
        .unwrap();

    let map = session.renderer().surface();
    assert_eq!(map.highlight.len(), 1);
    assert_eq!(map.viewport, Some(Extent::new(-180.0, -90.0, 180.0, 90.0)));
}

#[tokio::test]
async fn test_reselect_replaces_highlight() {
    let server = MockServer::start().await;
    mount_ordered(&server).await;

    let mut session = test_session(&server, SerializationMode::Structured);
    session.refresh().await;
    session
        .select(&CrsId::parse("EPSG:3460").unwrap())
        .await
        .unwrap();
    session
        .select(&CrsId::parse("EPSG:5070").unwrap())
        .await
        .unwrap();

    assert_eq!(session.renderer().surface().highlight.len(), 1);
    assert_eq!(session.renderer().surface().fit_count, 2);
}

#[tokio::test]
async fn test_unknown_id_is_rejected() {
    let server = MockServer::start().await;
    mount_ordered(&server).await;

    let mut session = test_session(&server, SerializationMode::Structured);
    session.refresh().await;

    let err = session
        .select(&CrsId::parse("EPSG:32616").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, PickerError::CrsNotFound(id) if id == "EPSG:32616"));
    assert!(session.view().details.is_none());
    assert!(session.renderer().layer().is_empty());
}

#[tokio::test]
async fn test_requery_invalidates_selection() {
    let server = MockServer::start().await;
    mount_ordered(&server).await;

    let mut session = test_session(&server, SerializationMode::Structured);
    session.refresh().await;
    let entry = session.view().list[0].clone();
    session.select_entry(&entry).await.unwrap();
    assert!(session.view().details.is_some());

    session.operator_changed(LogicalOperator::Or).await;
    assert!(session.view().details.is_none());
    assert!(session.renderer().layer().is_empty());

    // The row was listed before the re-query; clicking it only clears.
    session.select_entry(&entry).await.unwrap();
    assert!(session.view().details.is_none());
    assert!(session.widget().selected().is_none());
}

#[tokio::test]
async fn test_fit_to_drawing() {
    let server = MockServer::start().await;
    mount_ordered(&server).await;

    let mut session = test_session(&server, SerializationMode::Structured);
    assert!(session.fit_to_drawing().is_none());

    session
        .feature_changed(FeatureChange::Replaced(atlanta()))
        .await
        .unwrap();
    let extent = session.fit_to_drawing().unwrap();
    assert_eq!(extent, Extent::new(-84.6, 33.6, -84.2, 33.9));
    assert_eq!(session.renderer().surface().viewport, Some(extent));
}
