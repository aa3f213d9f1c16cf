use httpmock::prelude::*;
use serde_json::json;
use venuesync::api::{KakaoClient, MapApiError, PlaceLookup};
use venuesync::config::KakaoConfig;

fn client(server: &MockServer) -> KakaoClient {
    KakaoClient::new(&KakaoConfig {
        base_url: server.base_url(),
        api_key: Some("restkey".to_string()),
        radius_m: 25,
        ..KakaoConfig::default()
    })
    .unwrap()
}

#[test]
fn search_address_sends_key_and_query() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/local/search/keyword.json")
            .header("authorization", "KakaoAK restkey")
            .query_param("query", "Myeongdong-9gil-12");
        then.status(200).json_body(json!({
            "documents": [{
                "id": "26338954",
                "place_name": "Myeongdong",
                "category_name": "교통,수송 > 도로시설",
                "category_group_code": "",
                "x": "126.9851",
                "y": "37.5634"
            }]
        }));
    });

    let places = client(&server).search_address("Myeongdong-9gil-12").unwrap();

    mock.assert();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].coordinates(), Some((37.5634, 126.9851)));
}

#[test]
fn search_nearby_sends_coordinates_and_radius() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/local/search/keyword.json")
            .query_param("query", "Hadongkwan")
            .query_param("x", "126.9851")
            .query_param("y", "37.5634")
            .query_param("radius", "25");
        then.status(200).json_body(json!({"documents": []}));
    });

    let places = client(&server)
        .search_nearby("Hadongkwan", 37.5634, 126.9851)
        .unwrap();

    mock.assert();
    assert!(places.is_empty());
}

#[test]
fn error_status_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(401).json_body(json!({"errorType": "AccessDeniedError"}));
    });

    let err = client(&server).search_address("anything").unwrap_err();
    assert!(matches!(err, MapApiError::Status(status) if status.as_u16() == 401));
}
