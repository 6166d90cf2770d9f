use serde_json::Value;
use starfix::catalog::StarCatalog;
use starfix::detection::StaticDetector;
use starfix::service::{to_json, ImageRequest, NavigationService};

fn service() -> NavigationService<StarCatalog> {
    NavigationService::new(StarCatalog::navigation_stars().unwrap())
}

#[test]
fn test_named_request_json() {
    let request = r#"{
        "observations": [
            {"name": "Sirius", "altitude": 55.5, "observer_height": 10.0},
            {"name": "canopus", "altitude": 40.2, "observer_height": 10.0},
            {"name": "Nibiru", "altitude": 30.0}
        ],
        "time": "2024-05-05T22:00:00",
        "estimated_position": {"lat": 25.0, "lon": 50.0}
    }"#;

    let response: Value = serde_json::from_str(&service().calculate_position_json(request)).unwrap();

    assert_eq!(response["success"], true);
    assert_eq!(response["message"], "Position calculated successfully");
    assert_eq!(response["used_sights"].as_array().unwrap().len(), 2);
    assert_eq!(response["used_sights"][0]["star"], "Sirius");
    assert_eq!(response["skipped"][0]["name"], "Nibiru");

    let position = &response["calculated_position"];
    assert_eq!(position["position_string"], "14.8208°S, 27.0240°W");
    assert_eq!(position["number_of_sights"], 2);
    assert_eq!(position["observation_times"][1], "2024-05-05T22:00:00");
    assert_eq!(position["ambiguous"], false);
}

#[test]
fn test_failure_has_no_position() {
    let request = r#"{"readings": [{"name": "Sirius", "altitude": 55.5}]}"#;
    let response: Value = serde_json::from_str(&service().calculate_position_json(request)).unwrap();
    assert_eq!(response["success"], false);
    assert_eq!(response["calculated_position"], Value::Null);

    let request = r#"{"readings": [{"altitude": 55.5}, {"altitude": 40.2}]}"#;
    let response: Value = serde_json::from_str(&service().calculate_position_json(request)).unwrap();
    assert_eq!(response["success"], false);
    assert_eq!(response["message"], "Not enough valid sights (need 2+, got 0)");
    assert_eq!(response["skipped"].as_array().unwrap().len(), 2);
    assert_eq!(response["calculated_position"], Value::Null);

    let request = r#"{"readings": 5}"#;
    let response: Value = serde_json::from_str(&service().calculate_position_json(request)).unwrap();
    assert_eq!(response["success"], false);
    assert!(response["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request"));
}

#[test]
fn test_incomplete_reading_json() {
    let request = r#"{
        "readings": [
            {"name": "Sirius", "altitude": 55.5, "observer_height": 10.0},
            {"name": "Canopus", "altitude": 40.2, "observer_height": 10.0},
            {"ra": 10.0, "dec": 10.0}
        ],
        "time": "2024-05-05T22:00:00"
    }"#;

    let response: Value = serde_json::from_str(&service().calculate_position_json(request)).unwrap();

    assert_eq!(response["success"], true, "{}", response["message"]);
    assert_eq!(response["used_sights"].as_array().unwrap().len(), 2);
    assert_eq!(response["skipped"].as_array().unwrap().len(), 1);
    assert_eq!(response["skipped"][0]["index"], 2);
    assert_eq!(response["skipped"][0]["name"], Value::Null);
    assert_eq!(
        response["calculated_position"]["position_string"],
        "14.8208°S, 27.0240°W"
    );
}

#[test]
fn test_image_request_json() {
    let request: ImageRequest = serde_json::from_str(
        r#"{
            "image_path": "night_sky.jpg",
            "altitudes": {"Sirius": 55.5, "Canopus": 40.2},
            "time": "2024-05-05T22:00:00",
            "observer_height": 10.0
        }"#,
    )
    .unwrap();

    let response = service().process_image(&StaticDetector::sirius_canopus(), &request);
    let json: Value = serde_json::from_str(&to_json(&response)).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["detected_stars"].as_array().unwrap().len(), 2);
    assert_eq!(json["calculated_position"]["ambiguous"], true);
    assert_eq!(
        json["calculated_position"]["position_string"],
        "14.8208°S, 27.0240°W"
    );
}
