use std::io::{self, Read};

use starfix::catalog::StarCatalog;
use starfix::service::NavigationService;
use starfix::starfix_errors::StarfixError;
use tracing_subscriber::EnvFilter;

const SAMPLE_REQUEST: &str = r#"{
    "readings": [
        {"name": "Sirius", "altitude": 55.5, "observer_height": 10.0},
        {"name": "Canopus", "altitude": 40.2, "observer_height": 10.0}
    ],
    "time": "2024-05-05T22:00:00",
    "estimated_position": {"lat": 25.0, "lon": 50.0}
}"#;

/// JSON request on stdin, JSON response on stdout.
/// Usage:
///   named_star_fix < request.json
///   named_star_fix --sample
fn main() -> Result<(), StarfixError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let request = if std::env::args().any(|a| a == "--sample") {
        SAMPLE_REQUEST.to_string()
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|err| StarfixError::InvalidRequest(err.to_string()))?;
        buffer
    };

    let service = NavigationService::new(StarCatalog::navigation_stars()?);
    println!("{}", service.calculate_position_json(&request));

    Ok(())
}
