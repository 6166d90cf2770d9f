use std::env;

use starfix::catalog::{BodyLookup, StarCatalog};
use starfix::geometry::GeoPosition;
use starfix::observation::{Observation, ObservingConditions};
use starfix::sight::Sight;
use starfix::sight_collection::SightCollection;
use starfix::starfix_errors::StarfixError;
use starfix::time::parse_time;
use tracing_subscriber::EnvFilter;

/// Two-star fix from the command line.
/// Usage:
///   two_star_fix <STAR> <ALT> <STAR> <ALT> [TIME] [--height <m>] [--estimate <lat> <lon>]
/// Example:
///   two_star_fix Sirius 55.5 Canopus 40.2 2024-05-05T22:00:00 --height 10 --estimate 25 50
fn main() -> Result<(), StarfixError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1).collect::<Vec<_>>();

    let height = match args.iter().position(|a| a == "--height") {
        Some(pos) => {
            let value = parse_number(args.get(pos + 1))?;
            args.drain(pos..pos + 2);
            value
        }
        None => 0.0,
    };

    let estimate = match args.iter().position(|a| a == "--estimate") {
        Some(pos) => {
            let lat = parse_number(args.get(pos + 1))?;
            let lon = parse_number(args.get(pos + 2))?;
            args.drain(pos..pos + 3);
            Some(GeoPosition::new(lat, lon)?)
        }
        None => None,
    };

    if args.len() < 4 {
        return Err(StarfixError::InvalidRequest(
            "usage: two_star_fix <STAR> <ALT> <STAR> <ALT> [TIME] [--height <m>] [--estimate <lat> <lon>]"
                .into(),
        ));
    }

    let time = match args.get(4) {
        Some(t) => parse_time(t)?,
        None => starfix::time::now()?,
    };
    let conditions = ObservingConditions {
        observer_height: height,
        ..ObservingConditions::default()
    };

    let catalog = StarCatalog::navigation_stars()?;
    let mut sights = Vec::with_capacity(2);
    for pair in args[..4].chunks(2) {
        let name = &pair[0];
        let altitude = parse_number(Some(&pair[1]))?;
        let (ra, dec) = catalog.lookup(name)?;
        let obs = Observation::with_conditions(ra, dec, altitude, time, conditions)?.named(name.as_str());
        let sight = Sight::new(obs)?;
        println!(
            "{name:>10}: {sight}, GP {}, {:.1} km",
            sight.gp(),
            sight.distance_from_gp()
        );
        sights.push(sight);
    }

    let fix = SightCollection::new(sights)?.fix(estimate.as_ref())?;
    println!("Position: {}", fix.position);
    if fix.ambiguous {
        println!("(no estimate given: the first of the two intersections is shown)");
    }

    Ok(())
}

fn parse_number(arg: Option<&String>) -> Result<f64, StarfixError> {
    let arg = arg.ok_or_else(|| StarfixError::InvalidRequest("missing numeric argument".into()))?;
    arg.parse()
        .map_err(|_| StarfixError::InvalidRequest(format!("not a number: {arg}")))
}
