/// Interactive terminal tracker front end
use crate::clients::FetchStates;
use crate::config::TrackSettings;
use crate::domain::{PlaneDetail, PlaneSummary};
use crate::errors::{ApiError, ApiResult};
use crate::services::TrackerService;
use std::io::{self, Write};
use std::time::Duration;
use tracing::warn;

/// List candidates, let the user pick one, then poll its state on a fixed
/// cadence for a bounded number of rounds.
pub async fn run_tracker<C: FetchStates>(
    service: &TrackerService<C>,
    settings: &TrackSettings,
    preselected: Option<String>,
) -> ApiResult<()> {
    let callsign = match preselected {
        Some(cs) => cs,
        None => {
            let list = service.plane_list().await?;
            if list.planes.is_empty() {
                println!("No candidates available right now (source: {}).", list.source);
                return Ok(());
            }

            print_candidates(&list.planes, list.source.to_string().as_str());
            let idx = choose_index(list.planes.len() - 1)?;
            let selected = &list.planes[idx];
            println!(
                "\nSelected: callsign={}, country={}",
                selected.callsign,
                selected.origin_country.as_deref().unwrap_or("unknown")
            );
            selected.callsign.clone()
        }
    };

    track_flight(service, settings, &callsign).await
}

fn print_candidates(planes: &[PlaneSummary], source: &str) {
    println!(
        "\nAircraft currently broadcasting a callsign ({} candidates, source: {}):",
        planes.len(),
        source
    );
    println!("{}", "-".repeat(78));
    for (idx, p) in planes.iter().enumerate() {
        let phase = match p.on_ground {
            Some(true) => "on ground",
            Some(false) => "airborne",
            None => "unknown",
        };
        println!(
            "[{idx:2}] {:<8}  {:<16}  {:<28}  {phase}",
            p.callsign,
            p.origin_country.as_deref().unwrap_or("unknown"),
            p.rough_location,
        );
    }
    println!("{}", "-".repeat(78));
}

/// Prompt until the user enters an index in range
fn choose_index(max_index: usize) -> ApiResult<usize> {
    let stdin = io::stdin();
    loop {
        print!("Enter the number of the aircraft to track (0-{max_index}): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            // stdin closed; nothing sensible left to do
            return Err(ApiError::InvalidInput("no selection made".to_string()));
        }

        match line.trim().parse::<usize>() {
            Ok(idx) if idx <= max_index => return Ok(idx),
            Ok(_) => println!("Number out of range."),
            Err(_) => println!("Please enter a number."),
        }
    }
}

async fn track_flight<C: FetchStates>(
    service: &TrackerService<C>,
    settings: &TrackSettings,
    callsign: &str,
) -> ApiResult<()> {
    println!(
        "\n=== Tracking {callsign} (every {}s, up to {} updates) ===",
        settings.interval_secs, settings.iterations
    );

    for i in 1..=settings.iterations {
        println!("\n--- Update {i}/{} ---", settings.iterations);
        match service.find_by_callsign(callsign).await {
            Ok(Some(detail)) => print_flight_detail(&detail),
            Ok(None) => println!("Not found (landed, out of coverage, or callsign changed)."),
            Err(e) => {
                // A transient upstream failure should not end the session
                warn!("update failed: {e}");
                println!("Update failed: {e}");
            }
        }

        if i < settings.iterations {
            tokio::time::sleep(Duration::from_secs(settings.interval_secs)).await;
        }
    }

    Ok(())
}

fn print_flight_detail(detail: &PlaneDetail) {
    let altitude = detail.geo_altitude.or(detail.baro_altitude);

    println!("=== Current state ===");
    println!("  Callsign     : {}", detail.callsign);
    println!("  ICAO24       : {}", detail.icao24);
    println!(
        "  Country      : {}",
        detail.origin_country.as_deref().unwrap_or("unknown")
    );
    println!("  Latitude     : {}", fmt_opt(detail.latitude));
    println!("  Longitude    : {}", fmt_opt(detail.longitude));
    println!("  Where now?   : {}", detail.rough_location);
    println!("  Altitude (m) : {}", fmt_opt(altitude));
    println!("  Speed (m/s)  : {}", fmt_opt(detail.velocity));
    println!("  Last contact : {}", detail.last_contact);
    println!("  Comment      : {}", detail.comment_text);
    println!("=====================");
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "N/A".to_string())
}
