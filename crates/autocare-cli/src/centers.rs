use std::sync::Arc;

use autocare_core::{AppConfig, Matcher, NearbyQuery, NearbySearch, ReconciledResult};
use autocare_db::PgStore;
use autocare_places::PlacesClient;

/// Run one nearby search and print the reconciled results.
///
/// # Errors
///
/// Returns an error if the places client cannot be built or registered
/// centers cannot be loaded. A place-search failure is reported as a
/// warning and the registered-only results are still printed.
pub(crate) async fn run_nearby(
    pool: sqlx::PgPool,
    config: &AppConfig,
    query: &NearbyQuery,
) -> anyhow::Result<()> {
    let places = PlacesClient::new(&config.google_places_api_key, config.places_timeout_secs)?;
    let search = NearbySearch::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(places),
        Matcher::new(config.match_mode),
    );

    let outcome = search.search(query).await?;
    if let Some(err) = &outcome.provider_error {
        eprintln!("warning: place search unavailable ({}); showing registered centers only", err.code());
    }

    if outcome.results.is_empty() {
        println!("no service centers found");
        return Ok(());
    }

    println!("{:<5}{:<10}{:<36}ADDRESS", "REG", "DIST KM", "NAME");
    for result in &outcome.results {
        println!("{}", format_row(result));
    }
    Ok(())
}

fn format_row(result: &ReconciledResult) -> String {
    let registered = if result.is_registered { "yes" } else { "" };
    let distance = result
        .distance
        .map_or_else(|| "\u{2014}".to_string(), |d| format!("{d:.2}"));
    let name = if result.name.chars().count() > 34 {
        format!("{}...", result.name.chars().take(31).collect::<String>())
    } else {
        result.name.clone()
    };
    format!(
        "{registered:<5}{distance:<10}{name:<36}{}",
        result.address
    )
}

#[cfg(test)]
mod tests {
    use autocare_core::{Coordinates, ResultSource};

    use super::*;

    fn result(name: &str, distance: Option<f64>, is_registered: bool) -> ReconciledResult {
        ReconciledResult {
            id: "p1".to_string(),
            name: name.to_string(),
            address: "1 Main St".to_string(),
            location: Some(Coordinates::new(0.0, 0.0)),
            distance,
            is_registered,
            registered_data: None,
            rating: None,
            user_ratings_total: None,
            maps_url: None,
            source: ResultSource::Google,
        }
    }

    #[test]
    fn row_shows_distance_and_registration() {
        let row = format_row(&result("Acme Auto", Some(1.234), true));
        assert!(row.starts_with("yes  1.23"));
        assert!(row.ends_with("1 Main St"));
    }

    #[test]
    fn row_without_distance_uses_dash() {
        let row = format_row(&result("Acme Auto", None, false));
        assert!(row.contains('\u{2014}'));
    }

    #[test]
    fn long_names_are_truncated() {
        let row = format_row(&result(&"x".repeat(50), Some(0.5), false));
        assert!(row.contains(&format!("{}...", "x".repeat(31))));
        assert!(!row.contains(&"x".repeat(32)));
    }
}
