//! One-time fixture data for the movie catalog

use tracing::info;

use crate::Result;
use crate::contract::MovieValues;
use crate::provider::MovieProvider;

/// Sample titles and ratings loaded on first launch
pub const SAMPLE_MOVIES: &[(&str, i64)] = &[
    ("Eternal Sunshine of the Spotless Mind", 5),
    ("Oldboy", 5),
    ("Ponyo", 1),
    ("Frozen", 2),
    ("Let the Right One In", 3),
    ("Amelie", 5),
    ("Pan's Labyrinth", 5),
    ("City of God", 4),
    ("Akira", 3),
    ("Some Like It Hot", 4),
];

/// Bulk-insert the sample movies through the provider.
///
/// The provider skips duplicate titles as soft conflicts, so this can run on
/// every launch; a second run accepts zero rows. Returns the accepted count.
pub fn run(provider: &MovieProvider) -> Result<usize> {
    let values: Vec<MovieValues> = SAMPLE_MOVIES
        .iter()
        .map(|(title, rating)| MovieValues::new().with_title(*title).with_rating(*rating))
        .collect();

    let accepted = provider.bulk_insert(&provider.collection_uri(), &values)?;
    info!("seeded {} of {} sample movies", accepted, values.len());
    Ok(accepted)
}
