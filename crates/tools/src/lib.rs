//! The tools the Wayfinder agent can call.
//!
//! - [`extract`]: pattern-cascade location extraction from free text
//! - [`geocode`]: coordinates for a (partial) location
//! - [`web_search`]: text snippets about a place

pub mod extract;
pub mod geocode;
pub mod web_search;

pub use extract::Extractor;
pub use geocode::{Coordinates, GeoOutcome, GeoService, Geocoder, NominatimGeocoder};
pub use web_search::{
    DuckDuckGoSearch, SearchHit, SearchOutcome, SearchProvider, WebSearch, WikipediaSearch,
};
