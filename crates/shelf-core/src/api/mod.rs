//! Book-metadata API: query building, the HTTP fetch, and response flattening.
//!
//! The pipeline is linear and synchronous:
//!
//! ```text
//! SearchQuery --request_url--> GET --parse_volumes--> VolumesResponse --flatten--> Vec<BookRow>
//! ```

pub mod client;
pub mod query;
pub mod volume;

pub use client::{BooksClient, VolumeSource};
pub use query::SearchQuery;
pub use volume::{
    BookRow, Volume, VolumeDetails, VolumeInfo, VolumesResponse, flatten, parse_volumes,
};
