//! SEO metadata: canonical/alternate links, JSON-LD and meta tags.
//!
//! - `urls`: slug cleaning and canonical/alternate/x-default derivation
//! - `head`: `HeadDocument` abstraction and the in-memory head
//! - `schema`: JSON-LD business listing
//! - `sync`: the resync algorithm
//! - `driver`: event loop reacting to navigation and language changes

pub mod driver;
pub mod head;
pub mod schema;
pub mod sync;
pub mod urls;

pub use driver::MetadataDriver;
pub use head::{HeadDocument, HeadElement, InMemoryHead, Selector};
pub use schema::BusinessProfile;
pub use sync::{MetadataSynchronizer, RouteSnapshot};
pub use urls::{clean_slug, PageUrls};
