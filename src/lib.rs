//! Bilingual (Arabic/English) site server.
//!
//! Two cooperating components share nothing but the URL and the route table:
//! the redirect normalizer (`redirect`, wired into `server`) funnels legacy and
//! invalid paths to canonical ones, and the metadata synchronizer (`seo`)
//! keeps canonical/alternate links, JSON-LD and meta tags in step with the
//! active route and language.

pub mod config;
pub mod i18n;
pub mod redirect;
pub mod render;
pub mod routes;
pub mod seo;
pub mod server;
