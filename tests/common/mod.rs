//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end
//! tests: a server spawned on a random port with scripted collaborators
//! standing in for the catalog, the lyrics sources and the generative
//! backend. Tests should only import from this module, not from internal
//! submodules.

mod client;
mod fixtures;
mod server;

// Public API - this is what tests import
#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use fixtures::{
    clean_scraped_lyrics, sample_track, BackendScript, FixtureCatalog, FixtureGenerator,
    FixtureSource, TestSetup,
};
#[allow(unused_imports)]
pub use server::TestServer;
