//! # Buffr ID Testkit
//!
//! Testing utilities for Buffr ID.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: fixed inputs with derived canonical forms,
//!   fingerprints, and identifiers for cross-implementation verification
//! - **Generators**: proptest strategies for property-based testing
//! - **Fixtures**: a ready-made registry over the memory store
//!
//! ## Golden Vectors
//!
//! ```rust
//! use buffr_id_testkit::vectors::{all_vectors, verify_all_vectors};
//!
//! verify_all_vectors().unwrap();
//! for vector in all_vectors() {
//!     println!("{}: {}", vector.name, vector.identifier);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use buffr_id_testkit::generators::valid_identifier_string;
//!
//! proptest! {
//!     #[test]
//!     fn always_parses(s in valid_identifier_string()) {
//!         prop_assert!(buffr_id_core::parse(&s).is_ok());
//!     }
//! }
//! ```
//!
//! ## Fixtures
//!
//! ```rust,no_run
//! use buffr_id_testkit::fixtures::TestFixture;
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! let id = fixture.register_property("owner-001", "Buffr Host Resort").await;
//! # }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{DownKeyring, TestFixture};
pub use generators::{raw_identifier, valid_identifier_string};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
