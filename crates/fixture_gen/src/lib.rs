//! Fixture generator for the InfoMark course database.
//!
//! Generates deterministic, FK-consistent course data (users, enrollments,
//! sheets, tasks, submissions, grades, groups, ratings, bids, materials and
//! exams) and renders it as a PostgreSQL seed script.
//!
//! # Example
//!
//! ```rust
//! use fixture_gen::{Counts, FixtureConfig, Generator, RenderConfig, Renderer};
//!
//! let config = FixtureConfig {
//!     seed: 42,
//!     counts: Counts { students: 5, ..Counts::default() },
//!     password_cost: 4,
//!     ..FixtureConfig::default()
//! };
//! let data = Generator::new(config).generate().unwrap();
//!
//! let renderer = Renderer::new(RenderConfig::postgres());
//! let sql = renderer.render_to_string(&data).unwrap();
//!
//! assert!(sql.starts_with("BEGIN;"));
//! ```

pub mod config;
pub mod fake;
pub mod generator;
pub mod renderer;
pub mod schema;

pub use config::{Counts, FixtureConfig};
pub use generator::{GeneratedData, Generator, Record, SqlValue, TableData, UserRole};
pub use renderer::{render_insert, Quoting, RenderConfig, Renderer};
pub use schema::Table;
