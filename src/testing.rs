//! Testing utilities for ranking runs.
//!
//! - **Assertions**: compare ranked outputs and check the bounded container's
//!   invariants
//! - **Fixtures**: the worked examples and seeded record streams
//!
//! # Quick Start
//!
//! ```no_run
//! use ironrank::*;
//! use ironrank::testing::*;
//!
//! #[test]
//! fn top_three() -> anyhow::Result<()> {
//!     let runner = Runner::new(RankConfig::new(3).sequential())?;
//!     let outcome = runner.run(vec![single_partition_example()])?;
//!
//!     assert_ranked_equal(
//!         &outcome.ranked,
//!         &[("c".into(), 8), ("e".into(), 8), ("a".into(), 5)],
//!     );
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
