//! relcheck - release notes in, database checks out
//!
//! Pipeline, leaves first:
//!
//! 1. `extractor` turns release-note text into statements
//! 2. `generator` turns statements into test descriptors
//! 3. `executor` runs descriptor queries against each target
//! 4. `evaluator` judges returned rows against the expectation
//! 5. `pipeline` orchestrates the above into verdicts
//! 6. `report` renders verdicts
//!
//! ```ignore
//! use relcheck::config::Config;
//! use relcheck::executor::SqliteSource;
//! use relcheck::generator::Generator;
//! use relcheck::pipeline::Pipeline;
//!
//! let config = Config::load("relcheck.json".as_ref())?;
//! let generator = Generator::from_config(&config);
//! let source = SqliteSource::from_config(&config);
//! let verdicts = Pipeline::new(&config, &generator, &source).run("- fixed login bug")?;
//! ```

pub mod cli;
pub mod config;
pub mod evaluator;
pub mod executor;
pub mod extractor;
pub mod generator;
pub mod observability;
pub mod pipeline;
pub mod report;
