//! Test-case model, templates and generation rules

pub mod generator;
pub mod rules;
pub mod templates;
pub mod types;

pub use generator::{optimize, GenerateError, RequirementCategory, TestCaseGenerator};
pub use rules::{RulesConfig, RulesError};
pub use types::{CustomScenario, FeatureScenarios, Priority, TestCase, TestType, COLUMNS};
