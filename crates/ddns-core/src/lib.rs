// # ddns-core
//
// Core library for the one-shot DDNS updater.
//
// ## Architecture Overview
//
// This library provides the pieces every run is built from:
// - **IpSource**: Trait for resolving the current public address
// - **DnsProvider**: Trait for looking up and rewriting DNS records via provider APIs
// - **DdnsEngine**: Runs resolve → domain lookup → record lookup → update once
// - **UpdaterConfig**: Configuration read once from the environment
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from HTTP implementations
// 2. **Explicit State**: Configuration is passed by value, never held globally
// 3. **Typed Failures**: Every step returns a `Result`; only the binary decides exit codes
// 4. **Library-First**: All core functionality can be used as a library

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider, DomainRef, RecordSnapshot};
pub use engine::{DdnsEngine, RunOutcome};
pub use config::{RecordTarget, RunMode, UpdaterConfig};
pub use error::{Error, Result};
