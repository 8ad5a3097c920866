//! Null implementation of the Tatt-E vendor-plugin contract.
//!
//! A deliberately trivial but fully conforming implementation of both
//! interface revisions. It contains no recognition algorithm - templates
//! are small deterministic records, similarity is byte overlap, detection is
//! an ink-fraction heuristic - but it honors every rule of the contract:
//! status codes, optional sketch support, empty output containers,
//! enrollment internalization, and read-only concurrent gallery access.
//!
//! Useful as a harness smoke-test target and as a worked example of the
//! call sequence a real vendor library must support.

pub mod engine;
pub mod gallery;
pub mod legacy;
pub mod logging;
mod measure;

pub use engine::NullEngine;
pub use gallery::Gallery;

use tatte_api::v2::Interface;

/// Factory entry point for the revision 2 interface.
pub fn implementation() -> Box<dyn Interface + Send> {
    Box::new(NullEngine::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tatte_api::v2::InterfaceFactory;

    #[test]
    fn test_factory_matches_published_signature() {
        // The harness loads vendor code through this exact signature
        let factory: InterfaceFactory = implementation;
        let _boxed = factory();
    }
}
