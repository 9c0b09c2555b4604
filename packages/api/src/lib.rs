//! Response types for the API documentation console.
//!
//! This crate holds the serialisable shapes the console hands to its
//! presentation layer. The documentation tree's controller level is also
//! what the console caches per (service, version).
//!
//! # Operations covered
//!
//! | Operation | Type |
//! |-----------|------|
//! | documentation tree | [`DocumentationTree`] of [`TreeNode`] |
//! | controllers of a service | [`apidoc::ControllerDoc`] |
//! | service invocation counts | [`ServiceInvokeReport`] |
//! | API invocation counts | [`ApiInvokeReport`] |
//! | APIs per service | [`ApiCountReport`] |
//! | any failure | [`ErrorResponse`] |

pub mod error;
pub mod report;
pub mod tree;

pub use error::{codes, ErrorResponse};
pub use report::{
    ApiCountReport, ApiInvokeDetail, ApiInvokeReport, ServiceInvokeDetail, ServiceInvokeReport,
};
pub use tree::{DocumentationTree, TreeNode};
