//! Diagnostic system for the Quill compiler driver.
//!
//! - Named codes for searchability ([`DiagnosticCode`])
//! - Severity levels with an error budget enforced by the driver
//! - Optional source locations, rendered as caret-underlined snippets
//! - Attached `<Info>` sub-entries for related context
//!
//! The driver owns delivery (serialization, counting, the fail condition);
//! this crate owns the data model and the terminal rendering.

mod code;
mod diagnostic;
pub mod render;

pub use code::DiagnosticCode;
pub use diagnostic::{Diagnostic, DiagnosticInfo, DiagnosticSink, Level};
pub use render::ColorMode;
