//! Document model for Windows Setup answer files (`unattend.xml`).
//!
//! A [`Document`] is an ordered element tree rooted at `<unattend>`. It is
//! built through idempotent get-or-create operations, checked with
//! [`validate`], rewritten with [`optimize`] and written with [`writer`].

use thiserror::Error;

pub mod arch;
pub mod document;
pub mod optimize;
pub mod pass;
pub mod reader;
pub mod validate;
pub mod writer;

pub use arch::Architecture;
pub use document::{Document, Element, NodeId};
pub use optimize::{Optimization, OptimizeSummary, optimize};
pub use pass::Pass;
pub use validate::{SchemaCheck, Severity, ValidationIssue, ValidationReport, validate};
pub use writer::WriterOptions;

/// Default namespace of the `<unattend>` root.
pub const UNATTEND_NAMESPACE: &str = "urn:schemas-microsoft-com:unattend";

/// Namespace bound to the `wcm` prefix on every component.
pub const WCM_NAMESPACE: &str = "http://schemas.microsoft.com/WMIConfig/2002/State";

/// Namespace bound to the `xsi` prefix on every component.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Public key token carried by every Microsoft component.
pub const PUBLIC_KEY_TOKEN: &str = "31bf3856ad364e35";

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("The document already has a root element")]
    RootExists,

    #[error("The document has no root element")]
    MissingRoot,

    #[error("Unexpected root element: {0}")]
    UnexpectedRoot(String),

    #[error("Command order at {location} is not a number: {value:?}")]
    InvalidOrder { location: String, value: String },

    #[error("Unbalanced end tag: {0}")]
    UnbalancedTag(String),

    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
