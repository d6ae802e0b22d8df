//! Expand local `$ref` pointers in OpenAPI/Swagger-style documents. Every
//! mapping of the form `{"$ref": "#/path/to/target"}` is replaced, recursively,
//! by a deep copy of the value at `path/to/target`, producing a single
//! self-contained document.
//!
//! ```
//! use swagexpand_core::{document, expand};
//!
//! let document = document::load_str(
//!     r##"
//! definitions:
//!   Category: {type: object}
//! root:
//!   $ref: "#/definitions/Category"
//! "##,
//! )
//! .unwrap();
//! let expanded = expand(&document).unwrap();
//! assert_eq!(
//!     expanded,
//!     document::load_str(
//!         "
//! definitions:
//!   Category: {type: object}
//! root: {type: object}
//! "
//!     )
//!     .unwrap()
//! );
//! ```
//!
//! **This crate is not semver compliant**. The version is locked to the root
//! `swagexpand` crate version. If you choose to depend directly on this crate,
//! you do so at your own risk of breakage.

pub mod document;
mod error;
mod expand;
mod node;
mod pointer;

pub use error::{
    ExpandError, ExpandErrorKind, NodePath, PathSegment, PointerError,
};
pub use expand::{
    ExpandOptions, Expander, REFERENCE_KEY, SiblingPolicy, expand,
};
pub use node::{Kind, Mapping, Node, Scalar};
pub use pointer::Pointer;
