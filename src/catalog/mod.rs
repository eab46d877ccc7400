//! # Parameter catalog
//!
//! The device's addressing tree, written down as tables. Every table entry becomes a navigation
//! method on its section, so `driver.interfaces().table().in_octets(1)` hands out a
//! [`ReadOnly`](crate::leaf::ReadOnly) leaf for `1.3.6.1.2.1.2.2.1.10.1`.
//!
//! Navigation never talks to the device and never mutates anything: every call returns a fresh
//! section or leaf.

use crate::{
    aggregator::Aggregator,
    leaf::{
        Access,
        Leaf,
    },
    parameter_id::ParameterId,
};
use serde::Serialize;

/// One leaf entry in a section table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: &'static str,
    /// Appended to the section base to form the id template.
    pub suffix: &'static str,
    pub access: Access,
}

/// A leaf as seen from the catalog root, e.g. `demodulator1.cn_ratio`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub path: String,
    /// Id without the instance index.
    pub template: String,
    pub access: Access,
}

impl CatalogEntry {
    pub fn new(section_path: &str, section_base: &str, spec: &ParameterSpec) -> Self {
        Self {
            path: format!("{section_path}.{}", spec.name),
            template: format!("{section_base}.{}", spec.suffix),
            access: spec.access,
        }
    }

    pub fn id(&self, index: u32) -> ParameterId {
        ParameterId::from_template(&self.template, index)
    }
}

/// Position in the tree: the dispatcher plus the id prefix of everything below.
#[derive(Debug, Clone)]
pub struct Node<'a> {
    aggregator: &'a Aggregator,
    base: String,
}

impl<'a> Node<'a> {
    /// `base` must be a dotted numeric prefix; only the driver creates root nodes.
    pub(crate) fn new(aggregator: &'a Aggregator, base: impl Into<String>) -> Self {
        Self {
            aggregator,
            base: base.into(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn child(&self, suffix: &str) -> Node<'a> {
        Node::new(self.aggregator, format!("{}.{suffix}", self.base))
    }

    /// Binds a leaf for instance `index` (0 when absent).
    pub fn leaf<L: Leaf<'a>>(&self, suffix: &str, index: Option<u32>) -> L {
        let template = format!("{}.{suffix}", self.base);
        L::bind(self.aggregator, ParameterId::from_template(&template, index.unwrap_or(0)))
    }
}

macro_rules! access {
    (ro) => {
        $crate::leaf::Access::ReadOnly
    };
    (wo) => {
        $crate::leaf::Access::WriteOnly
    };
    (rw) => {
        $crate::leaf::Access::ReadWrite
    };
}

macro_rules! leaf_type {
    (ro, $lt:lifetime) => {
        $crate::leaf::ReadOnly<$lt>
    };
    (wo, $lt:lifetime) => {
        $crate::leaf::WriteOnly<$lt>
    };
    (rw, $lt:lifetime) => {
        $crate::leaf::ReadWrite<$lt>
    };
}

/// Declares a catalog section from a leaf table and an optional table of child sections.
///
/// ```ignore
/// section! {
///     pub struct Timing {
///         ro ncr_locked = "1";
///         rw reference_source = "5";
///     }
///     children {
///         frame: TdmaFrame = "10";
///     }
/// }
/// ```
macro_rules! section {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$leaf_meta:meta])* $access:ident $leaf:ident = $suffix:literal; )*
        }
        $( children {
            $( $(#[$child_meta:meta])* $child:ident: $child_ty:ident = $child_suffix:literal; )*
        } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name<'a> {
            node: $crate::catalog::Node<'a>,
        }

        impl<'a> $name<'a> {
            pub const LEAVES: &'static [$crate::catalog::ParameterSpec] = &[
                $(
                    $crate::catalog::ParameterSpec {
                        name: stringify!($leaf),
                        suffix: $suffix,
                        access: access!($access),
                    },
                )*
            ];

            pub(crate) fn from_node(node: $crate::catalog::Node<'a>) -> Self {
                Self { node }
            }

            pub fn base(&self) -> &str {
                self.node.base()
            }

            $(
                $(#[$leaf_meta])*
                pub fn $leaf(&self, index: impl Into<Option<u32>>) -> leaf_type!($access, 'a) {
                    self.node.leaf($suffix, index.into())
                }
            )*

            $($(
                $(#[$child_meta])*
                pub fn $child(&self) -> $child_ty<'a> {
                    $child_ty::from_node(self.node.child($child_suffix))
                }
            )*)?

            /// Appends every leaf below this section, rooted at `base`/`path`.
            pub fn describe(base: &str, path: &str, out: &mut Vec<$crate::catalog::CatalogEntry>) {
                for spec in Self::LEAVES {
                    out.push($crate::catalog::CatalogEntry::new(path, base, spec));
                }
                $($(
                    $child_ty::describe(
                        &format!("{base}.{}", $child_suffix),
                        &format!("{path}.{}", stringify!($child)),
                        out,
                    );
                )*)?
            }
        }
    };
}

mod mib2;
mod modem;

pub use mib2::{
    InterfaceTable,
    Interfaces,
    System,
};
pub use modem::{
    Control,
    DemodulatorStats,
    MobileStation,
    ModulatorStats,
    PriorityQueues,
    Routing,
    Shaper,
    SystemHealth,
    Tdma,
    TdmaFrame,
    Timing,
};

/// Finds `path` (e.g. `interfaces.table.in_octets`) among `entries`.
pub fn lookup<'e>(entries: &'e [CatalogEntry], path: &str) -> Option<&'e CatalogEntry> {
    let path = path.trim().trim_matches('.');
    entries.iter().find(|entry| entry.path == path)
}
