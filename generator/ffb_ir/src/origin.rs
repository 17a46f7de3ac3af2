//! Declaration origin hints.
//!
//! The generator has no source text and no byte spans; the input is a
//! description graph. What a diagnostic can point at is the declaration
//! path: which aggregate or interface, which member, which parameter
//! position. `Origin` is that path, kept cheap (three words) so every
//! descriptor can carry one.

use crate::Name;

/// Where a descriptor came from in the description graph.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Origin {
    /// The owning top-level declaration (aggregate or interface).
    pub decl: Name,
    /// The member within the declaration (field or function), if any.
    pub member: Option<Name>,
    /// Parameter position within a function (0-based), if any.
    pub param: Option<u32>,
}

impl Origin {
    /// Origin pointing at a whole declaration.
    pub fn decl(decl: Name) -> Self {
        Origin {
            decl,
            member: None,
            param: None,
        }
    }

    /// Narrow to a member of the declaration.
    #[must_use]
    pub fn member(self, member: Name) -> Self {
        Origin {
            member: Some(member),
            ..self
        }
    }

    /// Narrow to a parameter position of the member.
    #[must_use]
    pub fn param(self, index: u32) -> Self {
        Origin {
            param: Some(index),
            ..self
        }
    }

    /// Render the declaration path with the given name resolver.
    ///
    /// Takes a closure rather than an interner so the diagnostic crate
    /// does not depend on where names are stored.
    pub fn render(&self, mut resolve: impl FnMut(Name) -> String) -> String {
        let mut out = resolve(self.decl);
        if let Some(member) = self.member {
            out.push('.');
            out.push_str(&resolve(member));
        }
        if let Some(param) = self.param {
            out.push_str(&format!("[param {param}]"));
        }
        out
    }
}
