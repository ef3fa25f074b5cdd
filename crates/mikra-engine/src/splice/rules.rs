//! Rewrite-rule derivation
//!
//! Pure decision functions over a resolved [`SpliceContext`]: which
//! dependent citations a splice invalidates, and what each rewrites to.
//! Mutation and persistence live elsewhere; these functions only compute.

use mikra_core::citation::reference::Ref;
use mikra_core::errors::{MikraError, Result};

use super::context::SpliceContext;
use super::SpliceMode;

/// The layer a rule targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer {
    /// Citations into the base book itself
    Base,
    /// Citations into one commentary layer on the base book
    Commentary(String),
}

/// A derived predicate/rewrite pair for one splice and one layer
#[derive(Debug, Clone)]
pub struct RewriteRule<'a> {
    ctx: &'a SpliceContext,
    layer: Layer,
}

impl<'a> RewriteRule<'a> {
    pub fn base(ctx: &'a SpliceContext) -> Self {
        Self {
            ctx,
            layer: Layer::Base,
        }
    }

    pub fn commentary(ctx: &'a SpliceContext, title: impl Into<String>) -> Self {
        Self {
            ctx,
            layer: Layer::Commentary(title.into()),
        }
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    /// The book title this rule applies to
    pub fn target_title(&self) -> &str {
        match &self.layer {
            Layer::Base => &self.ctx.book,
            Layer::Commentary(title) => title,
        }
    }

    // Comparison level: the anchor's innermost level for the base layer;
    // the base-segment level inside a commentary citation, located via
    // the base book's structural depth.
    fn level(&self) -> usize {
        self.ctx.depth - 1
    }

    fn endpoint_qualifies(&self, sections: &[u32]) -> bool {
        let level = self.level();
        sections.len() > level
            && sections[..level] == self.ctx.section_path[..]
            && sections[level] > self.ctx.position
    }

    /// True iff the splice invalidates this citation
    ///
    /// Same book (per layer), same section, and an index at the
    /// comparison level strictly greater than the anchor's; both
    /// endpoints of a range are checked.
    pub fn needs_rewrite(&self, r: &Ref) -> bool {
        r.book == self.target_title()
            && (self.endpoint_qualifies(&r.sections) || self.endpoint_qualifies(&r.to_sections))
    }

    /// The citation's post-splice address
    ///
    /// # Errors
    ///
    /// Returns `SectionArithmetic` when an index would leave the valid
    /// range; callers log the failure and keep the original address.
    pub fn rewrite(&self, r: &Ref) -> Result<Ref> {
        let mut out = r.clone();
        if self.endpoint_qualifies(&r.sections) {
            self.rewrite_endpoint(&mut out.sections, r)?;
        }
        if self.endpoint_qualifies(&r.to_sections) {
            self.rewrite_endpoint(&mut out.to_sections, r)?;
        }
        Ok(out)
    }

    fn rewrite_endpoint(&self, sections: &mut [u32], original: &Ref) -> Result<()> {
        let level = self.level();
        let arithmetic = || MikraError::SectionArithmetic {
            citation: original.normalize(),
        };

        match (self.ctx.mode, &self.layer) {
            (SpliceMode::InsertAfter, _) => {
                sections[level] = sections[level].checked_add(1).ok_or_else(arithmetic)?;
            }
            (SpliceMode::Join, Layer::Base) => {
                sections[level] = sections[level]
                    .checked_sub(1)
                    .filter(|v| *v >= 1)
                    .ok_or_else(arithmetic)?;
            }
            (SpliceMode::Join, Layer::Commentary(title)) => {
                if sections[level] == self.ctx.position + 1 {
                    // This citation was anchored at the start of the block
                    // that got appended; re-anchor inside the merged block
                    // at the precomputed offset.
                    sections[level] = self.ctx.position;
                    if sections.len() > self.ctx.depth {
                        let shift = self
                            .ctx
                            .comment_section_lengths
                            .get(title)
                            .copied()
                            .unwrap_or(0);
                        sections[self.ctx.depth] = sections[self.ctx.depth]
                            .checked_add(shift)
                            .ok_or_else(arithmetic)?;
                    }
                } else {
                    sections[level] = sections[level]
                        .checked_sub(1)
                        .filter(|v| *v >= 1)
                        .ok_or_else(arithmetic)?;
                }
            }
        }
        Ok(())
    }
}
