use core::ops::Range;
use std::sync::Arc;

use crate::font::Font;

/// Style attribute values the line core understands.
#[derive(Debug, Clone)]
pub enum AttrValue {
    /// Font used for the covered text.
    Font(Arc<dyn Font>),
    /// Line height as a multiple of the font height.
    LineHeight(f64),
    /// Line height in layout units.
    AbsoluteLineHeight(i32),
    /// Extra spacing between lines, added to the external leading.
    LineSpacing(i32),
}

/// An attribute applied to a byte range of the paragraph text.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub range: Range<usize>,
    pub value: AttrValue,
}

impl Attribute {
    pub fn new(range: Range<usize>, value: AttrValue) -> Self {
        Self { range, value }
    }

    pub fn covers(&self, index: usize) -> bool {
        self.range.start <= index && index < self.range.end
    }
}

/// Attributes ordered by start index. Later insertions win when several
/// attributes of the same kind cover an index.
#[derive(Debug, Clone, Default)]
pub struct AttrList {
    attrs: Vec<Attribute>,
}

impl AttrList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attr: Attribute) {
        let pos = self
            .attrs
            .partition_point(|a| a.range.start <= attr.range.start);
        self.attrs.insert(pos, attr);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter()
    }

    /// Attributes covering byte `index`, in list order.
    pub fn attrs_at(&self, index: usize) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter().filter(move |a| a.covers(index))
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}
