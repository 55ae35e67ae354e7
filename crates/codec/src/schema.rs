//! Field-schema descriptors.
//!
//! A [`Schema`] fixes everything about a record list's wire format: the field
//! order and kinds, what to write for an absent field, whether records carry an
//! explicit leading index, and whether the joined string is percent-encoded.

/// Token that marks an absent field on the wire.
pub const SENTINEL: &str = "_";

/// Separates records.
pub const RECORD_DELIMITER: char = ';';

/// Separates fields within a record.
pub const FIELD_DELIMITER: char = ':';

/// Highest slot an indexed record may claim.
pub const MAX_RECORD_INDEX: usize = 1024;

/// How a field's raw token is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Kept verbatim.
    Str,
    /// Parsed with `parseInt` semantics.
    Int,
    /// Parsed with `parseFloat` semantics.
    Float,
}

/// One positional field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Literal serialized when the field has no value.
    ///
    /// String fields use [`SENTINEL`]. Numeric fields write a default number
    /// instead, which parses back as a present value.
    pub absent: &'static str,
}

impl FieldSpec {
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Str,
            absent: SENTINEL,
        }
    }

    pub const fn int(name: &'static str, absent: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Int,
            absent,
        }
    }

    pub const fn float(name: &'static str, absent: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Float,
            absent,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, FieldKind::Int | FieldKind::Float)
    }
}

/// Where a decoded record lands in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Each record starts with its slot number, and holes are allowed.
    Indexed,
    /// Records are appended in order. A record whose `required` field is
    /// absent is dropped.
    Appended { required: &'static str },
}

/// Extra encoding applied to the whole joined string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Plain,
    /// `encodeURIComponent` on write, `decodeURIComponent` on read.
    UriComponent,
}

/// Wire description of one list-valued query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Query parameter name.
    pub key: &'static str,
    pub fields: &'static [FieldSpec],
    pub layout: Layout,
    pub encoding: Encoding,
}

impl Schema {
    /// Number of `:`-separated tokens in a well-formed record.
    pub fn width(&self) -> usize {
        match self.layout {
            Layout::Indexed => self.fields.len() + 1,
            Layout::Appended { .. } => self.fields.len(),
        }
    }

    /// Position of a field by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self.layout, Layout::Indexed)
    }
}
