//! AST element types: types, arguments, methods, and top-level declarations.
//!
//! All source positions are 1-based line numbers. `comments` fields hold the
//! `/** */` documentation text captured immediately before a declaration, or
//! an empty string when none was written.

use std::fmt;

use smol_str::SmolStr;

// ============================================================================
// Type
// ============================================================================

/// A named, possibly array-dimensioned type reference.
///
/// `dimension` counts array levels: `String[][]` has dimension 2. Immutable
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    name: SmolStr,
    dimension: u32,
    line: u32,
    comments: String,
}

impl Type {
    pub fn new(
        name: impl Into<SmolStr>,
        line: u32,
        comments: impl Into<String>,
        dimension: u32,
    ) -> Self {
        Self {
            name: name.into(),
            dimension,
            line,
            comments: comments.into(),
        }
    }

    /// A scalar (non-array) type reference.
    pub fn scalar(name: impl Into<SmolStr>, line: u32, comments: impl Into<String>) -> Self {
        Self::new(name, line, comments, 0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    /// One `[]` pair per array level.
    pub fn brackets(&self) -> String {
        "[]".repeat(self.dimension as usize)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.brackets())
    }
}

// ============================================================================
// Argument
// ============================================================================

/// Direction qualifier on a method argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    In,
    Out,
    Inout,
}

impl Direction {
    /// The source keyword for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Inout => "inout",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One formal method parameter.
///
/// The direction is `None` when the source omitted the qualifier; an omitted
/// direction behaves as `in` but renders without a keyword. Immutable after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    direction: Option<Direction>,
    arg_type: Type,
    name: SmolStr,
    line: u32,
}

impl Argument {
    /// An argument whose direction was written explicitly.
    pub fn with_direction(
        direction: Direction,
        arg_type: Type,
        name: impl Into<SmolStr>,
        line: u32,
    ) -> Self {
        Self {
            direction: Some(direction),
            arg_type,
            name: name.into(),
            line,
        }
    }

    /// An argument with no direction qualifier in the source.
    pub fn new(arg_type: Type, name: impl Into<SmolStr>, line: u32) -> Self {
        Self {
            direction: None,
            arg_type,
            name: name.into(),
            line,
        }
    }

    /// The effective direction: `In` when the source omitted the qualifier.
    pub fn direction(&self) -> Direction {
        self.direction.unwrap_or_default()
    }

    /// Whether the direction keyword was written in the source.
    pub fn direction_specified(&self) -> bool {
        self.direction.is_some()
    }

    pub fn arg_type(&self) -> &Type {
        &self.arg_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(direction) = self.direction {
            write!(f, "{direction} ")?;
        }
        write!(f, "{} {}", self.arg_type, self.name)
    }
}

// ============================================================================
// Method
// ============================================================================

/// One interface member: return type, name, and ordered argument list.
///
/// The grammar constructs a method in one call once all parts of the
/// production are in hand; after attachment to the document it is never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    comments: String,
    oneway: bool,
    return_type: Type,
    name: SmolStr,
    line: u32,
    arguments: Vec<Argument>,
    /// Explicitly assigned transaction id (`= 3`), if any.
    id: Option<u32>,
}

impl Method {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        comments: impl Into<String>,
        oneway: bool,
        return_type: Type,
        name: impl Into<SmolStr>,
        line: u32,
        arguments: Vec<Argument>,
        id: Option<u32>,
    ) -> Self {
        Self {
            comments: comments.into(),
            oneway,
            return_type,
            name: name.into(),
            line,
            arguments,
            id,
        }
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn oneway(&self) -> bool {
        self.oneway
    }

    pub fn return_type(&self) -> &Type {
        &self.return_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn id(&self) -> Option<u32> {
        self.id
    }
}

// ============================================================================
// Top-level declarations
// ============================================================================

/// A `parcelable Name;` forward declaration. The name may be qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parcelable {
    pub name: SmolStr,
    pub line: u32,
    pub comments: String,
}

/// An `interface Name { ... }` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name: SmolStr,
    pub oneway: bool,
    pub line: u32,
    pub comments: String,
    pub methods: Vec<Method>,
}

/// One top-level declaration in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Parcelable(Parcelable),
    Interface(Interface),
}

/// The root of the parsed declaration tree for one file.
///
/// After a failed parse this may hold a partial tree; callers gate on
/// [`crate::Parser::run`] or [`crate::Parser::found_no_errors`] before
/// trusting its contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub items: Vec<Item>,
}

impl Document {
    /// Iterate the interfaces declared in this document.
    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.items.iter().filter_map(|item| match item {
            Item::Interface(interface) => Some(interface),
            _ => None,
        })
    }
}
