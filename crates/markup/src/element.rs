//! Element node: a nestable markup element and its serializer.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;

use crate::error::{MarkupError, MarkupResult};
use crate::spec::{ElementSpec, NodeOrSpec};

/// Indentation unit used when a node has no explicit indent.
pub const INDENT_UNIT: &str = "    ";

/// Elements that never self-close, even when empty.
const NEVER_SELF_CLOSING: &[&str] = &["textarea"];

/// A markup element with ordered attributes and owned children.
///
/// Children are owned exclusively by their parent, so a tree built from
/// `ElementNode`s is always finite and acyclic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    name: String,
    value: Option<String>,
    attributes: IndexMap<String, String>,
    children: Vec<ElementNode>,
    children_first: bool,
    indent: Option<String>,
}

impl ElementNode {
    /// Create an empty element with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            attributes: IndexMap::new(),
            children: Vec::new(),
            children_first: false,
            indent: None,
        }
    }

    /// Set the text value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Append an initial child.
    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(child);
        self
    }

    /// Render children before the text value.
    pub fn with_children_first(mut self, first: bool) -> Self {
        self.children_first = first;
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = Some(indent.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Build an element tree from its structural description.
    ///
    /// Fails with [`MarkupError::Config`] when the description (or any nested
    /// description) has no name.
    pub fn from_spec(spec: ElementSpec) -> MarkupResult<Self> {
        let ElementSpec {
            name,
            value,
            attributes,
            children,
            children_first,
            indent,
        } = spec;

        let name = name.ok_or_else(MarkupError::missing_name)?;
        let mut node = Self {
            name,
            value,
            attributes,
            children: Vec::with_capacity(children.len()),
            children_first,
            indent,
        };
        node.add_children(children)?;
        Ok(node)
    }

    /// Describe this element tree; the inverse of [`ElementNode::from_spec`].
    pub fn to_spec(&self) -> ElementSpec {
        ElementSpec {
            name: Some(self.name.clone()),
            value: self.value.clone(),
            attributes: self.attributes.clone(),
            children: self
                .children
                .iter()
                .map(|child| NodeOrSpec::Spec(child.to_spec()))
                .collect(),
            children_first: self.children_first,
            indent: self.indent.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Children
    // -------------------------------------------------------------------------

    /// Append a child element or description.
    pub fn add_child(&mut self, child: impl Into<NodeOrSpec>) -> MarkupResult<&mut Self> {
        let node = child.into().into_node()?;
        self.children.push(node);
        Ok(self)
    }

    /// Append an already-built child. Never fails.
    pub fn push_child(&mut self, child: ElementNode) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Append children in order, stopping at the first failure.
    ///
    /// Children added before the failure stay attached.
    pub fn add_children<I>(&mut self, children: I) -> MarkupResult<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<NodeOrSpec>,
    {
        for child in children {
            self.add_child(child)?;
        }
        Ok(self)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Child at `index`, or `None` when out of range.
    pub fn child(&self, index: usize) -> Option<&ElementNode> {
        self.children.get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut ElementNode> {
        self.children.get_mut(index)
    }

    pub fn children(&self) -> &[ElementNode] {
        &self.children
    }

    /// Remove the child at `index`. Out-of-range indexes are a no-op.
    pub fn remove_child(&mut self, index: usize) -> Option<ElementNode> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    pub fn remove_children(&mut self) {
        self.children.clear();
    }

    // -------------------------------------------------------------------------
    // Name, value, indent
    // -------------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: impl Into<String>) -> &mut Self {
        self.value = Some(value.into());
        self
    }

    pub fn indent(&self) -> Option<&str> {
        self.indent.as_deref()
    }

    pub fn set_indent(&mut self, indent: impl Into<String>) -> &mut Self {
        self.indent = Some(indent.into());
        self
    }

    pub fn children_first(&self) -> bool {
        self.children_first
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    /// Set an attribute. Re-setting an existing key keeps its position.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn set_attributes<I, K, V>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in attributes {
            self.attributes.insert(name.into(), value.into());
        }
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Remove an attribute, preserving the order of the remaining ones.
    pub fn remove_attribute(&mut self, name: &str) -> &mut Self {
        self.attributes.shift_remove(name);
        self
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Serialize this element and its subtree starting at depth 0.
    pub fn render(&self) -> String {
        self.render_at(0, None)
    }

    /// Serialize at `depth`, prefixing lines with the caller's `ambient` indent.
    ///
    /// Attribute values and text are written verbatim; escaping is the
    /// caller's job. Every line, including the last, ends with `\n`.
    pub fn render_at(&self, depth: usize, ambient: Option<&str>) -> String {
        let mut output = String::new();
        self.write_markup(&mut output, depth, ambient);
        output
    }

    fn write_markup(&self, out: &mut String, depth: usize, ambient: Option<&str>) {
        let own: Cow<'_, str> = match &self.indent {
            Some(indent) => Cow::Borrowed(indent),
            None => Cow::Owned(INDENT_UNIT.repeat(depth)),
        };

        out.push_str(ambient.unwrap_or_default());
        out.push_str(&own);
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }

        if self.children.is_empty() {
            if self.value.is_some() || NEVER_SELF_CLOSING.contains(&self.name.as_str()) {
                out.push('>');
                out.push_str(self.value.as_deref().unwrap_or_default());
                self.write_close(out);
            } else {
                out.push_str(" />\n");
            }
            return;
        }

        // The outermost rendered node hands its own indent down as the ambient
        // indent; nested nodes pass the caller's ambient through unchanged.
        let (carried, closing): (Cow<'_, str>, Cow<'_, str>) = match ambient {
            None => (own.clone(), own),
            Some(ambient) => (Cow::Borrowed(ambient), Cow::Owned(format!("{ambient}{own}"))),
        };

        out.push_str(">\n");
        let child_depth = depth + 1;

        if !self.children_first {
            self.write_value_line(out, child_depth, &carried);
        }
        for child in &self.children {
            child.write_markup(out, child_depth, Some(&carried));
        }
        if self.children_first {
            self.write_value_line(out, child_depth, &carried);
        }

        out.push_str(&closing);
        self.write_close(out);
    }

    fn write_value_line(&self, out: &mut String, depth: usize, carried: &str) {
        if let Some(value) = &self.value {
            out.push_str(&INDENT_UNIT.repeat(depth));
            out.push_str(carried);
            out.push_str(value);
            out.push('\n');
        }
    }

    fn write_close(&self, out: &mut String) {
        out.push_str("</");
        out.push_str(&self.name);
        out.push_str(">\n");
    }
}

impl fmt::Display for ElementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl TryFrom<ElementSpec> for ElementNode {
    type Error = MarkupError;

    fn try_from(spec: ElementSpec) -> Result<Self, Self::Error> {
        Self::from_spec(spec)
    }
}
