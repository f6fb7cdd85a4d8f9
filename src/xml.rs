//! A minimal element tree for the documents handed to the platform.

use std::fmt;

/// An XML element with ordered attributes and either child elements or text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<Element>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Value of the first attribute with this name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Direct children with this element name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Renders with two-space indentation, one element per line.
    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out, Some(0));
        out
    }

    fn write_to(&self, out: &mut String, indent: Option<usize>) {
        if let Some(level) = indent {
            out.push_str(&"  ".repeat(level));
        }
        out.push('<');
        out.push_str(self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }

        if self.children.is_empty() && self.text.is_none() {
            out.push_str(" />");
            if indent.is_some() {
                out.push('\n');
            }
            return;
        }
        out.push('>');

        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        if !self.children.is_empty() {
            if indent.is_some() {
                out.push('\n');
            }
            for child in &self.children {
                child.write_to(out, indent.map(|level| level + 1));
            }
            if let Some(level) = indent {
                out.push_str(&"  ".repeat(level));
            }
        }

        out.push_str("</");
        out.push_str(self.name);
        out.push('>');
        if indent.is_some() {
            out.push('\n');
        }
    }
}

/// Compact rendering, no whitespace between elements.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out, None);
        f.write_str(&out)
    }
}

/// Escapes text for use in attribute values and element content.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_rendering() {
        let element = Element::new("filter")
            .attr("type", "or")
            .child(Element::new("condition").attr("attribute", "title").attr("operator", "null"));

        assert_eq!(
            element.to_string(),
            r#"<filter type="or"><condition attribute="title" operator="null" /></filter>"#
        );
    }

    #[test]
    fn test_text_content() {
        let element = Element::new("value").text("2024-01-01");
        assert_eq!(element.to_string(), "<value>2024-01-01</value>");
    }

    #[test]
    fn test_escaping() {
        let element = Element::new("condition").attr("value", r#"%"A&B" <c>%"#);
        assert_eq!(
            element.to_string(),
            r#"<condition value="%&quot;A&amp;B&quot; &lt;c&gt;%" />"#
        );
        assert_eq!(escape("O'Brien"), "O&apos;Brien");
    }

    #[test]
    fn test_pretty_rendering() {
        let element = Element::new("entity")
            .attr("name", "incident")
            .child(Element::new("attribute").attr("name", "title"));

        assert_eq!(
            element.to_pretty_string(),
            "<entity name=\"incident\">\n  <attribute name=\"title\" />\n</entity>\n"
        );
    }

    #[test]
    fn test_lookup_helpers() {
        let element = Element::new("entity")
            .attr("name", "incident")
            .child(Element::new("attribute").attr("name", "a"))
            .child(Element::new("filter"))
            .child(Element::new("attribute").attr("name", "b"));

        assert_eq!(element.get_attr("name"), Some("incident"));
        assert_eq!(element.get_attr("alias"), None);
        let names: Vec<_> = element.children_named("attribute").filter_map(|a| a.get_attr("name")).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
