use crate::error::{Result, SourceError};
use scraper::{Html, Selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupMode {
    Html,
    Xml,
}

/// A fetched page, parsed on demand by the query methods.
///
/// Parsed trees are not `Send`, so they never outlive a single query call.
#[derive(Debug, Clone)]
pub struct Document {
    url: String,
    mode: MarkupMode,
    body: String,
}

/// Text content of one XML element's descendants, keyed by local-name path
/// relative to the element (`"title"`, `"author/name"`). Namespace prefixes are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlRecord {
    fields: Vec<(String, String)>,
}

impl XmlRecord {
    /// First field at `path`, in document order
    pub fn field(&self, path: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == path)
            .map(|(_, value)| value.as_str())
    }

    pub fn field_or_empty(&self, path: &str) -> String {
        self.field(path).unwrap_or_default().to_string()
    }
}

impl Document {
    pub fn new(url: impl Into<String>, mode: MarkupMode, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode,
            body: body.into(),
        }
    }

    pub fn html(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(url, MarkupMode::Html, body)
    }

    pub fn xml(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(url, MarkupMode::Xml, body)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn mode(&self) -> MarkupMode {
        self.mode
    }

    fn require_mode(&self, expected: MarkupMode) -> Result<()> {
        if self.mode != expected {
            return Err(SourceError::fetch(
                &self.url,
                format!("document was fetched as {:?}, not {:?}", self.mode, expected),
            ));
        }
        Ok(())
    }

    /// `href` values of all elements matching a CSS selector, in document order
    pub fn links(&self, selector: &str) -> Result<Vec<String>> {
        self.require_mode(MarkupMode::Html)?;
        let selector = Selector::parse(selector)
            .map_err(|e| SourceError::fetch(&self.url, format!("invalid selector '{}': {}", selector, e)))?;
        let html = Html::parse_document(&self.body);

        Ok(html
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(|href| href.trim().to_string())
            .collect())
    }

    /// Every element whose local name is `name`, flattened into an [`XmlRecord`]
    pub fn xml_records(&self, name: &str) -> Result<Vec<XmlRecord>> {
        self.require_mode(MarkupMode::Xml)?;
        let doc = roxmltree::Document::parse(&self.body)
            .map_err(|e| SourceError::fetch(&self.url, format!("malformed XML: {}", e)))?;

        Ok(doc
            .descendants()
            .filter(|node| node.is_element() && node.tag_name().name() == name)
            .map(flatten_element)
            .collect())
    }
}

fn flatten_element(element: roxmltree::Node<'_, '_>) -> XmlRecord {
    let mut fields = Vec::new();
    collect_fields(element, "", &mut fields);
    XmlRecord { fields }
}

fn collect_fields(node: roxmltree::Node<'_, '_>, prefix: &str, fields: &mut Vec<(String, String)>) {
    for child in node.children().filter(|c| c.is_element()) {
        let path = if prefix.is_empty() {
            child.tag_name().name().to_string()
        } else {
            format!("{}/{}", prefix, child.tag_name().name())
        };
        fields.push((path.clone(), element_text(child)));
        collect_fields(child, &path, fields);
    }
}

fn element_text(node: roxmltree::Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}
