//! XML (`newrelic.config`, `newrelic.xml`).
//!
//! Elements map to keys. Attributes become `-name` keys, and text that sits
//! next to attributes or child elements becomes `#text`. Repeated sibling
//! elements collapse into a list. All values are strings.

use roxmltree::{Document, Node, ParsingOptions};

use super::{build_tree, GenericValue, ValidateBlob};
use crate::error::ParseError;

pub fn parse(text: &str) -> Result<ValidateBlob, ParseError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(text, options).map_err(|e| ParseError::Xml {
        message: e.to_string(),
    })?;

    let root = document.root_element();
    let value = GenericValue::map([(root.tag_name().name().to_string(), element(root))]);
    Ok(build_tree(value))
}

fn element(node: Node<'_, '_>) -> GenericValue {
    let mut entries: Vec<(String, GenericValue)> = node
        .attributes()
        .map(|attr| (format!("-{}", attr.name()), GenericValue::string(attr.value())))
        .collect();
    let has_attributes = !entries.is_empty();

    let mut has_children = false;
    for child in node.children().filter(Node::is_element) {
        has_children = true;
        let name = child.tag_name().name().to_string();
        let value = element(child);
        match entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, GenericValue::List(items))) => items.push(value),
            Some((_, existing)) => {
                let first = std::mem::replace(existing, GenericValue::List(Vec::new()));
                *existing = GenericValue::List(vec![first, value]);
            }
            None => entries.push((name, value)),
        }
    }

    let text: String = node
        .children()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect();
    let text = text.trim();

    if !has_attributes && !has_children {
        return GenericValue::string(text);
    }
    if !text.is_empty() {
        entries.push(("#text".to_string(), GenericValue::string(text)));
    }
    GenericValue::map(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_siblings_become_a_list() {
        let tree =
            parse("<ignoreStatusCodes><code>401</code><code>404</code></ignoreStatusCodes>").unwrap();
        let code = tree.find_key("code");
        assert_eq!(code.len(), 1);
        assert_eq!(code[0].path, "/ignoreStatusCodes");
        let values: Vec<_> = code[0].children.iter().map(|c| (c.key.as_str(), c.value())).collect();
        assert_eq!(values, vec![("0", "401".to_string()), ("1", "404".to_string())]);
    }

    #[test]
    fn attributes_use_dash_prefix() {
        let xml = r#"<?xml version="1.0"?>
<configuration xmlns="urn:newrelic-config" agentEnabled="true">
  <service licenseKey="abc123" />
  <application>
    <name>My Application</name>
  </application>
  <log level="info"/>
</configuration>"#;
        let tree = parse(xml).unwrap();
        assert_eq!(
            tree.find_key_by_path("/configuration/service/-licenseKey").unwrap().value(),
            "abc123"
        );
        assert_eq!(
            tree.find_key_by_path("/configuration/-agentEnabled").unwrap().value(),
            "true"
        );
        assert_eq!(tree.find_key("name")[0].value(), "My Application");
        assert_eq!(tree.find_key("-level")[0].path, "/configuration/log");
        insta::assert_snapshot!(tree.to_string(), @r"
/configuration/-agentEnabled: true
/configuration/application/name: My Application
/configuration/log/-level: info
/configuration/service/-licenseKey: abc123
");
    }

    #[test]
    fn mixed_text_goes_under_hash_text() {
        let tree = parse(r#"<root><item kind="a">hello</item></root>"#).unwrap();
        assert_eq!(tree.find_key_by_path("/root/item/#text").unwrap().value(), "hello");
        assert_eq!(tree.find_key_by_path("/root/item/-kind").unwrap().value(), "a");
    }

    #[test]
    fn empty_element_is_empty_string() {
        let tree = parse("<root><proxy/></root>").unwrap();
        let proxy = tree.find_key("proxy")[0];
        assert!(proxy.is_leaf());
        assert_eq!(proxy.value(), "");
    }

    #[test]
    fn comments_are_ignored() {
        let tree = parse("<root><!-- note --><a>1</a></root>").unwrap();
        assert_eq!(tree.to_string(), "/root/a: 1\n");
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let err = parse("<root><a></root>").unwrap_err();
        assert!(matches!(err, ParseError::Xml { .. }));
    }
}
