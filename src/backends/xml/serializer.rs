// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use quick_xml::escape::escape;

use crate::config::consts::XML_DECLARATION;
use crate::dom::{DomTree, NodeData, NodeId};
use crate::traits::DocumentSerializer;

/// Renders nodes as compact XML.
///
/// The document node renders with an XML declaration, every other node renders
/// just its own markup. Attributes render as `name="value"`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlSerializer;

impl DocumentSerializer for XmlSerializer {
    fn render(&self, tree: &DomTree, node: NodeId) -> String {
        let mut out = String::new();
        if matches!(tree.get(node).map(|n| &n.data), Some(NodeData::Document)) {
            out.push_str(XML_DECLARATION);
        }
        write_node(tree, node, &mut out);
        out
    }
}

fn write_node(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.data {
        NodeData::Document => {
            for child in &node.children {
                write_node(tree, *child, out);
            }
        }
        NodeData::Element { name } => {
            out.push('<');
            out.push_str(name);
            for attribute in &node.attributes {
                if let Some(NodeData::Attribute { name, value }) = tree.get(*attribute).map(|a| &a.data) {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value.as_str()));
                    out.push('"');
                }
            }
            if node.children.is_empty() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in &node.children {
                write_node(tree, *child, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        NodeData::Attribute { name, value } => {
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        NodeData::Text(text) => out.push_str(&escape(text.as_str())),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::ProcessingInstruction { target, data } => {
            out.push_str("<?");
            out.push_str(target);
            if !data.is_empty() {
                out.push(' ');
                out.push_str(data);
            }
            out.push_str("?>");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::xml::XmlParser;
    use crate::traits::DocumentParser;

    #[test]
    fn test_render_element_subtree() {
        let tree = XmlParser
            .parse(r#"<a id="1"><b>x &amp; y</b><c/><!--note--></a>"#)
            .unwrap();
        let a = tree.document_element().unwrap();
        assert_eq!(
            XmlSerializer.render(&tree, a),
            r#"<a id="1"><b>x &amp; y</b><c/><!--note--></a>"#
        );
    }

    #[test]
    fn test_render_document_has_declaration() {
        let tree = XmlParser.parse("<a/>").unwrap();
        let text = XmlSerializer.render(&tree, tree.root());
        assert_eq!(text, format!("{}<a/>", XML_DECLARATION));
    }

    #[test]
    fn test_render_reparses_to_equal_tree() {
        let source = r#"<list><item k="&quot;q&quot;">1 &lt; 2</item><item/></list>"#;
        let first = XmlParser.parse(source).unwrap();
        let rendered = XmlSerializer.render(&first, first.root());
        let second = XmlParser.parse(&rendered).unwrap();
        assert!(crate::dom::nodes_are_equal(
            &first,
            first.root(),
            &second,
            second.root()
        ));
    }
}
