// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::dom::{DomTree, NodeId};
use crate::errors::ProjectionError;
use crate::traits::DocumentParser;

/// Parses UTF-8 XML text with `quick-xml`.
///
/// Whitespace-only text between elements is dropped, CDATA sections become plain
/// text, comments and processing instructions are kept. The XML declaration and
/// DOCTYPE are not represented in the tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlParser;

impl DocumentParser for XmlParser {
    fn parse(&self, text: &str) -> Result<DomTree, ProjectionError> {
        let mut reader = Reader::from_str(text);
        let mut tree = DomTree::new();
        let mut open: Vec<NodeId> = vec![tree.root()];

        loop {
            let position = reader.buffer_position();
            let parse_error =
                |e: &dyn std::fmt::Display| ProjectionError::Parse(format!("{} (at byte {})", e, position));
            let current = *open.last().unwrap_or(&NodeId::ROOT);

            match reader.read_event().map_err(|e| parse_error(&e))? {
                Event::Start(start) => {
                    let element = element_from(&mut tree, &start).map_err(|e| parse_error(&e))?;
                    attach(&mut tree, current, element)?;
                    open.push(element);
                }
                Event::Empty(start) => {
                    let element = element_from(&mut tree, &start).map_err(|e| parse_error(&e))?;
                    attach(&mut tree, current, element)?;
                }
                Event::End(_) => {
                    if open.len() <= 1 {
                        return Err(parse_error(&"unexpected closing tag"));
                    }
                    open.pop();
                }
                Event::Text(content) => {
                    let content = content.unescape().map_err(|e| parse_error(&e))?;
                    if current == NodeId::ROOT || content.trim().is_empty() {
                        continue;
                    }
                    let node = tree.create_text(&content);
                    tree.append_child(current, node);
                }
                Event::CData(content) => {
                    let content = String::from_utf8_lossy(&content.into_inner()).into_owned();
                    let node = tree.create_text(&content);
                    tree.append_child(current, node);
                }
                Event::Comment(content) => {
                    let content = String::from_utf8_lossy(&content).into_owned();
                    let node = tree.create_comment(&content);
                    tree.append_child(current, node);
                }
                Event::PI(pi) => {
                    let target = String::from_utf8_lossy(pi.target()).into_owned();
                    let data = String::from_utf8_lossy(pi.content()).trim().to_string();
                    let node = tree.create_processing_instruction(&target, &data);
                    tree.append_child(current, node);
                }
                Event::Decl(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if open.len() > 1 {
            return Err(ProjectionError::Parse(
                "unexpected end of input: unclosed element".to_string(),
            ));
        }
        Ok(tree)
    }
}

fn element_from(tree: &mut DomTree, start: &BytesStart<'_>) -> Result<NodeId, quick_xml::Error> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let element = tree.create_element(&name);
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?;
        tree.set_attribute(element, &key, &value);
    }
    Ok(element)
}

fn attach(tree: &mut DomTree, parent: NodeId, element: NodeId) -> Result<(), ProjectionError> {
    if parent == NodeId::ROOT && tree.document_element().is_some() {
        return Err(ProjectionError::Parse(
            "document has more than one root element".to_string(),
        ));
    }
    tree.append_child(parent, element);
    Ok(())
}
