use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::errors::{InspectorError, InspectorResult};
use crate::hierarchy::node::UiNode;

/// An element whose end tag has not been seen yet.
struct OpenElement {
    tag: String,
    properties: BTreeMap<String, String>,
    children: Vec<UiNode>,
}

/// Parses a hierarchy dump into a node tree.
///
/// Every element becomes a node, including the `<hierarchy>` wrapper that
/// uiautomator emits, which ends up as the depth-0 root. Attribute values are
/// kept verbatim (after entity unescaping). Text content is ignored.
pub fn parse(text: &str) -> InspectorResult<UiNode> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<UiNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(multiple_roots(&reader));
                }
                stack.push(OpenElement {
                    tag: tag_name(e),
                    properties: attributes(e, &reader)?,
                    children: Vec::new(),
                });
            }
            Ok(Event::Empty(ref e)) => {
                let node = UiNode::new(tag_name(e), stack.len(), attributes(e, &reader)?);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None if root.is_none() => root = Some(node),
                    None => return Err(multiple_roots(&reader)),
                }
            }
            Ok(Event::End(_)) => {
                let Some(open) = stack.pop() else {
                    return Err(InspectorError::Parse(format!(
                        "unexpected end tag at byte {}",
                        reader.buffer_position()
                    )));
                };
                let node =
                    UiNode::new(open.tag, stack.len(), open.properties).with_children(open.children);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(InspectorError::Parse(format!(
                    "XML error at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(InspectorError::Parse(format!(
            "unclosed element <{}>",
            open.tag
        )));
    }

    let root = root.ok_or_else(|| InspectorError::Parse("no root element".to_string()))?;
    tracing::debug!(nodes = root.node_count(), root = %root.tag, "hierarchy parsed");
    Ok(root)
}

fn tag_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn attributes(e: &BytesStart, reader: &Reader<&[u8]>) -> InspectorResult<BTreeMap<String, String>> {
    let mut properties = BTreeMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| {
            InspectorError::Parse(format!(
                "bad attribute at byte {}: {}",
                reader.buffer_position(),
                err
            ))
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| InspectorError::Parse(format!("bad value for '{key}': {err}")))?
            .to_string();
        properties.insert(key, value);
    }
    Ok(properties)
}

fn multiple_roots(reader: &Reader<&[u8]>) -> InspectorError {
    InspectorError::Parse(format!(
        "second root element at byte {}",
        reader.buffer_position()
    ))
}
