use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::Element;
use crate::error::{LibraryError, LibraryResult};

/// 解析服务器响应，返回根容器（`MediaContainer`）的直接子元素
pub fn parse_container(xml: &str) -> LibraryResult<Vec<Element>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(element_from(&start)?);
            }
            Event::Empty(start) => {
                let elem = element_from(&start)?;
                attach(&mut stack, &mut root, elem);
            }
            Event::End(_) => {
                let elem = stack
                    .pop()
                    .ok_or_else(|| LibraryError::Parse("unbalanced closing tag".to_string()))?;
                attach(&mut stack, &mut root, elem);
            }
            Event::Eof => break,
            // 文本、注释、声明等对条目解析没有意义
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(LibraryError::Parse("unexpected end of document".to_string()));
    }

    Ok(root.map(|r| r.children).unwrap_or_default())
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, elem: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(elem),
        None => {
            if root.is_none() {
                *root = Some(elem);
            }
        }
    }
}

fn element_from(start: &BytesStart<'_>) -> LibraryResult<Element> {
    let mut elem = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| LibraryError::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        elem.attributes.insert(key, value);
    }
    Ok(elem)
}
