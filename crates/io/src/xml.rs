//! Record extraction from engineering report XML.
//!
//! The reports are flat: a record element whose direct children each hold
//! one text field. Deeper nesting is skipped.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::SourceError;

/// Direct children of one record element, keyed by tag name.
pub type XmlRecord = HashMap<String, String>;

/// Collect every element named in `elements`, flattening its children.
///
/// Field text is trimmed; entity and character references are resolved.
/// An empty child (`<latitude/>`) yields an empty string.
pub fn extract_records(xml: &str, elements: &[&str]) -> Result<Vec<XmlRecord>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    let mut records = Vec::new();
    let mut current: Option<XmlRecord> = None;
    // Depth below the record element: 1 = field, 2+ = ignored nesting.
    let mut depth = 0usize;
    let mut field: Option<String> = None;
    let mut value = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if current.is_some() {
                    depth += 1;
                    if depth == 1 {
                        field = Some(name);
                        value.clear();
                    }
                } else if elements.contains(&name.as_str()) {
                    current = Some(XmlRecord::new());
                    depth = 0;
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match current.as_mut() {
                    Some(record) if depth == 0 => {
                        record.insert(name, String::new());
                    }
                    Some(_) => {}
                    None if elements.contains(&name.as_str()) => records.push(XmlRecord::new()),
                    None => {}
                }
            }
            Ok(Event::Text(ref e)) if depth == 1 => {
                value.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::CData(e)) if depth == 1 => {
                value.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::GeneralRef(ref e)) if depth == 1 => {
                let name = String::from_utf8_lossy(e.as_ref()).to_string();
                match resolve_reference(&name) {
                    Some(c) => value.push(c),
                    None => {
                        // Unknown entity: keep it verbatim
                        value.push('&');
                        value.push_str(&name);
                        value.push(';');
                    }
                }
            }
            Ok(Event::End(_)) if current.is_some() => {
                if depth == 0 {
                    records.extend(current.take());
                } else {
                    if depth == 1 {
                        if let (Some(record), Some(name)) = (current.as_mut(), field.take()) {
                            record.insert(name, value.trim().to_string());
                        }
                    }
                    depth -= 1;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SourceError::Xml(format!(
                    "at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(records)
}

/// Field value of a record, or `""` when the child is absent.
pub fn field<'a>(record: &'a XmlRecord, name: &str) -> &'a str {
    record.get(name).map(String::as_str).unwrap_or("")
}

/// Resolve the 5 predefined XML entities and numeric character references.
fn resolve_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let n = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(n)
        }
    }
}
