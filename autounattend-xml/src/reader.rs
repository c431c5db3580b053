use crate::{Architecture, Document, DocumentError, Element, NodeId};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use std::{path::Path, str::FromStr};
use tracing::debug;

fn element_from(start: &BytesStart) -> Result<Element, DocumentError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name);

    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();

        // Namespace declarations on components are emitted by the writer
        if element.name == "component" && (key == "xmlns:wcm" || key == "xmlns:xsi") {
            continue;
        }
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Attach a parsed element under the innermost open element, or make it the
/// root. A document has exactly one top-level element.
fn attach(
    document: &mut Document,
    stack: &[NodeId],
    element: Element,
) -> Result<NodeId, DocumentError> {
    match stack.last() {
        Some(&parent) => Ok(document.append(parent, element)),
        None if document.root().is_some() => Err(DocumentError::RootExists),
        None => Ok(document.set_root(element)),
    }
}

impl Document {
    /// Parse an existing answer file. The root element is accepted whatever
    /// its name so that malformed documents can still be validated.
    pub fn parse(xml: &str) -> Result<Document, DocumentError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut document = Document::new(Architecture::default());
        let mut stack: Vec<NodeId> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let id = attach(&mut document, &stack, element_from(&start)?)?;
                    stack.push(id);
                }
                Event::Empty(start) => {
                    attach(&mut document, &stack, element_from(&start)?)?;
                }
                Event::Text(text) => {
                    if let Some(&current) = stack.last() {
                        let text = text.unescape()?;
                        document[current]
                            .text
                            .get_or_insert_with(String::new)
                            .push_str(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(&current) = stack.last() {
                        let data = data.into_inner();
                        document[current]
                            .text
                            .get_or_insert_with(String::new)
                            .push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::End(end) => {
                    if stack.pop().is_none() {
                        return Err(DocumentError::UnbalancedTag(
                            String::from_utf8_lossy(end.name().as_ref()).into_owned(),
                        ));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let architecture = document
            .find_all("component")
            .into_iter()
            .find_map(|id| document[id].attribute("processorArchitecture"))
            .and_then(|value| Architecture::from_str(value).ok())
            .unwrap_or_default();
        document.set_architecture(architecture);

        Ok(document)
    }

    /// Read and parse an answer file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Document, DocumentError> {
        let path = path.as_ref();
        debug!(path = ?path, "Loading answer file");
        Document::parse(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Pass, WriterOptions, writer};

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<unattend xmlns="urn:schemas-microsoft-com:unattend">
  <settings pass="specialize">
    <component name="Microsoft-Windows-Shell-Setup" processorArchitecture="arm64" publicKeyToken="31bf3856ad364e35" language="neutral" versionScope="nonSxS" xmlns:wcm="http://schemas.microsoft.com/WMIConfig/2002/State" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
      <ComputerName>DESK-01</ComputerName>
      <Empty/>
    </component>
  </settings>
</unattend>
"#;

    #[test]
    fn parse_sample() {
        let document = Document::parse(SAMPLE).unwrap();

        assert_eq!(document.architecture(), Architecture::Arm64);
        let component = document
            .component(Pass::Specialize, "Microsoft-Windows-Shell-Setup")
            .unwrap();
        assert_eq!(document.child_text(component, "ComputerName"), Some("DESK-01"));
        assert!(document[component].attribute("xmlns:wcm").is_none());
        assert!(document.find_child(component, "Empty").is_some());
    }

    #[test]
    fn parse_written_output() {
        let document = Document::parse(SAMPLE).unwrap();
        let xml = writer::to_string(&document, &WriterOptions::default()).unwrap();

        assert_eq!(Document::parse(&xml).unwrap(), document);
        assert_eq!(xml.matches("xmlns:wcm").count(), 1);
    }

    #[test]
    fn unescapes_text() {
        let document =
            Document::parse("<unattend><CommandLine>a &amp;&amp; b &quot;c&quot;</CommandLine></unattend>")
                .unwrap();
        let root = document.root().unwrap();

        assert_eq!(document.child_text(root, "CommandLine"), Some(r#"a && b "c""#));
    }

    #[test]
    fn rejects_malformed_xml() {
        assert!(Document::parse("<unattend><settings></unattend>").is_err());
    }

    #[test]
    fn rejects_second_top_level_element() {
        let result = Document::parse(
            r#"<unattend xmlns="urn:schemas-microsoft-com:unattend"/><unattend/>"#,
        );

        assert!(matches!(result, Err(DocumentError::RootExists)));
    }
}
