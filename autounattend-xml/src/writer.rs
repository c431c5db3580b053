use crate::{Document, DocumentError, NodeId, WCM_NAMESPACE, XSI_NAMESPACE};
use quick_xml::{
    Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::{fs::File, io::Write, path::Path};
use tracing::debug;

/// Serialization settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriterOptions {
    /// Number of spaces per nesting level. Zero disables pretty printing.
    pub indent: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// Write the document as UTF-8 XML with a declaration. Every `<component>`
/// declares the `wcm` and `xsi` namespaces.
pub fn write<W: Write>(
    document: &Document,
    output: W,
    options: &WriterOptions,
) -> Result<(), DocumentError> {
    let root = document.root().ok_or(DocumentError::MissingRoot)?;

    let mut writer = if options.indent > 0 {
        Writer::new_with_indent(output, b' ', options.indent)
    } else {
        Writer::new(output)
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    write_element(document, root, &mut writer)?;
    writer.get_mut().write_all(b"\n")?;
    Ok(())
}

fn write_element<W: Write>(
    document: &Document,
    id: NodeId,
    writer: &mut Writer<W>,
) -> Result<(), DocumentError> {
    let element = &document[id];

    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if element.name == "component" {
        if element.attribute("xmlns:wcm").is_none() {
            start.push_attribute(("xmlns:wcm", WCM_NAMESPACE));
        }
        if element.attribute("xmlns:xsi").is_none() {
            start.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
        }
    }

    let text = element.trimmed_text();
    if element.children.is_empty() && text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    }
    for &child in &element.children {
        write_element(document, child, writer)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

/// Serialize the document into a string.
pub fn to_string(document: &Document, options: &WriterOptions) -> Result<String, DocumentError> {
    let mut buffer = Vec::new();
    write(document, &mut buffer, options)?;

    // The writer only ever receives UTF-8 input
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

impl Document {
    /// Write the document to the given file.
    pub fn save(&self, path: impl AsRef<Path>, options: &WriterOptions) -> Result<(), DocumentError> {
        let path = path.as_ref();
        debug!(path = ?path, "Saving answer file");
        write(self, File::create(path)?, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Architecture, Element, Pass};

    fn sample() -> Document {
        let mut document = Document::with_root(Architecture::Amd64).unwrap();
        let component = document
            .get_or_create_component(Pass::OobeSystem, "Microsoft-Windows-Shell-Setup")
            .unwrap();
        let commands = document.get_or_create_child(component, "FirstLogonCommands");
        let command = document.append(
            commands,
            Element::new("SynchronousCommand").with_attribute("wcm:action", "add"),
        );
        document.add_value(command, "Order", 1);
        document.add_element(
            command,
            "CommandLine",
            Some(r#"reg add "HKCU\Software" /v A /t REG_DWORD /d 0 /f && echo <done>"#),
        );
        document
    }

    #[test]
    fn writes_declaration_and_namespaces() {
        let xml = to_string(&sample(), &WriterOptions::default()).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains(r#"<unattend xmlns="urn:schemas-microsoft-com:unattend">"#));
        assert!(xml.contains(r#"<settings pass="oobeSystem">"#));
        assert!(xml.contains(
            r#"<component name="Microsoft-Windows-Shell-Setup" processorArchitecture="amd64" publicKeyToken="31bf3856ad364e35" language="neutral" versionScope="nonSxS" xmlns:wcm="http://schemas.microsoft.com/WMIConfig/2002/State" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
        ));
        assert!(xml.contains(r#"<SynchronousCommand wcm:action="add">"#));
        assert!(xml.ends_with("</unattend>\n"));
    }

    #[test]
    fn text_is_escaped_but_quotes_are_kept() {
        let xml = to_string(&sample(), &WriterOptions::default()).unwrap();

        assert!(xml.contains(
            r#"<CommandLine>reg add "HKCU\Software" /v A /t REG_DWORD /d 0 /f &amp;&amp; echo &lt;done&gt;</CommandLine>"#
        ));
    }

    #[test]
    fn indentation_is_configurable() {
        let two = to_string(&sample(), &WriterOptions { indent: 2 }).unwrap();
        let four = to_string(&sample(), &WriterOptions { indent: 4 }).unwrap();
        let flat = to_string(&sample(), &WriterOptions { indent: 0 }).unwrap();

        assert!(two.contains("\n  <settings"));
        assert!(four.contains("\n    <settings"));
        assert!(!flat.contains("\n  <settings"));
        assert!(two.contains("<Order>1</Order>"));
    }

    #[test]
    fn save_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("autounattend.xml");

        sample().save(&path, &WriterOptions::default()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("FirstLogonCommands"));
    }
}
