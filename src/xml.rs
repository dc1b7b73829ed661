//! Writes render templates and their attribute bags as Android layout XML.

use crate::error::PipelineError;
use crate::pipeline::OutputOptions;
use anchorage_layout::{Namespace, RenderOutput, RenderTemplate, TemplateKind};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::io::{self, Write};

/// One written layout resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutFile {
    /// Resource name, without the `.xml` extension.
    pub name: String,
    pub contents: String,
}

/// Layout resource name for an element moved to its own file.
fn include_name(output: &RenderOutput, template: &RenderTemplate) -> String {
    let node = output.tree().node(template.node);
    let hint = node
        .dataset()
        .find(|(name, _)| *name == "include")
        .map(|(_, value)| value.to_string())
        .unwrap_or_else(|| format!("include_{}", template.node.index()));
    let mut name: String = hint
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
        name.insert_str(0, "layout_");
    }
    name
}

struct LayoutWriter<'a> {
    output: &'a RenderOutput,
    /// Elements found while writing that go to their own file.
    pending: Vec<(String, RenderTemplate)>,
}

impl<'a> LayoutWriter<'a> {
    fn namespaces(start: &mut BytesStart<'_>) {
        for namespace in [Namespace::Android, Namespace::App] {
            start.push_attribute((format!("xmlns:{}", namespace.prefix()).as_str(), namespace.uri()));
        }
    }

    fn write_file<W: Write>(
        &mut self,
        writer: &mut Writer<W>,
        template: &RenderTemplate,
    ) -> Result<(), PipelineError> {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        if template.kind == TemplateKind::Merge {
            let mut start = BytesStart::new("merge");
            Self::namespaces(&mut start);
            let children = self.output.children(template.node);
            if children.is_empty() {
                writer.write_event(Event::Empty(start))?;
                return Ok(());
            }
            writer.write_event(Event::Start(start))?;
            for child in children {
                self.write_element(writer, child, false)?;
            }
            writer.write_event(Event::End(BytesEnd::new("merge")))?;
            return Ok(());
        }
        self.write_element(writer, template, true)
    }

    fn write_element<W: Write>(
        &mut self,
        writer: &mut Writer<W>,
        template: &RenderTemplate,
        file_root: bool,
    ) -> Result<(), PipelineError> {
        if !file_root && template.kind != TemplateKind::Xml {
            let name = include_name(self.output, template);
            let mut include = BytesStart::new("include");
            include.push_attribute(("layout", format!("@layout/{}", name).as_str()));
            writer.write_event(Event::Empty(include))?;
            log::debug!("Moved {} to layout '{}'", template.node, name);
            self.pending.push((name, template.clone()));
            return Ok(());
        }

        let mut start = BytesStart::new(template.control_name.as_str());
        if file_root {
            Self::namespaces(&mut start);
        }
        for (key, value) in self.output.attributes(template.node).iter() {
            start.push_attribute((key.qualified_name().as_str(), value));
        }
        let children = self.output.children(template.node);
        if children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(start))?;
        for child in children {
            self.write_element(writer, child, false)?;
        }
        writer.write_event(Event::End(BytesEnd::new(template.control_name.as_str())))?;
        Ok(())
    }
}

fn writer_for<W: Write>(inner: W, options: &OutputOptions) -> Writer<W> {
    if options.pretty_print {
        Writer::new_with_indent(inner, b' ', options.indent)
    } else {
        Writer::new(inner)
    }
}

/// Writes the main layout to `writer`. Elements marked with `data-include`
/// are replaced by `<include>` tags; their names and templates are returned
/// so the caller can write them with [`write_template`].
pub fn write_layout<W: Write>(
    output: &RenderOutput,
    writer: W,
    options: &OutputOptions,
) -> Result<Vec<(String, RenderTemplate)>, PipelineError> {
    let root = output
        .root_template()
        .ok_or_else(|| PipelineError::Document("Nothing was rendered".to_string()))?;
    let mut root = root.clone();
    root.kind = TemplateKind::Xml;
    write_template(output, &root, writer, options)
}

/// Writes one template as the root of a layout file.
pub fn write_template<W: Write>(
    output: &RenderOutput,
    template: &RenderTemplate,
    writer: W,
    options: &OutputOptions,
) -> Result<Vec<(String, RenderTemplate)>, PipelineError> {
    let mut layout = LayoutWriter {
        output,
        pending: Vec::new(),
    };
    let mut writer = writer_for(writer, options);
    layout.write_file(&mut writer, template)?;
    writer.get_mut().write_all(b"\n")?;
    Ok(layout.pending)
}

fn to_string(bytes: Vec<u8>) -> Result<String, PipelineError> {
    String::from_utf8(bytes).map_err(|e| PipelineError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Writes the main layout under `name` followed by every included layout.
pub fn write_layouts(output: &RenderOutput, name: &str, options: &OutputOptions) -> Result<Vec<LayoutFile>, PipelineError> {
    let mut buffer = Vec::new();
    let mut pending = write_layout(output, &mut buffer, options)?;
    let mut files = vec![LayoutFile {
        name: name.to_string(),
        contents: to_string(buffer)?,
    }];
    pending.reverse();
    while let Some((include, template)) = pending.pop() {
        if files.iter().any(|f| f.name == include) {
            log::warn!("Layout '{}' is included more than once, keeping the first", include);
            continue;
        }
        let mut buffer = Vec::new();
        let mut nested = write_template(output, &template, &mut buffer, options)?;
        files.push(LayoutFile {
            name: include,
            contents: to_string(buffer)?,
        });
        nested.reverse();
        pending.extend(nested);
    }
    Ok(files)
}
