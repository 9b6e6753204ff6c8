//! XMLTV serialization of [`Tv`].

use std::io::Write;

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::document::{Tv, XmltvChannel, XmltvProgramme};
use crate::time::format_xmltv_time;

/// Language of every display name, title and description.
const CONTENT_LANG: &str = "th";

/// Writes `<name lang="th">text</name>`.
fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    let mut start = BytesStart::new(name);
    start.push_attribute(("lang", CONTENT_LANG));
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_channel<W: Write>(writer: &mut Writer<W>, channel: &XmltvChannel) -> Result<()> {
    let mut start = BytesStart::new("channel");
    start.push_attribute(("id", channel.id.as_str()));
    writer.write_event(Event::Start(start))?;

    for name in &channel.display_names {
        write_text_element(writer, "display-name", name)?;
    }

    if let Some(src) = &channel.icon_src {
        let mut icon = BytesStart::new("icon");
        icon.push_attribute(("src", src.as_str()));
        writer.write_event(Event::Empty(icon))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    Ok(())
}

fn write_programme<W: Write>(writer: &mut Writer<W>, programme: &XmltvProgramme) -> Result<()> {
    let start_time = format_xmltv_time(&programme.start);
    let stop_time = format_xmltv_time(&programme.stop);

    let mut start = BytesStart::new("programme");
    start.push_attribute(("channel", programme.channel.as_str()));
    start.push_attribute(("start", start_time.as_str()));
    start.push_attribute(("stop", stop_time.as_str()));
    writer.write_event(Event::Start(start))?;

    write_text_element(writer, "title", &programme.title)?;
    if let Some(desc) = &programme.desc {
        write_text_element(writer, "desc", desc)?;
    }

    for subtitles in &programme.subtitles {
        let mut element = BytesStart::new("subtitles");
        element.push_attribute(("type", subtitles.xmltv_type()));
        writer.write_event(Event::Empty(element))?;
    }

    writer.write_event(Event::End(BytesEnd::new("programme")))?;
    Ok(())
}

impl Tv {
    /// Serializes the document as UTF-8 XMLTV.
    ///
    /// Output is an XML declaration followed by a compact (non-indented)
    /// `<tv>` element and a trailing newline. Channels precede programmes.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = Writer::new(out);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.get_mut().write_all(b"\n")?;

        let mut root = BytesStart::new("tv");
        root.push_attribute(("source-info-name", self.source.source_info_name.as_str()));
        root.push_attribute(("source-info-url", self.source.source_info_url.as_str()));
        root.push_attribute((
            "generator-info-name",
            self.source.generator_info_name.as_str(),
        ));
        root.push_attribute((
            "generator-info-url",
            self.source.generator_info_url.as_str(),
        ));
        writer.write_event(Event::Start(root))?;

        for channel in &self.channels {
            write_channel(&mut writer, channel)
                .with_context(|| format!("failed to write channel {}", channel.id))?;
        }
        for programme in &self.programmes {
            write_programme(&mut writer, programme)
                .with_context(|| format!("failed to write programme on {}", programme.channel))?;
        }

        writer.write_event(Event::End(BytesEnd::new("tv")))?;
        writer.get_mut().write_all(b"\n")?;
        writer.get_mut().flush()?;
        Ok(())
    }

    /// Serializes the document into a `String`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        String::from_utf8(buf).context("XMLTV output is not valid UTF-8")
    }
}
