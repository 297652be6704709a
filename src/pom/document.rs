//! Format-preserving POM document
//!
//! A POM is split into an ordered list of segments: literal text that is
//! passed through untouched, and located values (version fields) that can be
//! rewritten. Only the elements the release edits are indexed; everything
//! else is skipped as an opaque subtree, so a `<version>` nested inside
//! plugin configuration or a profile is never captured.
//!
//! ```text
//! <project>                                  ┐
//!   <version>                                ┘ Literal
//!            1.0-SNAPSHOT                      Located (own version)
//!                        </version> ...      ┐
//!   <dependency>...<version>                 ┘ Literal
//!                           ${core.version}    Located (dependency)
//!                                          </version>...</project>   Literal
//! ```

use std::fmt;
use std::ops::Range;

use quick_xml::events::Event;
use tracing::trace;

use crate::pom::cursor::{XmlCursor, local_name};
use crate::pom::error::DocumentError;
use crate::version::ModuleCoordinate;

/// Group used by Maven for plugins declared without a `<groupId>`
pub const DEFAULT_PLUGIN_GROUP: &str = "org.apache.maven.plugins";

/// A piece of the source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Located(LocatedValue),
}

/// Editable text together with its original location in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedValue {
    text: String,
    start_offset: usize,
    end_offset: usize,
}

impl LocatedValue {
    fn capture(source: &str, span: Range<usize>) -> Self {
        Self {
            text: source[span.clone()].to_string(),
            start_offset: span.start,
            end_offset: span.end,
        }
    }

    /// Current text of the value, including any whitespace found in the source
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current text without surrounding whitespace
    pub fn value(&self) -> &str {
        self.text.trim()
    }

    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    fn set(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

/// Section of the POM a reference was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// `project/dependencies`
    Dependencies,
    /// `project/dependencyManagement/dependencies`
    DependencyManagement,
    /// `project/build/plugins`
    Plugins,
    /// `project/build/pluginManagement/plugins`
    PluginManagement,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Dependencies => "dependencies",
            Section::DependencyManagement => "dependencyManagement",
            Section::Plugins => "plugins",
            Section::PluginManagement => "pluginManagement",
        }
    }

    pub fn is_plugin(&self) -> bool {
        matches!(self, Section::Plugins | Section::PluginManagement)
    }
}

/// Identifies one editable reference: where it was declared and what it points at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceKey {
    pub section: Section,
    pub coordinate: ModuleCoordinate,
}

impl ReferenceKey {
    pub fn new(section: Section, coordinate: ModuleCoordinate) -> Self {
        Self {
            section,
            coordinate,
        }
    }
}

impl fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.coordinate, self.section.as_str())
    }
}

/// The `<parent>` block of a POM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentBlock {
    pub group_id: String,
    pub artifact_id: String,
    version: Option<usize>,
}

impl ParentBlock {
    pub fn coordinate(&self) -> ModuleCoordinate {
        ModuleCoordinate::new(&self.group_id, &self.artifact_id)
    }
}

/// One `<dependency>` or `<plugin>` entry
#[derive(Debug, Clone, PartialEq, Eq)]
struct Reference {
    key: ReferenceKey,
    version: Option<usize>,
}

/// A parsed POM whose version fields can be rewritten in place
#[derive(Debug, Clone)]
pub struct PomDocument {
    segments: Vec<Segment>,
    group_id: Option<String>,
    artifact_id: Option<String>,
    own_version: Option<usize>,
    parent: Option<ParentBlock>,
    references: Vec<Reference>,
}

impl PomDocument {
    /// Parse a POM in a single pass
    pub fn parse(source: &str) -> Result<Self, DocumentError> {
        let mut scanner = Scanner::new(source);
        scanner.scan_document()?;
        Ok(scanner.finish())
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn artifact_id(&self) -> Option<&str> {
        self.artifact_id.as_deref()
    }

    pub fn own_version(&self) -> Option<&LocatedValue> {
        self.own_version.map(|index| self.located(index))
    }

    pub fn parent(&self) -> Option<&ParentBlock> {
        self.parent.as_ref()
    }

    pub fn parent_version(&self) -> Option<&LocatedValue> {
        self.parent
            .as_ref()
            .and_then(|parent| parent.version)
            .map(|index| self.located(index))
    }

    /// All declared references in document order, with their version if any.
    ///
    /// The position of an entry in this sequence is the handle passed to
    /// [`PomDocument::set_dependency_version`].
    pub fn references(&self) -> impl Iterator<Item = (&ReferenceKey, Option<&LocatedValue>)> {
        self.references
            .iter()
            .map(|reference| (&reference.key, reference.version.map(|i| self.located(i))))
    }

    pub fn set_own_version(&mut self, version: &str) -> Result<(), DocumentError> {
        let index = self.own_version.ok_or(DocumentError::MissingOwnVersion)?;
        self.located_mut(index).set(version);
        Ok(())
    }

    pub fn set_parent_version(&mut self, version: &str) -> Result<(), DocumentError> {
        let index = self
            .parent
            .as_ref()
            .and_then(|parent| parent.version)
            .ok_or(DocumentError::MissingParent)?;
        self.located_mut(index).set(version);
        Ok(())
    }

    /// Rewrite the version of one dependency or plugin entry.
    ///
    /// `entry` is the position of the entry in [`PomDocument::references`].
    /// Other entries with the same coordinate (a second classifier, say) are
    /// left alone.
    pub fn set_dependency_version(&mut self, entry: usize, version: &str) -> Result<(), DocumentError> {
        let index = self
            .references
            .get(entry)
            .and_then(|reference| reference.version)
            .ok_or(DocumentError::UnknownReference(entry))?;
        self.located_mut(index).set(version);
        Ok(())
    }

    /// Reassemble the document from its segments
    pub fn serialize(&self) -> String {
        let capacity = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.len(),
                Segment::Located(value) => value.text.len(),
            })
            .sum();
        let mut out = String::with_capacity(capacity);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Located(value) => out.push_str(&value.text),
            }
        }
        out
    }

    fn located(&self, index: usize) -> &LocatedValue {
        match &self.segments[index] {
            Segment::Located(value) => value,
            Segment::Literal(_) => unreachable!("index {index} does not point at a located value"),
        }
    }

    fn located_mut(&mut self, index: usize) -> &mut LocatedValue {
        match &mut self.segments[index] {
            Segment::Located(value) => value,
            Segment::Literal(_) => unreachable!("index {index} does not point at a located value"),
        }
    }
}

/// Coordinate and version fields collected inside a parent, dependency or plugin
#[derive(Default)]
struct EntryFields {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<usize>,
}

/// Selective recursive descent over the POM, building segments as it goes
struct Scanner<'a> {
    cursor: XmlCursor<'a>,
    segments: Vec<Segment>,
    /// Offset up to which the source has been turned into segments
    claimed: usize,
    group_id: Option<String>,
    artifact_id: Option<String>,
    own_version: Option<usize>,
    parent: Option<ParentBlock>,
    references: Vec<Reference>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            cursor: XmlCursor::new(source),
            segments: Vec::new(),
            claimed: 0,
            group_id: None,
            artifact_id: None,
            own_version: None,
            parent: None,
            references: Vec::new(),
        }
    }

    fn scan_document(&mut self) -> Result<(), DocumentError> {
        let mut seen_root = false;
        loop {
            match self.cursor.next()? {
                Event::Start(e) => {
                    let name = local_name(&e);
                    if seen_root || name != "project" {
                        return Err(DocumentError::NotAProject(name));
                    }
                    seen_root = true;
                    self.scan_project()?;
                }
                Event::Empty(e) => {
                    let name = local_name(&e);
                    if seen_root || name != "project" {
                        return Err(DocumentError::NotAProject(name));
                    }
                    seen_root = true;
                }
                Event::Eof if seen_root => return Ok(()),
                Event::Eof => return Err(DocumentError::UnexpectedEof("project".to_string())),
                _ => {}
            }
        }
    }

    fn scan_project(&mut self) -> Result<(), DocumentError> {
        loop {
            match self.cursor.next()? {
                Event::Start(e) => match local_name(&e).as_str() {
                    "groupId" => self.group_id = Some(self.cursor.leaf_text("groupId")?),
                    "artifactId" => self.artifact_id = Some(self.cursor.leaf_text("artifactId")?),
                    "version" => self.own_version = Some(self.capture("version")?),
                    "parent" => self.scan_parent()?,
                    "dependencies" => {
                        self.scan_entries("dependencies", "dependency", Section::Dependencies)?
                    }
                    "dependencyManagement" => self.scan_management(
                        "dependencyManagement",
                        "dependencies",
                        "dependency",
                        Section::DependencyManagement,
                    )?,
                    "build" => self.scan_build()?,
                    other => self.cursor.skip_element(other)?,
                },
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(DocumentError::UnexpectedEof("project".to_string())),
                _ => {}
            }
        }
    }

    fn scan_parent(&mut self) -> Result<(), DocumentError> {
        let fields = self.scan_entry_fields("parent")?;
        self.parent = Some(ParentBlock {
            group_id: fields.group_id.unwrap_or_default(),
            artifact_id: fields.artifact_id.unwrap_or_default(),
            version: fields.version,
        });
        Ok(())
    }

    fn scan_build(&mut self) -> Result<(), DocumentError> {
        loop {
            match self.cursor.next()? {
                Event::Start(e) => match local_name(&e).as_str() {
                    "plugins" => self.scan_entries("plugins", "plugin", Section::Plugins)?,
                    "pluginManagement" => self.scan_management(
                        "pluginManagement",
                        "plugins",
                        "plugin",
                        Section::PluginManagement,
                    )?,
                    other => self.cursor.skip_element(other)?,
                },
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(DocumentError::UnexpectedEof("build".to_string())),
                _ => {}
            }
        }
    }

    /// `<dependencyManagement><dependencies>` or `<pluginManagement><plugins>`
    fn scan_management(
        &mut self,
        wrapper: &str,
        collection: &str,
        entry: &str,
        section: Section,
    ) -> Result<(), DocumentError> {
        loop {
            match self.cursor.next()? {
                Event::Start(e) => {
                    let name = local_name(&e);
                    if name == collection {
                        self.scan_entries(collection, entry, section)?;
                    } else {
                        self.cursor.skip_element(&name)?;
                    }
                }
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(DocumentError::UnexpectedEof(wrapper.to_string())),
                _ => {}
            }
        }
    }

    fn scan_entries(
        &mut self,
        collection: &str,
        entry: &str,
        section: Section,
    ) -> Result<(), DocumentError> {
        loop {
            match self.cursor.next()? {
                Event::Start(e) => {
                    let name = local_name(&e);
                    if name == entry {
                        let fields = self.scan_entry_fields(entry)?;
                        self.push_reference(section, fields);
                    } else {
                        self.cursor.skip_element(&name)?;
                    }
                }
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(DocumentError::UnexpectedEof(collection.to_string())),
                _ => {}
            }
        }
    }

    fn scan_entry_fields(&mut self, entry: &str) -> Result<EntryFields, DocumentError> {
        let mut fields = EntryFields::default();
        loop {
            match self.cursor.next()? {
                Event::Start(e) => match local_name(&e).as_str() {
                    "groupId" => fields.group_id = Some(self.cursor.leaf_text("groupId")?),
                    "artifactId" => fields.artifact_id = Some(self.cursor.leaf_text("artifactId")?),
                    "version" => fields.version = Some(self.capture("version")?),
                    other => self.cursor.skip_element(other)?,
                },
                Event::End(_) => return Ok(fields),
                Event::Eof => return Err(DocumentError::UnexpectedEof(entry.to_string())),
                _ => {}
            }
        }
    }

    fn push_reference(&mut self, section: Section, fields: EntryFields) {
        let group_id = fields.group_id.unwrap_or_else(|| {
            if section.is_plugin() {
                DEFAULT_PLUGIN_GROUP.to_string()
            } else {
                String::new()
            }
        });
        let coordinate = ModuleCoordinate::new(group_id, fields.artifact_id.unwrap_or_default());
        trace!("Indexed {} in {}", coordinate, section.as_str());
        self.references.push(Reference {
            key: ReferenceKey::new(section, coordinate),
            version: fields.version,
        });
    }

    /// Turn the content of the element just opened into a located segment.
    ///
    /// Returns the index of the new segment.
    fn capture(&mut self, name: &str) -> Result<usize, DocumentError> {
        let span = self.cursor.leaf(name)?.span;
        let source = self.cursor.source();
        if span.start > self.claimed {
            self.segments
                .push(Segment::Literal(source[self.claimed..span.start].to_string()));
        }
        let value = LocatedValue::capture(source, span.clone());
        debug_assert_eq!(value.text, &source[value.start_offset..value.end_offset]);
        self.segments.push(Segment::Located(value));
        self.claimed = span.end;
        Ok(self.segments.len() - 1)
    }

    fn finish(mut self) -> PomDocument {
        let source = self.cursor.source();
        if self.claimed < source.len() {
            self.segments
                .push(Segment::Literal(source[self.claimed..].to_string()));
        }
        PomDocument {
            segments: self.segments,
            group_id: self.group_id,
            artifact_id: self.artifact_id,
            own_version: self.own_version,
            parent: self.parent,
            references: self.references,
        }
    }
}
