//! Declared model of a POM
//!
//! What a module declares about itself before any inheritance: identity,
//! parent, dependency and plugin references, and `<properties>`. The
//! release engine reads this model; it never edits it.

use quick_xml::events::Event;

use crate::pom::cursor::{XmlCursor, local_name};
use crate::pom::document::{PomDocument, ReferenceKey, Section};
use crate::pom::error::DocumentError;
use crate::version::{DeclaredVersion, ModuleCoordinate, Properties};

/// Reference to the parent POM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentReference {
    pub coordinate: ModuleCoordinate,
    pub version: Option<String>,
}

/// A dependency or plugin entry as declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredReference {
    /// Position among the document's references, used to edit this entry only
    pub entry: usize,
    pub key: ReferenceKey,
    pub version: Option<DeclaredVersion>,
}

impl DeclaredReference {
    pub fn new(
        entry: usize,
        section: Section,
        coordinate: ModuleCoordinate,
        version: Option<&str>,
    ) -> Self {
        Self {
            entry,
            key: ReferenceKey::new(section, coordinate),
            version: version.map(DeclaredVersion::parse),
        }
    }

    pub fn section(&self) -> Section {
        self.key.section
    }

    pub fn coordinate(&self) -> &ModuleCoordinate {
        &self.key.coordinate
    }

    /// The version as written, or `None` when the entry has no version
    pub fn declared_version(&self) -> Option<&str> {
        self.version.as_ref().map(DeclaredVersion::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomModel {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub parent: Option<ParentReference>,
    pub references: Vec<DeclaredReference>,
    pub properties: Properties,
}

impl PomModel {
    pub fn read(source: &str) -> Result<Self, DocumentError> {
        let document = PomDocument::parse(source)?;
        let properties = read_properties(source)?;

        let parent = document.parent().map(|parent| ParentReference {
            coordinate: parent.coordinate(),
            version: document.parent_version().map(|v| v.value().to_string()),
        });
        let references = document
            .references()
            .enumerate()
            .map(|(entry, (key, version))| DeclaredReference {
                entry,
                key: key.clone(),
                version: version.map(|v| DeclaredVersion::parse(v.value())),
            })
            .collect();

        Ok(Self {
            group_id: document.group_id().map(str::to_string),
            artifact_id: document.artifact_id().map(str::to_string),
            version: document.own_version().map(|v| v.value().to_string()),
            parent,
            references,
            properties,
        })
    }
}

/// Collect the `<properties>` of the root `<project>`
fn read_properties(source: &str) -> Result<Properties, DocumentError> {
    let mut cursor = XmlCursor::new(source);
    let mut properties = Properties::new();

    // Advance to the root element
    loop {
        match cursor.next()? {
            Event::Start(_) => break,
            Event::Empty(_) | Event::Eof => return Ok(properties),
            _ => {}
        }
    }

    loop {
        match cursor.next()? {
            Event::Start(e) => {
                let name = local_name(&e);
                if name == "properties" {
                    read_property_entries(&mut cursor, &mut properties)?;
                } else {
                    cursor.skip_element(&name)?;
                }
            }
            Event::End(_) => return Ok(properties),
            Event::Eof => return Err(DocumentError::UnexpectedEof("project".to_string())),
            _ => {}
        }
    }
}

fn read_property_entries(
    cursor: &mut XmlCursor<'_>,
    properties: &mut Properties,
) -> Result<(), DocumentError> {
    loop {
        match cursor.next()? {
            Event::Start(e) => {
                let name = local_name(&e);
                let value = cursor.leaf_text(&name)?;
                properties.insert(name, value);
            }
            Event::Empty(e) => {
                properties.insert(local_name(&e), String::new());
            }
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(DocumentError::UnexpectedEof("properties".to_string())),
            _ => {}
        }
    }
}
