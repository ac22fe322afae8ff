//! Text scene container: sections, nodes and sub-resources

pub mod parser;
pub mod value;

pub use value::{PropertyMap, Value};

use crate::error::{Error, Result};

/// One `[tag attr=value ...]` block and the properties that follow it
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub tag: String,
    pub attributes: PropertyMap,
    pub properties: PropertyMap,
    /// 1-based line of the header
    pub line: usize,
}

impl Section {
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// `id` attribute as text, whether written as `id=1` or `id="Name_x"`
    pub fn id(&self) -> Option<String> {
        self.attributes.get("id").and_then(Value::as_id)
    }

    pub fn property(&self, key: &str) -> Result<&Value> {
        self.properties.get(key).ok_or_else(|| Error::MissingProperty {
            owner: self.describe(),
            property: key.to_string(),
        })
    }

    /// Path of a node section relative to the scene root. The root itself
    /// is `.`, its children are bare names.
    pub fn node_path(&self) -> Option<String> {
        let name = self.attribute_str("name")?;
        match self.attribute_str("parent") {
            None => Some(".".to_string()),
            Some(".") => Some(name.to_string()),
            Some(parent) => Some(format!("{parent}/{name}")),
        }
    }

    pub fn describe(&self) -> String {
        match self.tag.as_str() {
            "node" => format!("node {:?}", self.attribute_str("name").unwrap_or("?")),
            tag => match self.id() {
                Some(id) => format!("{tag} {id}"),
                None => format!("{tag} at line {}", self.line),
            },
        }
    }
}

/// A parsed scene or resource file
#[derive(Debug, Clone)]
pub struct Scene {
    pub header: Section,
    pub sections: Vec<Section>,
}

impl Scene {
    pub fn parse(text: &str) -> Result<Self> {
        let mut sections = parser::parse_sections(text)?.into_iter();
        let header = match sections.next() {
            Some(s) if s.tag == "gd_scene" || s.tag == "gd_resource" => s,
            Some(s) => {
                return Err(Error::Parse {
                    line: s.line,
                    column: 1,
                    message: format!("expected gd_scene or gd_resource header, found [{}]", s.tag),
                })
            }
            None => {
                return Err(Error::Parse {
                    line: 1,
                    column: 1,
                    message: "empty scene file".into(),
                })
            }
        };

        let scene = Self { header, sections: sections.collect() };
        tracing::debug!(
            sections = scene.sections.len(),
            nodes = scene.nodes().count(),
            "parsed scene"
        );
        Ok(scene)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.tag == "node")
    }

    pub fn sub_resources(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.tag == "sub_resource")
    }

    pub fn root(&self) -> Option<&Section> {
        self.nodes().find(|n| n.attribute_str("parent").is_none())
    }

    /// Find a node by its path from the scene root. Paths resolve relative
    /// to the root first; only when nothing matches is a leading root name
    /// (or the root name alone) accepted.
    pub fn node(&self, path: &str) -> Result<&Section> {
        let relative = path.trim_start_matches("./");
        if let Some(node) = self.node_at(relative) {
            return Ok(node);
        }

        let root_name = self.root().and_then(|r| r.attribute_str("name"));
        let aliased = root_name.and_then(|root_name| {
            if relative == root_name {
                Some(".")
            } else {
                relative.strip_prefix(root_name).and_then(|r| r.strip_prefix('/'))
            }
        });

        aliased
            .and_then(|p| self.node_at(p))
            .ok_or_else(|| Error::NodeNotFound(path.to_string()))
    }

    fn node_at(&self, relative: &str) -> Option<&Section> {
        self.nodes().find(|n| n.node_path().as_deref() == Some(relative))
    }

    pub fn sub_resource(&self, id: &str) -> Result<&Section> {
        self.sub_resources()
            .find(|s| s.id().as_deref() == Some(id))
            .ok_or_else(|| Error::SubResourceNotFound(id.to_string()))
    }
}
