//! `threatforge catalog` command handler

use std::io::Write;

use serde::Serialize;

use threatforge_core::types::StrideCategory;
use threatforge_engine::Catalog;

use crate::cli::{CatalogArgs, CatalogKind};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `catalog` command.
pub fn execute(args: CatalogArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let catalog = Catalog::global();
    match args.kind {
        CatalogKind::Components => writer.render(&component_listing(catalog)),
        CatalogKind::Templates => writer.render(&template_listing(catalog)),
        CatalogKind::Stride => writer.render(&stride_listing()),
    }
}

fn component_listing(catalog: &Catalog) -> ComponentListing {
    let components = catalog
        .components()
        .iter()
        .map(|def| ComponentRow {
            component_type: def.component_type.to_string(),
            name: def.name.to_owned(),
            category: def.category.display_name().to_owned(),
            stride: def.default_threats.to_vec(),
            threat_templates: catalog.threat_templates(&def.component_type).len(),
        })
        .collect();
    ComponentListing { components }
}

fn template_listing(catalog: &Catalog) -> TemplateListing {
    let templates = catalog
        .templates()
        .iter()
        .map(|t| TemplateRow {
            id: t.id.to_owned(),
            name: t.name.to_owned(),
            category: t.category.to_owned(),
            description: t.description.to_owned(),
            components: t.components.len(),
            edges: t.edges.len(),
            boundaries: t.trust_boundaries.len(),
        })
        .collect();
    TemplateListing { templates }
}

fn stride_listing() -> StrideListing {
    let categories = StrideCategory::ALL
        .iter()
        .map(|c| StrideRow {
            id: c.as_str().to_owned(),
            name: c.display_name().to_owned(),
            description: c.description().to_owned(),
        })
        .collect();
    StrideListing { categories }
}

#[derive(Debug, Serialize)]
pub struct ComponentListing {
    pub components: Vec<ComponentRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRow {
    #[serde(rename = "type")]
    pub component_type: String,
    pub name: String,
    pub category: String,
    pub stride: Vec<StrideCategory>,
    pub threat_templates: usize,
}

impl Render for ComponentListing {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            w,
            "{:<18} {:<20} {:<16} {:>7}  STRIDE",
            "Type", "Name", "Category", "Threats"
        )?;
        writeln!(w, "{}", "-".repeat(90))?;
        for c in &self.components {
            let stride: Vec<&str> = c.stride.iter().map(|s| stride_letter(*s)).collect();
            writeln!(
                w,
                "{:<18} {:<20} {:<16} {:>7}  {}",
                c.component_type,
                c.name,
                c.category,
                c.threat_templates,
                stride.join("")
            )?;
        }
        writeln!(w)?;
        writeln!(w, "Total: {} component types", self.components.len())?;
        Ok(())
    }
}

fn stride_letter(category: StrideCategory) -> &'static str {
    match category {
        StrideCategory::Spoofing => "S",
        StrideCategory::Tampering => "T",
        StrideCategory::Repudiation => "R",
        StrideCategory::InformationDisclosure => "I",
        StrideCategory::DenialOfService => "D",
        StrideCategory::ElevationOfPrivilege => "E",
    }
}

#[derive(Debug, Serialize)]
pub struct TemplateListing {
    pub templates: Vec<TemplateRow>,
}

#[derive(Debug, Serialize)]
pub struct TemplateRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub components: usize,
    pub edges: usize,
    pub boundaries: usize,
}

impl Render for TemplateListing {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        for t in &self.templates {
            writeln!(w, "{} ({})", t.id.bold(), t.name)?;
            writeln!(w, "  {}", t.description)?;
            writeln!(
                w,
                "  {} components, {} data flows, {} trust boundaries [{}]",
                t.components, t.edges, t.boundaries, t.category
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct StrideListing {
    pub categories: Vec<StrideRow>,
}

#[derive(Debug, Serialize)]
pub struct StrideRow {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Render for StrideListing {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        for c in &self.categories {
            writeln!(w, "{:<24} {}", c.name.bold(), c.description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_listing_covers_known_types() {
        let listing = component_listing(Catalog::global());
        assert_eq!(listing.components.len(), 17);

        let web = listing
            .components
            .iter()
            .find(|c| c.component_type == "webApplication")
            .expect("webApplication listed");
        assert_eq!(web.name, "Web Application");
        assert!(web.threat_templates > 0);

        let boundary = listing
            .components
            .iter()
            .find(|c| c.component_type == "trustBoundary")
            .expect("trustBoundary listed");
        assert_eq!(boundary.threat_templates, 0);
    }

    #[test]
    fn test_template_listing() {
        let listing = template_listing(Catalog::global());
        let ids: Vec<&str> = listing.templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "restApi",
                "microservices",
                "mobileBackend",
                "threeTier",
                "eventDriven",
                "saasPlatform"
            ]
        );
        let three_tier = &listing.templates[3];
        assert_eq!(three_tier.components, 4);
        assert_eq!(three_tier.edges, 3);
    }

    #[test]
    fn test_stride_listing_text() {
        let listing = stride_listing();
        assert_eq!(listing.categories.len(), 6);

        let mut buf = Vec::new();
        listing.render_text(&mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("Spoofing"));
        assert!(text.contains("Elevation of Privilege"));
    }

    #[test]
    fn test_component_json_uses_type_key() {
        let listing = component_listing(Catalog::global());
        let value = serde_json::to_value(&listing).expect("json");
        assert!(value["components"][0]["type"].is_string());
        assert!(value["components"][0]["threatTemplates"].is_u64());
    }
}
